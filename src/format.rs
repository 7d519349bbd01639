// ============================================================================
// Formatage des valeurs affichées
// ============================================================================

/// Symbole monétaire suivi d'un espace, "??? " si la devise est inconnue
pub fn currency_symbol(currency: Option<&str>) -> String {
    let symbol = match currency {
        Some("USD") => "$",
        Some("EUR") => "€",
        Some("JPY") => "¥",
        Some("GBP") => "£",
        Some("CHF") => "CHF",
        Some("CAD") => "CAD",
        Some("ZAR") => "R",
        _ => "???",
    };
    format!("{} ", symbol)
}

/// "+x" si x >= 0, "x" sinon, "???" si la valeur est absente
pub fn sign(value: Option<f64>) -> String {
    match value {
        None => "???".to_string(),
        // -0.0 >= 0.0 : on normalise pour éviter "+-0"
        Some(v) if v == 0.0 => "+0".to_string(),
        Some(v) if v >= 0.0 => format!("+{}", v),
        Some(v) => format!("{}", v),
    }
}

/// Arrondi à 2 décimales puis signe (1.5 s'affiche "+1.5", pas "+1.50")
pub fn signed2(value: Option<f64>) -> String {
    sign(value.map(round2))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Deux décimales, "—" si absent
pub fn fixed2(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "—".to_string(),
    }
}

/// Séparateur de milliers : 1234567 -> "1,234,567"
pub fn group_thousands(value: Option<f64>) -> String {
    let Some(value) = value else {
        return "—".to_string();
    };

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Valeur optionnelle brute, "—" si absente
pub fn plain(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string())
}

/// Tronque une chaîne à `max` caractères avec une ellipse
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
