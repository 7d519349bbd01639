// ============================================================================
// Structure : QuoteDetails
// ============================================================================
// Fiche détaillée renvoyée par /api/query?ticker=...&details=true
// Tous les champs numériques sont optionnels : le serveur les omet quand la
// source de données ne les fournit pas.
// ============================================================================

use serde::Deserialize;

/// Fiche détaillée d'une action
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDetails {
    pub symbol: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,

    /// Code devise ISO ("USD", "EUR", ...)
    pub currency: Option<String>,

    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    pub day_low: Option<f64>,
    pub day_high: Option<f64>,
    pub bid: Option<f64>,
    pub bid_size: Option<f64>,
    pub ask: Option<f64>,
    pub ask_size: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<f64>,
    pub average_volume: Option<f64>,

    /// Objectif de cours moyen à 1 an
    pub target_mean_price: Option<f64>,
}

impl QuoteDetails {
    /// Nom court, sinon nom long, sinon symbole
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .or(self.long_name.as_deref())
            .unwrap_or(&self.symbol)
    }

    /// Titre de la fiche : "Apple Inc. (AAPL)" ou "AAPL"
    pub fn title(&self) -> String {
        let name = self.display_name();
        if name != self.symbol {
            format!("{} ({})", name, self.symbol)
        } else {
            name.to_string()
        }
    }

    /// Variation du jour (prix actuel - clôture précédente)
    pub fn day_change(&self) -> Option<f64> {
        Some(self.current_price? - self.previous_close?)
    }

    /// Variation du jour en pourcentage du prix actuel
    pub fn day_percent(&self) -> Option<f64> {
        let price = self.current_price?;
        if price == 0.0 {
            return None;
        }
        Some(self.day_change()? / price * 100.0)
    }

    /// Une fiche sans prix d'ouverture (absent ou 0) est considérée comme introuvable
    pub fn is_complete(&self) -> bool {
        matches!(self.open, Some(open) if open != 0.0)
    }
}
