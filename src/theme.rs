// ============================================================================
// Thème clair / sombre
// ============================================================================
// La préférence est sauvegardée dans l'état local ("dark" ou "light").
// Sans préférence sauvegardée, le thème sombre est utilisé.
// ============================================================================

use ratatui::style::Color;

/// Schéma de couleurs de l'interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    Light,
    #[default]
    Dark,
}

impl ColorScheme {
    /// Interprète la valeur sauvegardée
    /// - "dark"        -> Dark
    /// - autre valeur  -> Light
    /// - rien          -> Dark (défaut)
    pub fn from_saved(saved: Option<&str>) -> Self {
        match saved {
            Some("dark") => ColorScheme::Dark,
            Some(_) => ColorScheme::Light,
            None => ColorScheme::default(),
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }

    /// Valeur sauvegardée
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }

    /// Couleurs utilisées par les widgets
    pub fn palette(&self) -> Palette {
        match self {
            ColorScheme::Dark => Palette {
                text: Color::White,
                dimmed: Color::Gray,
                border: Color::Cyan,
                accent: Color::Yellow,
                positive: Color::Green,
                negative: Color::Red,
            },
            ColorScheme::Light => Palette {
                text: Color::Black,
                dimmed: Color::DarkGray,
                border: Color::Blue,
                accent: Color::Magenta,
                positive: Color::Green,
                negative: Color::Red,
            },
        }
    }
}

/// Jeu de couleurs d'un thème
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub dimmed: Color,
    pub border: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
}

impl Palette {
    /// Vert si >= 0, rouge sinon
    pub fn trend(&self, value: Option<f64>) -> Color {
        match value {
            Some(v) if v >= 0.0 => self.positive,
            Some(_) => self.negative,
            None => self.dimmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_saved() {
        assert_eq!(ColorScheme::from_saved(Some("dark")), ColorScheme::Dark);
        assert_eq!(ColorScheme::from_saved(Some("light")), ColorScheme::Light);
        assert_eq!(ColorScheme::from_saved(Some("sepia")), ColorScheme::Light);
        assert_eq!(ColorScheme::from_saved(None), ColorScheme::Dark);
    }

    #[test]
    fn test_toggle_round_trip() {
        let scheme = ColorScheme::Dark.toggle();
        assert_eq!(scheme, ColorScheme::Light);
        assert_eq!(scheme.as_str(), "light");
        assert_eq!(scheme.toggle(), ColorScheme::Dark);
    }

    #[test]
    fn test_trend_color() {
        let palette = ColorScheme::Dark.palette();
        assert_eq!(palette.trend(Some(0.0)), Color::Green);
        assert_eq!(palette.trend(Some(-1.0)), Color::Red);
        assert_eq!(palette.trend(None), Color::Gray);
    }
}
