// ============================================================================
// Structures : Stock, SearchResult, StockRef, ListKind
// ============================================================================
// Une ligne des classements (/api/top, /api/trending, /api/most-watched),
// le résultat d'une recherche rapide (/api/query) et une entrée de
// l'historique récent.
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::listing::{SortKey, Sortable};

/// Une action dans un classement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    /// Rang dans le classement (attribué côté client, 1..n)
    #[serde(default)]
    pub rank: u32,

    pub ticker: String,

    #[serde(default)]
    pub name: String,

    /// "up" ou "down"
    pub trend: Option<String>,
    pub sector: Option<String>,
    pub summary: Option<String>,

    /// Prix actuel
    pub price: Option<f64>,

    /// Variation du jour (montant)
    pub day_change: Option<f64>,

    /// Variation du jour (%)
    pub day_percent: Option<f64>,
}

impl Stock {
    pub fn is_positive(&self) -> bool {
        self.day_percent.map(|p| p >= 0.0).unwrap_or(false)
    }
}

/// Attribue les rangs 1..n dans l'ordre du serveur
pub fn assign_ranks(stocks: &mut [Stock]) {
    for (i, stock) in stocks.iter_mut().enumerate() {
        stock.rank = i as u32 + 1;
    }
}

/// Colonnes triables d'un classement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockColumn {
    Rank,
    Ticker,
    Price,
    DayPercent,
    Name,
    Sector,
}

impl StockColumn {
    pub const ALL: [StockColumn; 6] = [
        StockColumn::Rank,
        StockColumn::Ticker,
        StockColumn::Price,
        StockColumn::DayPercent,
        StockColumn::Name,
        StockColumn::Sector,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StockColumn::Rank => "Rang",
            StockColumn::Ticker => "Symbole",
            StockColumn::Price => "Valeur",
            StockColumn::DayPercent => "Variation du jour",
            StockColumn::Name => "Nom",
            StockColumn::Sector => "Secteur",
        }
    }

    /// Colonne suivante (touche 's')
    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl Sortable for Stock {
    type Column = StockColumn;

    fn sort_key(&self, column: StockColumn) -> SortKey {
        match column {
            StockColumn::Rank => SortKey::Number(self.rank as f64),
            StockColumn::Ticker => SortKey::Text(self.ticker.clone()),
            StockColumn::Price => SortKey::number(self.price),
            StockColumn::DayPercent => SortKey::number(self.day_percent),
            StockColumn::Name => SortKey::Text(self.name.clone()),
            StockColumn::Sector => SortKey::text(self.sector.as_deref()),
        }
    }
}

/// Les trois classements proposés par l'API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Top,
    Trending,
    MostWatched,
}

impl ListKind {
    /// Chemin de l'endpoint
    pub fn endpoint(&self) -> &'static str {
        match self {
            ListKind::Top => "/api/top",
            ListKind::Trending => "/api/trending",
            ListKind::MostWatched => "/api/most-watched",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ListKind::Top => "Top 10",
            ListKind::Trending => "Tendances",
            ListKind::MostWatched => "Les plus suivies",
        }
    }

    /// Nombre d'actions demandées par défaut
    pub fn default_count(&self) -> u32 {
        match self {
            ListKind::Top => 10,
            ListKind::Trending | ListKind::MostWatched => 20,
        }
    }
}

/// Réponse brute de /api/query (sans details)
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawSearchResult {
    pub ticker: String,
    #[serde(default)]
    pub name: String,
    pub trend: Option<String>,
    pub sector: Option<String>,
    pub summary: Option<String>,
}

/// Résultat de la recherche rapide
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub ticker: String,
    pub name: String,
    pub trend: Option<String>,
    pub sector: Option<String>,
    pub summary: Option<String>,
}

impl From<RawSearchResult> for SearchResult {
    /// Si le serveur renvoie le ticker comme nom, on affiche le secteur
    fn from(raw: RawSearchResult) -> Self {
        let name = if raw.name == raw.ticker {
            raw.sector.clone().unwrap_or(raw.name)
        } else {
            raw.name
        };

        Self {
            ticker: raw.ticker,
            name,
            trend: raw.trend,
            sector: raw.sector,
            summary: raw.summary,
        }
    }
}

impl SearchResult {
    pub fn is_trend_down(&self) -> bool {
        self.trend.as_deref() == Some("down")
    }

    /// Le résultat correspond-il à la saisie (insensible à la casse) ?
    pub fn matches(&self, query: &str) -> bool {
        self.ticker.trim().eq_ignore_ascii_case(query.trim())
    }
}

/// Entrée de l'historique récent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRef {
    pub ticker: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_deserialize_camel_case() {
        let json = r#"{"ticker":"AAPL","name":"Apple Inc.","price":185.2,"dayChange":-1.5,"dayPercent":-0.8}"#;
        let stock: Stock = serde_json::from_str(json).unwrap();
        assert_eq!(stock.rank, 0);
        assert_eq!(stock.day_change, Some(-1.5));
        assert!(!stock.is_positive());
        assert!(stock.sector.is_none());
    }

    #[test]
    fn test_assign_ranks() {
        let mut stocks: Vec<Stock> = serde_json::from_str(r#"[{"ticker":"A"},{"ticker":"B"}]"#).unwrap();
        assign_ranks(&mut stocks);
        assert_eq!(stocks[0].rank, 1);
        assert_eq!(stocks[1].rank, 2);
    }

    #[test]
    fn test_search_result_name_falls_back_to_sector() {
        let raw = RawSearchResult {
            ticker: "SPY".to_string(),
            name: "SPY".to_string(),
            trend: Some("down".to_string()),
            sector: Some("ETF".to_string()),
            summary: None,
        };
        let result = SearchResult::from(raw);
        assert_eq!(result.name, "ETF");
        assert!(result.is_trend_down());
        assert!(result.matches(" spy "));
    }

    #[test]
    fn test_column_cycle() {
        assert_eq!(StockColumn::Rank.next(), StockColumn::Ticker);
        assert_eq!(StockColumn::Sector.next(), StockColumn::Rank);
    }
}
