// ============================================================================
// Structures : Purchase, Holding
// ============================================================================
// /api/portfolio renvoie la liste brute des achats (un objet par achat).
// Le client regroupe les achats par ticker pour afficher une ligne par
// position.
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::listing::{SortKey, Sortable};

/// Un achat tel que stocké côté serveur
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Purchase {
    pub ticker: String,

    /// Prix unitaire payé
    pub price: f64,

    /// Nombre d'actions
    pub qty: u32,
}

/// Le serveur renvoie soit un objet {id: achat}, soit un tableau
///
/// CONCEPT SERDE : #[serde(untagged)]
/// - Essaie chaque variante dans l'ordre jusqu'à ce qu'une corresponde
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PurchaseSet {
    Keyed(BTreeMap<String, Purchase>),
    List(Vec<Purchase>),
}

impl PurchaseSet {
    pub fn into_vec(self) -> Vec<Purchase> {
        match self {
            PurchaseSet::Keyed(map) => map.into_values().collect(),
            PurchaseSet::List(list) => list,
        }
    }
}

/// Gain ou perte : montant et pourcentage
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Return {
    pub amount: f64,
    pub percent: f64,
}

/// Position agrégée pour un ticker
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub ticker: String,

    /// Prix moyen (moyenne deux à deux des prix d'achat)
    pub price: f64,

    /// Quantité totale détenue
    pub qty: u32,

    /// price × qty
    pub total_value: f64,

    /// L'API ne fournit pas de cours de référence : toujours zéro pour l'instant
    pub today_return: Return,
    pub total_return: Return,
}

/// Regroupe les achats par ticker, dans l'ordre de première apparition
///
/// Le prix est replié deux à deux dans l'ordre des achats :
/// prix = (prix courant + prix de l'achat) / 2, sans tenir compte des quantités.
pub fn aggregate(purchases: Vec<Purchase>) -> Vec<Holding> {
    let mut holdings: Vec<Holding> = Vec::new();

    for purchase in purchases {
        match holdings.iter_mut().find(|h| h.ticker == purchase.ticker) {
            Some(holding) => {
                holding.price = (holding.price + purchase.price) / 2.0;
                holding.qty = holding.qty.saturating_add(purchase.qty);
                holding.total_value = holding.price * holding.qty as f64;
            }
            None => holdings.push(Holding {
                total_value: purchase.price * purchase.qty as f64,
                ticker: purchase.ticker,
                price: purchase.price,
                qty: purchase.qty,
                today_return: Return::default(),
                total_return: Return::default(),
            }),
        }
    }

    holdings
}

/// Colonnes triables du portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldingColumn {
    Ticker,
    Qty,
    TotalValue,
    TodayReturn,
    TotalReturn,
    Price,
}

impl HoldingColumn {
    pub const ALL: [HoldingColumn; 6] = [
        HoldingColumn::Ticker,
        HoldingColumn::Qty,
        HoldingColumn::TotalValue,
        HoldingColumn::TodayReturn,
        HoldingColumn::TotalReturn,
        HoldingColumn::Price,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HoldingColumn::Ticker => "Symbole",
            HoldingColumn::Qty => "Actions",
            HoldingColumn::TotalValue => "Valeur",
            HoldingColumn::TodayReturn => "Gain du jour",
            HoldingColumn::TotalReturn => "Gain total",
            HoldingColumn::Price => "Prix/action",
        }
    }

    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl Sortable for Holding {
    type Column = HoldingColumn;

    fn sort_key(&self, column: HoldingColumn) -> SortKey {
        match column {
            HoldingColumn::Ticker => SortKey::Text(self.ticker.clone()),
            HoldingColumn::Qty => SortKey::Number(self.qty as f64),
            HoldingColumn::TotalValue => SortKey::Number(self.total_value),
            HoldingColumn::TodayReturn => SortKey::Number(self.today_return.amount),
            HoldingColumn::TotalReturn => SortKey::Number(self.total_return.amount),
            HoldingColumn::Price => SortKey::Number(self.price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_set_accepts_object_and_array() {
        let keyed: PurchaseSet = serde_json::from_str(
            r#"{"-Nabc": {"ticker":"AAPL","price":100.0,"qty":2}, "-Nabd": {"ticker":"TSLA","price":200.0,"qty":1}}"#,
        )
        .unwrap();
        assert_eq!(keyed.into_vec().len(), 2);

        let list: PurchaseSet = serde_json::from_str(r#"[{"ticker":"AAPL","price":100.0,"qty":2}]"#).unwrap();
        assert_eq!(list.into_vec().len(), 1);
    }

    #[test]
    fn test_aggregate_pairwise_mean() {
        let purchases = vec![
            Purchase { ticker: "AAPL".to_string(), price: 100.0, qty: 1 },
            Purchase { ticker: "TSLA".to_string(), price: 200.0, qty: 2 },
            Purchase { ticker: "AAPL".to_string(), price: 200.0, qty: 3 },
        ];

        let holdings = aggregate(purchases);
        assert_eq!(holdings.len(), 2);

        // (100 + 200) / 2, les quantités ne pondèrent pas le prix
        let apple = &holdings[0];
        assert_eq!(apple.ticker, "AAPL");
        assert_eq!(apple.qty, 4);
        assert_eq!(apple.price, 150.0);
        assert_eq!(apple.total_value, 600.0);
        assert_eq!(apple.today_return, Return::default());

        assert_eq!(holdings[1].total_value, 400.0);
    }

    #[test]
    fn test_aggregate_fold_follows_purchase_order() {
        let purchases = vec![
            Purchase { ticker: "AAPL".to_string(), price: 100.0, qty: 1 },
            Purchase { ticker: "AAPL".to_string(), price: 200.0, qty: 1 },
            Purchase { ticker: "AAPL".to_string(), price: 300.0, qty: 1 },
        ];

        // ((100 + 200) / 2 + 300) / 2
        let holdings = aggregate(purchases);
        assert_eq!(holdings[0].price, 225.0);
        assert_eq!(holdings[0].qty, 3);
    }

    #[test]
    fn test_aggregate_quantity_saturates() {
        let purchases = vec![
            Purchase { ticker: "AAPL".to_string(), price: 1.0, qty: u32::MAX },
            Purchase { ticker: "AAPL".to_string(), price: 1.0, qty: 5 },
        ];

        let holdings = aggregate(purchases);
        assert_eq!(holdings[0].qty, u32::MAX);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(Vec::new()).is_empty());
    }
}
