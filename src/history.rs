// ============================================================================
// Historique récent des actions consultées
// ============================================================================
// Invariants :
// - un ticker n'apparaît qu'une fois
// - l'entrée la plus récente est à la fin
// - longueur <= cap (les plus anciennes sont retirées en premier)
// ============================================================================

use crate::models::StockRef;

/// Liste bornée des dernières actions consultées
#[derive(Debug, Clone, PartialEq)]
pub struct RecentHistory {
    entries: Vec<StockRef>,
    cap: usize,
}

impl RecentHistory {
    /// Crée un historique vide
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            cap,
        }
    }

    /// Reprend un historique sauvegardé (tronqué au besoin)
    pub fn from_entries(entries: Vec<StockRef>, cap: usize) -> Self {
        let mut history = Self::new(cap);
        for entry in entries {
            history.push(entry);
        }
        history
    }

    /// Ajoute une action consultée
    ///
    /// CONCEPT RUST : retain
    /// - Vec::retain garde les éléments pour lesquels la closure retourne true
    /// - Supprime les doublons en une passe, sans allocation
    pub fn push(&mut self, stock: StockRef) {
        self.entries.retain(|entry| entry.ticker != stock.ticker);
        self.entries.push(stock);

        if self.entries.len() > self.cap {
            let overflow = self.entries.len() - self.cap;
            self.entries.drain(..overflow);
        }
    }

    /// Entrées dans l'ordre de stockage (la plus récente en dernier)
    pub fn entries(&self) -> &[StockRef] {
        &self.entries
    }

    /// Entrées pour l'affichage (la plus récente en premier)
    pub fn newest_first(&self) -> Vec<&StockRef> {
        self.entries.iter().rev().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(ticker: &str) -> StockRef {
        StockRef {
            ticker: ticker.to_string(),
            name: format!("{} Corp", ticker),
        }
    }

    fn tickers(history: &RecentHistory) -> Vec<&str> {
        history.entries().iter().map(|s| s.ticker.as_str()).collect()
    }

    #[test]
    fn test_push_moves_duplicate_to_end() {
        let mut history = RecentHistory::new(10);
        history.push(stock("AAPL"));
        history.push(stock("TSLA"));
        history.push(stock("AAPL"));

        assert_eq!(tickers(&history), vec!["TSLA", "AAPL"]);
        assert_eq!(history.newest_first()[0].ticker, "AAPL");
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut history = RecentHistory::new(3);
        for t in ["A", "B", "C", "D"] {
            history.push(stock(t));
        }
        assert_eq!(tickers(&history), vec!["B", "C", "D"]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_from_entries_truncates() {
        let saved = ["A", "B", "C"].iter().map(|t| stock(t)).collect();
        let history = RecentHistory::from_entries(saved, 2);
        assert_eq!(tickers(&history), vec!["B", "C"]);
    }

    #[test]
    fn test_clear() {
        let mut history = RecentHistory::new(10);
        history.push(stock("AAPL"));
        history.clear();
        assert!(history.is_empty());
    }
}
