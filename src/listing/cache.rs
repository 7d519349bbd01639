// ============================================================================
// ResultCache : liste mémorisée jusqu'à invalidation explicite
// ============================================================================
// Les vues "classements" et "portfolio" chargent la liste complète une seule
// fois puis trient et paginent localement. Un nouvel appel réseau n'a lieu
// qu'après clear().
// ============================================================================

use std::future::Future;

/// Liste complète (non paginée) gardée en mémoire
#[derive(Debug, Clone)]
pub struct ResultCache<T> {
    items: Option<Vec<T>>,
}

impl<T> ResultCache<T> {
    /// Crée un cache vide
    pub fn new() -> Self {
        Self { items: None }
    }

    /// Retourne la liste si elle a déjà été chargée
    pub fn get(&self) -> Option<&[T]> {
        self.items.as_deref()
    }

    /// Remplace le contenu du cache
    pub fn fill(&mut self, items: Vec<T>) {
        self.items = Some(items);
    }

    /// Invalide le cache : le prochain get_or_fetch refera l'appel
    pub fn clear(&mut self) {
        self.items = None;
    }

    pub fn is_cached(&self) -> bool {
        self.items.is_some()
    }

    /// Retourne la liste, en la chargeant avec `fetch` si le cache est vide
    ///
    /// CONCEPT RUST : Closure qui retourne une Future
    /// - F: FnOnce() -> Fut : la closure n'est appelée qu'une fois (ou jamais)
    /// - Fut: Future<Output = Result<..>> : le résultat est "await"é ici
    /// - Si fetch échoue, le cache reste vide et l'erreur est propagée
    pub async fn get_or_fetch<F, Fut, E>(&mut self, fetch: F) -> Result<&[T], E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        if self.items.is_none() {
            let items = fetch().await?;
            self.items = Some(items);
        }
        Ok(self.items.as_deref().unwrap_or(&[]))
    }
}

impl<T> Default for ResultCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_fetch_runs_once_until_cleared() {
        let calls = Cell::new(0);
        let mut cache: ResultCache<u32> = ResultCache::new();

        let counter = &calls;
        let fetch = move || async move {
            counter.set(counter.get() + 1);
            Ok::<_, String>(vec![1, 2, 3])
        };

        assert_eq!(cache.get_or_fetch(fetch).await.unwrap(), &[1, 2, 3]);
        assert_eq!(cache.get_or_fetch(fetch).await.unwrap(), &[1, 2, 3]);
        assert_eq!(calls.get(), 1);

        cache.clear();
        assert!(!cache.is_cached());
        cache.get_or_fetch(fetch).await.unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cache_empty() {
        let mut cache: ResultCache<u32> = ResultCache::new();
        let result = cache
            .get_or_fetch(|| async { Err::<Vec<u32>, _>("offline".to_string()) })
            .await;

        assert_eq!(result.unwrap_err(), "offline");
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_fill_and_clear() {
        let mut cache = ResultCache::new();
        cache.fill(vec!["AAPL"]);
        assert_eq!(cache.get(), Some(&["AAPL"][..]));
        cache.clear();
        assert_eq!(cache.get(), None);
    }
}
