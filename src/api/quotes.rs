// ============================================================================
// Cotations : recherche rapide, fiche détaillée, classements
// ============================================================================

use tracing::{debug, info, instrument};

use super::client::{ApiClient, ApiRequest};
use crate::error::{ApiCode, ApiError};
use crate::models::stock::RawSearchResult;
use crate::models::{assign_ranks, ListKind, QuoteDetails, SearchResult, Stock};

impl ApiClient {
    /// Recherche rapide d'un ticker
    ///
    /// - saisie vide : None, sans appel réseau
    /// - STOCK_NOT_FOUND : None
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Option<SearchResult>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let request = ApiRequest::get("/api/query").query("ticker", query);
        match self.send::<RawSearchResult>(&request, None).await?.into_result() {
            Ok(raw) => Ok(raw.map(SearchResult::from)),
            Err(ApiError::Code(ApiCode::StockNotFound)) => {
                debug!("No stock matches the query");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Fiche détaillée d'une action
    ///
    /// None si le ticker est inconnu ou si la fiche est incomplète
    /// (pas de prix d'ouverture).
    #[instrument(skip(self))]
    pub async fn quote(&self, ticker: &str) -> Result<Option<QuoteDetails>, ApiError> {
        let request = ApiRequest::get("/api/query")
            .query("ticker", ticker.trim())
            .query("details", true);

        match self.send::<QuoteDetails>(&request, None).await?.into_result() {
            Ok(Some(quote)) if quote.is_complete() => {
                info!(symbol = %quote.symbol, "Quote loaded");
                Ok(Some(quote))
            }
            Ok(_) => Ok(None),
            Err(ApiError::Code(ApiCode::StockNotFound)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Classement (top, tendances, plus suivies), rangs 1..n
    #[instrument(skip(self))]
    pub async fn list(&self, kind: ListKind, count: u32) -> Result<Vec<Stock>, ApiError> {
        let request = ApiRequest::get(kind.endpoint()).query("count", count);

        let mut stocks: Vec<Stock> = self
            .send(&request, None)
            .await?
            .into_result()?
            .unwrap_or_default();

        assign_ranks(&mut stocks);
        info!(count = stocks.len(), "Stock list loaded");
        Ok(stocks)
    }
}
