// ============================================================================
// Portfolio : achats de l'utilisateur, regroupés par ticker
// ============================================================================

use tracing::{info, instrument};

use super::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::models::{aggregate, Holding, PurchaseSet};

impl ApiClient {
    /// Positions de l'utilisateur connecté
    ///
    /// Le serveur ignore encore le paramètre `page` : la liste complète est
    /// renvoyée et paginée côté client.
    #[instrument(skip(self))]
    pub async fn portfolio(&self, page: usize) -> Result<Vec<Holding>, ApiError> {
        let request = ApiRequest::get("/api/portfolio").query("page", page);

        let purchases = self
            .send_authorized::<PurchaseSet>(&request)
            .await?
            .map(PurchaseSet::into_vec)
            .unwrap_or_default();

        let holdings = aggregate(purchases);
        info!(holdings = holdings.len(), "Portfolio loaded");
        Ok(holdings)
    }
}
