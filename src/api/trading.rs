// ============================================================================
// Achat / vente
// ============================================================================

use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::client::{ApiClient, ApiRequest};
use crate::error::{Action, ApiError};

/// Sens d'un ordre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn endpoint(&self) -> &'static str {
        match self {
            TradeSide::Buy => "/api/buy",
            TradeSide::Sell => "/api/sell",
        }
    }

    pub fn action(&self) -> Action {
        match self {
            TradeSide::Buy => Action::Buy,
            TradeSide::Sell => Action::Sell,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TradeSide::Buy => "Achat",
            TradeSide::Sell => "Vente",
        }
    }
}

/// Confirmation d'un ordre exécuté
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TradeReceipt {
    /// Prix unitaire d'exécution
    pub price: f64,
}

/// Vérifie la quantité avant l'envoi
/// - au moins 1
/// - au plus `max` (vente d'une position)
pub fn validate_qty(qty: u32, max: Option<u32>) -> Result<(), ApiError> {
    if qty < 1 {
        return Err(ApiError::InvalidInput("La quantité doit être au moins 1.".to_string()));
    }
    if let Some(max) = max {
        if qty > max {
            return Err(ApiError::InvalidInput(format!(
                "Vous ne possédez que {} action(s).",
                max
            )));
        }
    }
    Ok(())
}

impl ApiClient {
    /// Passe un ordre d'achat ou de vente
    #[instrument(skip(self))]
    pub async fn trade(
        &self,
        side: TradeSide,
        ticker: &str,
        qty: u32,
        max: Option<u32>,
    ) -> Result<TradeReceipt, ApiError> {
        validate_qty(qty, max)?;

        let request = ApiRequest::post(
            side.endpoint(),
            json!({
                "ticker": ticker,
                "qty": qty,
            }),
        );

        let receipt = self
            .send_authorized::<TradeReceipt>(&request)
            .await?
            .ok_or(ApiError::MissingData)?;

        info!(price = receipt.price, "Order executed");
        Ok(receipt)
    }
}
