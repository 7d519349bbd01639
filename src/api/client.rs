// ============================================================================
// ApiClient : client HTTP de l'API de trading
// ============================================================================
// Toutes les réponses suivent l'enveloppe {message: string, data?: T}.
// Le serveur renseigne "message" même pour les erreurs : le corps est donc
// lu quel que soit le statut HTTP.
//
// CONCEPTS RUST :
// 1. Génériques + DeserializeOwned : un seul send() pour tous les endpoints
// 2. Arc<LocalStore> : jetons partagés avec le reste de l'application
// 3. thiserror : ApiError distingue codes serveur / réseau / stockage
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{ApiCode, ApiError};
use crate::storage::LocalStore;

/// Délai maximum d'un appel
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Enveloppe commune à toutes les réponses
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// "" en cas de succès, sinon un code d'erreur
    #[serde(default)]
    pub message: String,

    /// Absent ou null : None
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Ok(data) si message == "", sinon l'erreur correspondante
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.message.is_empty() {
            Ok(self.data)
        } else {
            Err(ApiError::from_message(&self.message))
        }
    }
}

/// Description d'un appel, rejouable après un rafraîchissement des jetons
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Ajoute un paramètre de query string
    pub(crate) fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }
}

/// Client de l'API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<LocalStore>,
}

impl ApiClient {
    /// Crée un client pour `base_url` (ex: "http://localhost:5000")
    pub fn new(base_url: impl Into<String>, store: Arc<LocalStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("lazystocks/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// État local (jetons, historique, thème)
    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    /// Vrai si un jeton d'accès est stocké
    pub fn has_session(&self) -> bool {
        self.store.access_token().is_some()
    }

    /// Envoie une requête et décode l'enveloppe
    #[instrument(skip(self, request, bearer), fields(method = %request.method, path = %request.path))]
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!("Sending API request");
        let response = builder.send().await?;
        let status = response.status();
        debug!(status = %status, "Received API response");

        let bytes = response.bytes().await?;
        let envelope: ApiResponse<T> =
            serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { status, source })?;

        if !envelope.message.is_empty() {
            debug!(message = %envelope.message, "API returned an error code");
        }
        Ok(envelope)
    }

    /// Appel authentifié avec rafraîchissement des jetons
    ///
    /// CONCEPT : Retry unique
    /// 1. Pas de jeton d'accès -> NotLoggedIn (aucun appel)
    /// 2. INVALID_ID_TOKEN -> on rafraîchit les jetons une seule fois
    /// 3. Rafraîchissement OK -> on rejoue la même requête une seule fois
    /// 4. Rafraîchissement KO -> jetons effacés, SessionExpired
    pub(crate) async fn send_authorized<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<Option<T>, ApiError> {
        let token = self.store.access_token().ok_or(ApiError::NotLoggedIn)?;

        match self.send::<T>(request, Some(&token)).await?.into_result() {
            Err(ApiError::Code(ApiCode::InvalidIdToken)) => {
                warn!(path = %request.path, "Access token rejected, refreshing tokens");

                if !self.refresh_tokens().await? {
                    return Err(ApiError::SessionExpired);
                }

                let token = self.store.access_token().ok_or(ApiError::SessionExpired)?;
                info!(path = %request.path, "Tokens refreshed, retrying request");
                self.send::<T>(request, Some(&token)).await?.into_result()
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let response: ApiResponse<u32> = serde_json::from_str(r#"{"message":"","data":42}"#).unwrap();
        assert_eq!(response.into_result().unwrap(), Some(42));
    }

    #[test]
    fn test_envelope_without_data() {
        let response: ApiResponse<u32> = serde_json::from_str(r#"{"message":""}"#).unwrap();
        assert_eq!(response.into_result().unwrap(), None);
    }

    #[test]
    fn test_envelope_error_code() {
        let response: ApiResponse<u32> = serde_json::from_str(r#"{"message":"STOCK_NOT_FOUND"}"#).unwrap();
        let error = response.into_result().unwrap_err();
        assert_eq!(error.code(), Some(ApiCode::StockNotFound));
    }

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::get("/api/query").query("ticker", "AAPL").query("details", true);
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.query,
            vec![("ticker", "AAPL".to_string()), ("details", "true".to_string())]
        );
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_authorized_without_token_makes_no_call() {
        // Port 9 (discard) : aucun appel ne doit partir
        let client = ApiClient::new("http://127.0.0.1:9/", Arc::new(LocalStore::in_memory())).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");

        let result = client.send_authorized::<u32>(&ApiRequest::get("/api/portfolio")).await;
        assert!(matches!(result, Err(ApiError::NotLoggedIn)));
    }
}
