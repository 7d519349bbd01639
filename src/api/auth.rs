// ============================================================================
// Authentification : login, register, refresh, info, logout
// ============================================================================

use serde_json::json;
use tracing::{info, instrument, warn};

use super::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::models::{is_valid_email, LoginData, TokenPair, User};

impl ApiClient {
    /// Connexion : stocke les deux jetons et retourne le profil
    ///
    /// L'adresse e-mail est vérifiée localement avant l'appel.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        if !is_valid_email(email) {
            return Err(ApiError::InvalidInput("Ce n'est pas une adresse e-mail valide.".to_string()));
        }

        let request = ApiRequest::post(
            "/api/auth/login",
            json!({
                "email": email,
                "password": password,
            }),
        );

        let data: LoginData = self
            .send(&request, None)
            .await?
            .into_result()?
            .ok_or(ApiError::MissingData)?;

        self.store().set_tokens(&data.tokens)?;
        info!(local_id = %data.user.local_id, "Login successful");
        Ok(data.user)
    }

    /// Inscription : le compte doit ensuite être vérifié par e-mail
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str, display_name: &str) -> Result<(), ApiError> {
        if !is_valid_email(email) {
            return Err(ApiError::InvalidInput("Ce n'est pas une adresse e-mail valide.".to_string()));
        }

        let request = ApiRequest::post(
            "/api/auth/register",
            json!({
                "email": email,
                "password": password,
                "displayName": display_name,
            }),
        );

        self.send::<serde_json::Value>(&request, None).await?.into_result()?;
        info!("Registration successful, e-mail verification pending");
        Ok(())
    }

    /// Rafraîchit les jetons à partir du refresh token stocké
    ///
    /// Retourne true si de nouveaux jetons ont été stockés. Dans tous les
    /// autres cas (pas de refresh token, refus du serveur), les jetons sont
    /// effacés et il faudra se reconnecter.
    #[instrument(skip(self))]
    pub async fn refresh_tokens(&self) -> Result<bool, ApiError> {
        let Some(refresh_token) = self.store().refresh_token() else {
            warn!("No refresh token found, must login again");
            self.store().clear_tokens()?;
            return Ok(false);
        };

        let request = ApiRequest::post(
            "/api/auth/refresh",
            json!({
                "refreshToken": refresh_token,
            }),
        );

        match self.send::<TokenPair>(&request, None).await?.into_result() {
            Ok(Some(tokens)) => {
                self.store().set_tokens(&tokens)?;
                info!("Tokens refreshed");
                Ok(true)
            }
            Ok(None) => {
                warn!("Refresh succeeded without tokens, clearing session");
                self.store().clear_tokens()?;
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "Token refresh refused, clearing session");
                self.store().clear_tokens()?;
                Ok(false)
            }
        }
    }

    /// Profil de l'utilisateur connecté
    ///
    /// None si personne n'est connecté ou si la session n'a pas pu être
    /// prolongée.
    #[instrument(skip(self))]
    pub async fn fetch_info(&self) -> Result<Option<User>, ApiError> {
        match self.send_authorized::<User>(&ApiRequest::get("/api/auth/info")).await {
            Ok(Some(user)) => {
                info!(local_id = %user.local_id, "Profile info retrieved");
                Ok(Some(user))
            }
            Ok(None) => Err(ApiError::MissingData),
            Err(ApiError::NotLoggedIn) | Err(ApiError::SessionExpired) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Déconnexion locale : efface les jetons
    pub fn logout(&self) -> Result<(), ApiError> {
        self.store().clear_tokens()?;
        info!("Logged out");
        Ok(())
    }
}
