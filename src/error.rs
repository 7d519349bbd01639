// ============================================================================
// Erreurs de l'API
// ============================================================================
// Toutes les réponses du serveur suivent la convention {message, data?} :
// - message == ""  : succès
// - message != ""  : code d'erreur ("SERVICE_OFFLINE", "STOCK_NOT_FOUND", ...)
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] génère l'implémentation de std::error::Error
// - #[error("...")] génère Display
// - #[from] génère From<T> pour utiliser ? directement
// ============================================================================

use std::str::FromStr;

use reqwest::StatusCode;
use strum::{AsRefStr, EnumString};
use thiserror::Error;

/// Codes d'erreur connus renvoyés dans le champ "message"
///
/// CONCEPT : strum EnumString
/// - "INVALID_ID_TOKEN".parse::<ApiCode>() -> Ok(ApiCode::InvalidIdToken)
/// - serialize_all convertit automatiquement les noms des variantes
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiCode {
    ServiceOffline,
    ServiceNotImplemented,
    EmailNotVerified,
    EmailNotFound,
    InvalidEmail,
    InvalidPassword,
    EmailExists,
    InvalidHeader,
    InvalidBody,
    QtyNotValid,
    StockNotFound,
    InvalidIdToken,
    InvalidRefreshToken,
}

/// Erreur d'un appel à l'API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Code d'erreur connu renvoyé par le serveur
    #[error("le serveur a répondu {}", .0.as_ref())]
    Code(ApiCode),

    /// Message non vide mais inconnu
    #[error("le serveur a répondu un code inconnu : {0}")]
    Unexpected(String),

    /// Aucun jeton d'accès stocké
    #[error("aucun jeton d'accès, connexion requise")]
    NotLoggedIn,

    /// Le rafraîchissement des jetons a échoué (jetons effacés)
    #[error("session expirée, reconnexion requise")]
    SessionExpired,

    /// Saisie refusée avant tout appel réseau
    #[error("saisie invalide : {0}")]
    InvalidInput(String),

    /// Succès sans le champ "data" attendu
    #[error("réponse sans données")]
    MissingData,

    /// Corps de réponse illisible
    #[error("réponse illisible (HTTP {status}) : {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    /// Erreur réseau / HTTP
    #[error("échec de la requête HTTP : {0}")]
    Http(#[from] reqwest::Error),

    /// Lecture ou écriture de l'état local
    #[error("stockage local : {0:#}")]
    Storage(#[from] anyhow::Error),
}

/// Action de l'utilisateur, pour choisir le titre des notifications d'erreur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Register,
    Buy,
    Sell,
    Load,
}

impl Action {
    /// Titre de la notification en cas d'échec
    pub fn error_title(&self) -> &'static str {
        match self {
            Action::Login => "Connexion impossible",
            Action::Register => "Inscription impossible",
            Action::Buy => "Échec de l'achat",
            Action::Sell => "Échec de la vente",
            Action::Load => "Chargement impossible",
        }
    }
}

impl ApiError {
    /// Convertit un champ "message" non vide en erreur
    pub fn from_message(message: &str) -> Self {
        match ApiCode::from_str(message) {
            Ok(code) => ApiError::Code(code),
            Err(_) => ApiError::Unexpected(message.to_string()),
        }
    }

    /// Retourne le code serveur s'il y en a un
    pub fn code(&self) -> Option<ApiCode> {
        match self {
            ApiError::Code(code) => Some(*code),
            _ => None,
        }
    }

    /// Texte affiché à l'utilisateur
    ///
    /// CONCEPT : Mapping erreur -> message
    /// - Une seule table pour toutes les vues (connexion, achat, vente, ...)
    /// - Les codes inconnus sont affichés tels quels
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Code(code) => match code {
                ApiCode::ServiceOffline => "Le service est hors ligne, réessayez plus tard.".to_string(),
                ApiCode::ServiceNotImplemented => "Cette fonctionnalité n'est pas encore disponible.".to_string(),
                ApiCode::EmailNotVerified => "Adresse e-mail non vérifiée, consultez votre boîte de réception.".to_string(),
                ApiCode::EmailNotFound | ApiCode::InvalidEmail => "Adresse e-mail inconnue ou invalide.".to_string(),
                ApiCode::InvalidPassword => "Mot de passe incorrect.".to_string(),
                ApiCode::EmailExists => "Cette adresse e-mail est déjà utilisée.".to_string(),
                ApiCode::InvalidHeader => "En-tête d'authentification refusé par le serveur.".to_string(),
                ApiCode::InvalidBody => "Requête refusée par le serveur.".to_string(),
                ApiCode::QtyNotValid => "Quantité invalide.".to_string(),
                ApiCode::StockNotFound => "Action introuvable.".to_string(),
                ApiCode::InvalidIdToken | ApiCode::InvalidRefreshToken => {
                    "Session expirée, reconnectez-vous.".to_string()
                }
            },
            ApiError::Unexpected(message) => format!("Problème inconnu : {}", message),
            ApiError::NotLoggedIn => "Connectez-vous d'abord.".to_string(),
            ApiError::SessionExpired => "Session expirée, reconnectez-vous.".to_string(),
            ApiError::InvalidInput(message) => message.clone(),
            ApiError::MissingData | ApiError::Decode { .. } => "Réponse inattendue du serveur.".to_string(),
            ApiError::Http(_) => "Impossible de joindre le serveur.".to_string(),
            ApiError::Storage(e) => format!("Erreur de stockage local : {:#}", e),
        }
    }
}
