// ============================================================================
// Structures : User, TokenPair
// ============================================================================
// Profil de l'utilisateur connecté et jetons d'authentification
// ============================================================================

use serde::{Deserialize, Serialize};

/// Profil renvoyé par /api/auth/info et /api/auth/login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifiant unique côté serveur
    pub local_id: String,

    pub email: String,

    /// Nom affiché ("Prénom Nom"), peut être vide
    #[serde(default)]
    pub display_name: String,
}

impl User {
    /// Nom à afficher, avec un libellé par défaut si vide
    pub fn display_label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            "Nouvel utilisateur"
        } else {
            &self.display_name
        }
    }
}

/// Jeton d'accès (court) + jeton de rafraîchissement (long)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Réponse de /api/auth/login : profil + jetons dans le même objet
///
/// CONCEPT SERDE : #[serde(flatten)]
/// - Les champs de User et TokenPair sont au même niveau dans le JSON
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    #[serde(flatten)]
    pub user: User,

    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Vérifie la forme d'une adresse e-mail (partie locale @ domaine)
///
/// Partie locale : alphanumérique et .!#$%&'’*+/=?^_`{|}~-
/// Domaine : labels alphanumériques (ou '-') séparés par des points
pub fn is_valid_email(email: &str) -> bool {
    const LOCAL_SPECIALS: &str = ".!#$%&'’*+/=?^_`{|}~-";

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || LOCAL_SPECIALS.contains(c));

    let domain_ok = !domain.is_empty()
        && domain
            .split('.')
            .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));

    local_ok && domain_ok
}
