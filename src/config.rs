// ============================================================================
// Configuration
// ============================================================================
// Lit la configuration depuis les variables d'environnement (et un .env
// optionnel chargé par dotenvy).
//
// Variables reconnues :
// - LAZYSTOCKS_API_URL      : URL de l'API (défaut http://localhost:5000)
// - LAZYSTOCKS_DATA_DIR     : répertoire de l'état local (jetons, historique)
// - LAZYSTOCKS_PAGE_SIZE    : lignes par page des tableaux (défaut 20)
// - LAZYSTOCKS_HISTORY_SIZE : taille de l'historique récent (défaut 10)
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// URL utilisée si LAZYSTOCKS_API_URL n'est pas définie
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Lignes par page (même valeur que le backend pour le portfolio)
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Nombre maximum de tickers dans l'historique récent
pub const DEFAULT_HISTORY_SIZE: usize = 10;

/// Délai entre la dernière frappe et l'envoi de la recherche
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// Durée d'affichage d'une notification
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Configuration de l'application
#[derive(Debug, Clone)]
pub struct Config {
    /// URL de base de l'API, sans slash final
    pub api_url: String,

    /// Répertoire de l'état local (state.json) et des logs
    pub data_dir: PathBuf,

    /// Lignes par page dans les tableaux
    pub page_size: usize,

    /// Taille maximale de l'historique récent
    pub history_size: usize,
}

impl Config {
    /// Charge la configuration depuis l'environnement
    ///
    /// CONCEPT : .env optionnel
    /// - dotenvy::dotenv() échoue si le fichier n'existe pas
    /// - On ignore cette erreur : l'environnement du shell suffit
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lecture
    ///
    /// CONCEPT RUST : impl Fn en paramètre
    /// - Permet de tester sans modifier les variables d'environnement du process
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("LAZYSTOCKS_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let data_dir = match lookup("LAZYSTOCKS_DATA_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_data_dir(),
        };

        let page_size = match lookup("LAZYSTOCKS_PAGE_SIZE") {
            Some(raw) => parse_positive(&raw).context("LAZYSTOCKS_PAGE_SIZE doit être un entier positif")?,
            None => DEFAULT_PAGE_SIZE,
        };

        let history_size = match lookup("LAZYSTOCKS_HISTORY_SIZE") {
            Some(raw) => parse_positive(&raw).context("LAZYSTOCKS_HISTORY_SIZE doit être un entier positif")?,
            None => DEFAULT_HISTORY_SIZE,
        };

        Ok(Self {
            api_url: normalize_url(&api_url),
            data_dir,
            page_size,
            history_size,
        })
    }

    /// Remplace l'URL de l'API (option --api-url de la ligne de commande)
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = normalize_url(url);
        self
    }

    /// Chemin du fichier d'état local
    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }

    /// Répertoire des logs
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// ~/.local/share/lazystocks sur Linux, ./.lazystocks si introuvable
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("lazystocks"))
        .unwrap_or_else(|| PathBuf::from(".lazystocks"))
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_positive(raw: &str) -> Result<usize> {
    let value: usize = raw.trim().parse()?;
    if value == 0 {
        anyhow::bail!("la valeur doit être supérieure à 0");
    }
    Ok(value)
}
