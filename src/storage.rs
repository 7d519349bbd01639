// ============================================================================
// LocalStore : état persistant du client
// ============================================================================
// Un fichier JSON unique (<data_dir>/state.json) contient :
// - accessToken / refreshToken : jetons d'authentification
// - stockHistory               : historique récent des tickers consultés
// - siteTheme                  : préférence "dark" / "light"
//
// Chaque modification est écrite immédiatement sur disque.
//
// CONCEPT RUST : Mutabilité intérieure
// - LocalStore est partagé (Arc) entre le thread UI et le worker
// - Mutex<StoreData> permet de modifier l'état via &self
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{StockRef, TokenPair};

/// Contenu sérialisé du fichier d'état
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,

    #[serde(default)]
    stock_history: Vec<StockRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    site_theme: Option<String>,
}

/// État local persistant
#[derive(Debug)]
pub struct LocalStore {
    /// None : stockage en mémoire uniquement (tests)
    path: Option<PathBuf>,
    data: Mutex<StoreData>,
}

impl LocalStore {
    /// Ouvre (ou crée) le fichier d'état
    ///
    /// - Fichier absent : état vide
    /// - Fichier illisible : on repart d'un état vide (avec un warning)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Échec de la création du répertoire {}", parent.display()))?;
        }

        let data = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Échec de la lecture de {}", path.display()))?;
            match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Corrupt state file, starting from empty state");
                    StoreData::default()
                }
            }
        } else {
            StoreData::default()
        };

        debug!(path = %path.display(), "Local store opened");
        Ok(Self {
            path: Some(path),
            data: Mutex::new(data),
        })
    }

    /// Stockage en mémoire, sans fichier
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Mutex::new(StoreData::default()),
        }
    }

    /// Verrouille l'état (un verrou empoisonné est récupéré tel quel)
    fn lock(&self) -> MutexGuard<'_, StoreData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Applique une modification puis écrit le fichier
    fn update(&self, change: impl FnOnce(&mut StoreData)) -> Result<()> {
        let mut data = self.lock();
        change(&mut data);

        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(&*data).context("Échec de la sérialisation de l'état local")?;
            fs::write(path, json).with_context(|| format!("Échec de l'écriture de {}", path.display()))?;
        }
        Ok(())
    }

    // ========================================================================
    // Jetons
    // ========================================================================

    pub fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    pub fn set_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.update(|data| {
            data.access_token = Some(tokens.access_token.clone());
            data.refresh_token = Some(tokens.refresh_token.clone());
        })
    }

    pub fn clear_tokens(&self) -> Result<()> {
        self.update(|data| {
            data.access_token = None;
            data.refresh_token = None;
        })
    }

    // ========================================================================
    // Historique récent
    // ========================================================================

    pub fn history(&self) -> Vec<StockRef> {
        self.lock().stock_history.clone()
    }

    pub fn set_history(&self, history: &[StockRef]) -> Result<()> {
        self.update(|data| data.stock_history = history.to_vec())
    }

    pub fn clear_history(&self) -> Result<()> {
        self.update(|data| data.stock_history.clear())
    }

    // ========================================================================
    // Thème
    // ========================================================================

    pub fn theme(&self) -> Option<String> {
        self.lock().site_theme.clone()
    }

    pub fn set_theme(&self, theme: &str) -> Result<()> {
        self.update(|data| data.site_theme = Some(theme.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_state_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lazystocks-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("state.json")
    }

    fn tokens() -> TokenPair {
        TokenPair {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        }
    }

    #[test]
    fn test_in_memory_tokens() {
        let store = LocalStore::in_memory();
        assert!(store.access_token().is_none());

        store.set_tokens(&tokens()).unwrap();
        assert_eq!(store.access_token().as_deref(), Some("access"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh"));

        store.clear_tokens().unwrap();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn test_persists_across_reopen() {
        let path = temp_state_file("reopen");

        {
            let store = LocalStore::open(&path).unwrap();
            store.set_tokens(&tokens()).unwrap();
            store
                .set_history(&[StockRef {
                    ticker: "AAPL".to_string(),
                    name: "Apple Inc.".to_string(),
                }])
                .unwrap();
            store.set_theme("light").unwrap();
        }

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.access_token().as_deref(), Some("access"));
        assert_eq!(reopened.history().len(), 1);
        assert_eq!(reopened.theme().as_deref(), Some("light"));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"accessToken\""));
        assert!(raw.contains("\"stockHistory\""));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let path = temp_state_file("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let store = LocalStore::open(&path).unwrap();
        assert!(store.access_token().is_none());
        assert!(store.history().is_empty());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
