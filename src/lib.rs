// ============================================================================
// LazyStocks - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Client de l'API de trading
pub mod app;       // État de l'application
pub mod config;    // Configuration (variables d'environnement)
pub mod error;     // ApiError et messages utilisateur
pub mod format;    // Devises, signes, nombres
pub mod history;   // Historique des actions consultées
pub mod listing;   // Cache + tri + pagination
pub mod models;    // Structures de données
pub mod storage;   // État local persistant
pub mod theme;     // Thème clair / sombre
pub mod ui;        // Interface utilisateur
pub mod worker;    // Thread des appels réseau
