// ============================================================================
// Module : api
// ============================================================================
// Client de l'API de trading : authentification, cotations, portfolio,
// ordres. Un seul ApiClient, ses méthodes sont réparties par domaine.
// ============================================================================

pub mod auth;      // login, register, refresh, info
pub mod client;    // Enveloppe {message, data?} et appels authentifiés
pub mod portfolio; // Positions de l'utilisateur
pub mod quotes;    // Recherche, fiche détaillée, classements
pub mod trading;   // Achat / vente

// Re-export des types principaux
pub use client::{ApiClient, ApiResponse};
pub use trading::{validate_qty, TradeReceipt, TradeSide};
