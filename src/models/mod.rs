// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod holding; // Achats et positions du portfolio
pub mod quote;   // Fiche détaillée d'une action
pub mod stock;   // Classements, recherche, historique
pub mod user;    // Profil et jetons

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lazystocks::models::stock::Stock;
// On peut faire : use lazystocks::models::Stock;
pub use holding::{aggregate, Holding, HoldingColumn, Purchase, PurchaseSet, Return};
pub use quote::QuoteDetails;
pub use stock::{assign_ranks, ListKind, SearchResult, Stock, StockColumn, StockRef};
pub use user::{is_valid_email, LoginData, TokenPair, User};
