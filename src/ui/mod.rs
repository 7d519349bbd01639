// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod dashboard; // Cadre commun, accueil, saisie, notifications
pub mod events;    // Gestion des événements clavier
pub mod forms;     // Connexion, inscription, compte
pub mod quote;     // Fiche détaillée
pub mod tables;    // Classements et portfolio

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
