// ============================================================================
// Module : listing
// ============================================================================
// Listes chargées une fois, puis triées et paginées côté client
// (classements et portfolio)
// ============================================================================

pub mod cache; // Liste mémorisée jusqu'à invalidation
pub mod table; // Tri, pagination, sélection

pub use cache::ResultCache;
pub use table::{PagedTable, SortDirection, SortKey, SortStatus, Sortable};
