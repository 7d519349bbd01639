// ============================================================================
// Tri et pagination côté client
// ============================================================================
// La liste complète vient du ResultCache ; chaque affichage :
//   1. trie la liste selon la colonne courante (tri stable croissant)
//   2. inverse le résultat si le tri est décroissant
//   3. découpe la page courante
//
// Les valeurs absentes sont placées en fin de tri croissant (donc en tête
// d'un tri décroissant, puisque celui-ci est une inversion).
// ============================================================================

use std::cmp::Ordering;
use std::fmt::Debug;

use super::cache::ResultCache;

/// Clé de tri extraite d'un enregistrement pour une colonne
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Number(f64),
    Text(String),
    Missing,
}

impl SortKey {
    /// Clé numérique, Missing si la valeur est absente
    pub fn number(value: Option<f64>) -> Self {
        value.map(SortKey::Number).unwrap_or(SortKey::Missing)
    }

    /// Clé texte, Missing si la valeur est absente
    pub fn text(value: Option<&str>) -> Self {
        value
            .map(|s| SortKey::Text(s.to_string()))
            .unwrap_or(SortKey::Missing)
    }

    /// Ordre total : nombres < textes < valeurs absentes
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
            (SortKey::Missing, _) => Ordering::Greater,
            (_, SortKey::Missing) => Ordering::Less,
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        }
    }
}

/// Un enregistrement qui peut être trié par colonne
///
/// CONCEPT RUST : Type associé
/// - Chaque type d'enregistrement définit ses propres colonnes
/// - PagedTable<Stock> n'accepte que des StockColumn
pub trait Sortable {
    type Column: Copy + PartialEq + Debug;

    fn sort_key(&self, column: Self::Column) -> SortKey;
}

/// Sens du tri
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Colonne + sens du tri courant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortStatus<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C> SortStatus<C> {
    pub fn ascending(column: C) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }
}

/// Trie des références vers les enregistrements
pub fn sort_records<'a, T: Sortable>(records: &'a [T], status: SortStatus<T::Column>) -> Vec<&'a T> {
    let mut sorted: Vec<&T> = records.iter().collect();
    // sort_by est stable : l'ordre du serveur départage les égalités
    sorted.sort_by(|a, b| a.sort_key(status.column).compare(&b.sort_key(status.column)));
    if status.direction == SortDirection::Descending {
        sorted.reverse();
    }
    sorted
}

/// Indices [début, fin) de la page (pages numérotées à partir de 1)
pub fn page_bounds(page: usize, page_size: usize) -> (usize, usize) {
    let start = page.saturating_sub(1) * page_size;
    (start, start + page_size)
}

/// Nombre de pages, au moins 1 même pour une liste vide
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

// ============================================================================
// PagedTable : cache + tri + page + ligne sélectionnée
// ============================================================================

/// État d'un tableau paginé
#[derive(Debug, Clone)]
pub struct PagedTable<T: Sortable> {
    cache: ResultCache<T>,
    sort: SortStatus<T::Column>,
    default_sort: SortStatus<T::Column>,
    page: usize,
    page_size: usize,
    selected: usize,
}

impl<T: Sortable> PagedTable<T> {
    /// Crée un tableau vide trié par `default_column` croissant
    pub fn new(default_column: T::Column, page_size: usize) -> Self {
        let sort = SortStatus::ascending(default_column);
        Self {
            cache: ResultCache::new(),
            sort,
            default_sort: sort,
            page: 1,
            page_size: page_size.max(1),
            selected: 0,
        }
    }

    /// Remplit le tableau avec une liste fraîchement chargée
    pub fn fill(&mut self, records: Vec<T>) {
        self.cache.fill(records);
        self.page = 1;
        self.selected = 0;
    }

    /// Invalide la liste et revient au tri par défaut
    pub fn clear(&mut self) {
        self.cache.clear();
        self.sort = self.default_sort;
        self.page = 1;
        self.selected = 0;
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_cached()
    }

    /// Accès direct au cache (chargement asynchrone via get_or_fetch)
    pub fn cache_mut(&mut self) -> &mut ResultCache<T> {
        &mut self.cache
    }

    pub fn sort_status(&self) -> SortStatus<T::Column> {
        self.sort
    }

    /// Change le tri ; la pagination repart de la page 1
    pub fn set_sort(&mut self, status: SortStatus<T::Column>) {
        self.sort = status;
        self.page = 1;
        self.selected = 0;
    }

    /// Même colonne : inverse le sens. Autre colonne : tri croissant dessus.
    pub fn toggle_sort(&mut self, column: T::Column) {
        let status = if self.sort.column == column {
            SortStatus {
                column,
                direction: self.sort.direction.flip(),
            }
        } else {
            SortStatus::ascending(column)
        };
        self.set_sort(status);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Nombre total d'enregistrements (toutes pages confondues)
    pub fn total_records(&self) -> usize {
        self.cache.get().map(|items| items.len()).unwrap_or(0)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_records(), self.page_size)
    }

    /// Va à une page, bornée à [1, total_pages]
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
        self.selected = 0;
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// Enregistrements de la page courante, dans l'ordre du tri
    pub fn visible(&self) -> Vec<&T> {
        let Some(items) = self.cache.get() else {
            return Vec::new();
        };
        let sorted = sort_records(items, self.sort);
        let (start, end) = page_bounds(self.page, self.page_size);
        sorted
            .into_iter()
            .skip(start)
            .take(end - start)
            .collect()
    }

    // ========================================================================
    // Sélection de ligne (dans la page courante)
    // ========================================================================

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let max_index = self.visible().len().saturating_sub(1);
        self.selected = (self.selected + 1).min(max_index);
    }

    /// Enregistrement sélectionné dans la page courante
    pub fn selected(&self) -> Option<&T> {
        self.visible().get(self.selected).copied()
    }
}
