//! Closed enumerations shared by query parameters and query documents.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// A sortable document field drawn from a per-entity allow-list.
pub trait SortField: Copy + Eq + std::fmt::Debug + Send + Sync + 'static {
    /// Every field the entity accepts, in display order.
    fn allowed() -> &'static [Self];

    /// Name of the field inside the search-engine document.
    fn as_str(self) -> &'static str;

    fn lookup(name: &str) -> Option<Self> {
        Self::allowed()
            .iter()
            .copied()
            .find(|field| field.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilmSortField {
    ImdbRating,
}

impl SortField for FilmSortField {
    fn allowed() -> &'static [Self] {
        &[FilmSortField::ImdbRating]
    }

    fn as_str(self) -> &'static str {
        match self {
            FilmSortField::ImdbRating => "imdb_rating",
        }
    }
}
