//! Validated query parameters for list and search operations.

use thiserror::Error;
use uuid::Uuid;

use crate::{
    application::pagination::{PaginationError, PaginationParams},
    domain::types::{FilmSortField, SortField, SortOrder},
};

/// Sort applied to the film catalogue when the client does not ask for one.
pub const DEFAULT_FILM_SORT: &str = "-imdb_rating";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("cannot sort by `{field}`; allowed fields: {}", allowed.join(", "))]
    InvalidSortField {
        field: String,
        allowed: Vec<&'static str>,
    },
    #[error(transparent)]
    InvalidPagination(#[from] PaginationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortParams<F: SortField> {
    pub field: F,
    pub order: SortOrder,
}

impl<F: SortField> SortParams<F> {
    /// Parse `field` or `-field`; the leading minus selects descending order.
    pub fn parse(raw: &str) -> Result<Self, ParamsError> {
        let (name, order) = match raw.strip_prefix('-') {
            Some(rest) => (rest, SortOrder::Desc),
            None => (raw, SortOrder::Asc),
        };

        let field = F::lookup(name).ok_or_else(|| ParamsError::InvalidSortField {
            field: name.to_string(),
            allowed: F::allowed().iter().map(|field| field.as_str()).collect(),
        })?;

        Ok(Self { field, order })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: Option<String>,
    pub pagination: PaginationParams,
}

impl SearchParams {
    /// Blank queries are dropped so the engine matches every document.
    pub fn new(query: Option<String>, pagination: PaginationParams) -> Self {
        let query = query
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Self { query, pagination }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmListParams {
    pub genre: Option<Uuid>,
    pub pagination: PaginationParams,
    pub sort: Option<SortParams<FilmSortField>>,
}

impl FilmListParams {
    /// A missing `sort` falls back to [`DEFAULT_FILM_SORT`]; an empty one disables sorting.
    pub fn parse(
        genre: Option<Uuid>,
        pagination: PaginationParams,
        sort: Option<&str>,
    ) -> Result<Self, ParamsError> {
        let sort = match sort.unwrap_or(DEFAULT_FILM_SORT).trim() {
            "" => None,
            raw => Some(SortParams::parse(raw)?),
        };

        Ok(Self {
            genre,
            pagination,
            sort,
        })
    }
}
