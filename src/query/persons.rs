use serde_json::Value;
use uuid::Uuid;

use super::{films, search_document, window};
use crate::application::{pagination::PaginationParams, params::SearchParams};

pub const SEARCH_FIELDS: &[&str] = &["name"];

pub fn all_query(page: PaginationParams) -> Value {
    Value::Object(window(page))
}

pub fn search_query(params: &SearchParams) -> Value {
    search_document(params.query.as_deref(), SEARCH_FIELDS, params.pagination)
}

/// Reverse lookup executed against the films index.
pub fn films_query(person_id: Uuid, page: PaginationParams) -> Value {
    films::by_person_query(person_id, page)
}
