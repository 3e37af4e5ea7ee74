use serde_json::Value;
use uuid::Uuid;

use super::{films, window};
use crate::application::pagination::PaginationParams;

pub fn all_query(page: PaginationParams) -> Value {
    Value::Object(window(page))
}

/// Reverse lookup executed against the films index.
pub fn films_query(genre_id: Uuid, page: PaginationParams) -> Value {
    films::by_genre_query(genre_id, page)
}
