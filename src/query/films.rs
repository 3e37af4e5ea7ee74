use serde_json::{Value, json};
use uuid::Uuid;

use super::{nested_id, search_document, window};
use crate::{
    application::{
        pagination::PaginationParams,
        params::{FilmListParams, SearchParams},
    },
    domain::types::SortField,
};

pub const SEARCH_FIELDS: &[&str] = &["title", "description"];

pub fn list_query(params: &FilmListParams) -> Value {
    let mut body = window(params.pagination);

    if let Some(genre) = params.genre {
        body.insert(
            "query".to_string(),
            json!({ "bool": { "filter": [nested_id("genres", genre)] } }),
        );
    }

    if let Some(sort) = params.sort {
        body.insert(
            "sort".to_string(),
            json!([{ sort.field.as_str(): { "order": sort.order.as_str() } }]),
        );
    }

    Value::Object(body)
}

pub fn search_query(params: &SearchParams) -> Value {
    search_document(params.query.as_deref(), SEARCH_FIELDS, params.pagination)
}

/// Films carrying the genre; used by the genre reverse lookup.
pub fn by_genre_query(genre_id: Uuid, page: PaginationParams) -> Value {
    let mut body = window(page);
    body.insert(
        "query".to_string(),
        json!({ "bool": { "filter": [nested_id("genres", genre_id)] } }),
    );
    Value::Object(body)
}

/// Films where the person holds at least one role.
pub fn by_person_query(person_id: Uuid, page: PaginationParams) -> Value {
    let mut body = window(page);
    body.insert(
        "query".to_string(),
        json!({
            "bool": {
                "should": [
                    nested_id("actors", person_id),
                    nested_id("writers", person_id),
                    nested_id("directors", person_id),
                ],
                "minimum_should_match": 1
            }
        }),
    );
    Value::Object(body)
}
