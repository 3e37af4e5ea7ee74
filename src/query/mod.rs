//! Pure translation of validated parameters into search-engine query documents.
//!
//! Every builder starts from the result window (`size`/`from`) and only adds a `query`
//! clause when a filter or search text is present, so an unfiltered request never
//! matches nothing.

pub mod films;
pub mod genres;
pub mod persons;

use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::application::pagination::PaginationParams;

pub const FILMS_INDEX: &str = "movies";
pub const GENRES_INDEX: &str = "genres";
pub const PERSONS_INDEX: &str = "persons";

fn window(page: PaginationParams) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("size".to_string(), json!(page.limit()));
    body.insert("from".to_string(), json!(page.offset()));
    body
}

/// Match documents whose nested `path` array holds an element with the given id.
fn nested_id(path: &str, id: Uuid) -> Value {
    json!({
        "nested": {
            "path": path,
            "query": {
                "term": { format!("{path}.id"): id.to_string() }
            }
        }
    })
}

fn fuzzy_text(query: &str, fields: &[&str]) -> Value {
    json!({
        "multi_match": {
            "query": query,
            "fields": fields,
            "fuzziness": "AUTO"
        }
    })
}

/// Window plus an optional `bool.must` full-text clause.
fn search_document(query: Option<&str>, fields: &[&str], page: PaginationParams) -> Value {
    let mut body = window(page);
    if let Some(text) = query {
        body.insert(
            "query".to_string(),
            json!({ "bool": { "must": [fuzzy_text(text, fields)] } }),
        );
    }
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_id_targets_path_field() {
        let id = Uuid::nil();
        assert_eq!(
            nested_id("actors", id),
            json!({
                "nested": {
                    "path": "actors",
                    "query": {"term": {"actors.id": "00000000-0000-0000-0000-000000000000"}}
                }
            })
        );
    }
}
