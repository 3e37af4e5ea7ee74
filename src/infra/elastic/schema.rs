//! Index definitions and idempotent creation.

use std::sync::OnceLock;

use serde_json::Value;
use tracing::info;

use super::engine::{SearchEngine, SearchError};
use crate::query::{FILMS_INDEX, GENRES_INDEX, PERSONS_INDEX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    Movies,
    Genres,
    Persons,
}

impl Index {
    pub const ALL: [Index; 3] = [Index::Movies, Index::Genres, Index::Persons];

    pub fn name(self) -> &'static str {
        match self {
            Index::Movies => FILMS_INDEX,
            Index::Genres => GENRES_INDEX,
            Index::Persons => PERSONS_INDEX,
        }
    }

    fn raw_schema(self) -> &'static str {
        match self {
            Index::Movies => include_str!("../../../schemas/movies.json"),
            Index::Genres => include_str!("../../../schemas/genres.json"),
            Index::Persons => include_str!("../../../schemas/persons.json"),
        }
    }

    /// Settings and mappings sent when the index is created.
    pub fn schema(self) -> Result<&'static Value, SearchError> {
        static MOVIES: OnceLock<Value> = OnceLock::new();
        static GENRES: OnceLock<Value> = OnceLock::new();
        static PERSONS: OnceLock<Value> = OnceLock::new();

        let cell = match self {
            Index::Movies => &MOVIES,
            Index::Genres => &GENRES,
            Index::Persons => &PERSONS,
        };
        if let Some(schema) = cell.get() {
            return Ok(schema);
        }
        let parsed: Value = serde_json::from_str(self.raw_schema()).map_err(|err| {
            SearchError::Decode(format!("schema for `{}` is invalid: {err}", self.name()))
        })?;
        Ok(cell.get_or_init(|| parsed))
    }
}

/// Create every missing index. Returns the names of the indices that were created.
pub async fn ensure_indices(engine: &dyn SearchEngine) -> Result<Vec<&'static str>, SearchError> {
    let mut created = Vec::new();
    for index in Index::ALL {
        let name = index.name();
        if engine.index_exists(name).await? {
            info!(target: "kinoteka::elastic", index = name, "Index already exists");
            continue;
        }
        engine.create_index(name, index.schema()?).await?;
        info!(target: "kinoteka::elastic", index = name, "Created index");
        created.push(name);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_parse_and_declare_nested_roles() {
        for index in Index::ALL {
            let schema = index.schema().expect("schema parses");
            assert!(schema["mappings"]["properties"]["id"].is_object());
        }

        let movies = Index::Movies.schema().expect("movies schema");
        for role in ["genres", "actors", "writers", "directors"] {
            assert_eq!(movies["mappings"]["properties"][role]["type"], "nested");
        }
    }
}
