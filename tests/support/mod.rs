//! In-process search engine double and router helpers shared by the integration tests.
#![allow(dead_code)]

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{
        Arc, RwLock,
        atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering},
    },
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use kinoteka::{
    application::repos::SearchHit,
    cache::{CacheConfig, CacheManager, MemoryStore},
    infra::{
        elastic::{SearchEngine, SearchError},
        http::{AppState, build_router},
    },
};

/// Interprets the subset of the query DSL the catalogue emits against JSON documents
/// held in memory. Documents are returned in insertion order unless a sort is given.
#[derive(Default)]
pub struct InMemoryEngine {
    indices: RwLock<HashMap<String, Vec<Value>>>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with the three catalogue indices present and empty.
    pub fn with_catalogue() -> Self {
        let engine = Self::new();
        for index in ["movies", "genres", "persons"] {
            engine.create(index);
        }
        engine
    }

    pub fn create(&self, index: &str) {
        self.indices
            .write()
            .expect("indices lock")
            .entry(index.to_string())
            .or_default();
    }

    pub fn insert(&self, index: &str, document: Value) {
        self.indices
            .write()
            .expect("indices lock")
            .entry(index.to_string())
            .or_default()
            .push(document);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    /// Number of document reads (`search` and `get_document`) served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    pub fn has_index(&self, index: &str) -> bool {
        self.indices
            .read()
            .expect("indices lock")
            .contains_key(index)
    }

    fn guard(&self) -> Result<(), SearchError> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(SearchError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn documents(&self, index: &str) -> Result<Vec<Value>, SearchError> {
        self.indices
            .read()
            .expect("indices lock")
            .get(index)
            .cloned()
            .ok_or_else(|| SearchError::IndexNotFound {
                index: index.to_string(),
            })
    }
}

#[async_trait]
impl SearchEngine for InMemoryEngine {
    async fn ping(&self) -> Result<(), SearchError> {
        self.guard()
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        self.guard()?;
        Ok(self.has_index(index))
    }

    async fn create_index(&self, index: &str, _schema: &Value) -> Result<(), SearchError> {
        self.guard()?;
        self.create(index);
        Ok(())
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<SearchHit>, SearchError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.guard()?;
        let found = self
            .documents(index)?
            .into_iter()
            .find(|document| document["id"].as_str() == Some(id));
        Ok(found.map(into_hit))
    }

    async fn search(&self, index: &str, body: &Value) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.guard()?;

        let mut matched: Vec<Value> = self
            .documents(index)?
            .into_iter()
            .filter(|document| match body.get("query") {
                Some(query) => matches(query, document, None),
                None => true,
            })
            .collect();

        if let Some(sorts) = body.get("sort").and_then(Value::as_array) {
            matched.sort_by(|left, right| compare(sorts, left, right));
        }

        let from = body.get("from").and_then(Value::as_u64).unwrap_or(0) as usize;
        let size = body.get("size").and_then(Value::as_u64).unwrap_or(10) as usize;

        Ok(matched
            .into_iter()
            .skip(from)
            .take(size)
            .map(into_hit)
            .collect())
    }
}

fn into_hit(document: Value) -> SearchHit {
    SearchHit {
        id: document["id"].as_str().unwrap_or_default().to_string(),
        score: None,
        source: document,
    }
}

fn compare(sorts: &[Value], left: &Value, right: &Value) -> Ordering {
    for sort in sorts {
        let Some((field, options)) = sort.as_object().and_then(|object| object.iter().next()) else {
            continue;
        };
        let a = left[field].as_f64().unwrap_or(f64::MIN);
        let b = right[field].as_f64().unwrap_or(f64::MIN);
        let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        let ordering = if options["order"] == "desc" {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Evaluate `query` against `document`. Inside a `nested` clause `scope` holds the
/// nested path so `genres.id` resolves against one array element.
fn matches(query: &Value, document: &Value, scope: Option<&str>) -> bool {
    if query.get("match_all").is_some() {
        return true;
    }

    if let Some(clauses) = query.get("bool") {
        let all = |name: &str| {
            clauses
                .get(name)
                .and_then(Value::as_array)
                .is_none_or(|list| list.iter().all(|q| matches(q, document, scope)))
        };
        let none = clauses
            .get("must_not")
            .and_then(Value::as_array)
            .is_none_or(|list| !list.iter().any(|q| matches(q, document, scope)));
        let should = match clauses.get("should").and_then(Value::as_array) {
            Some(list) if !list.is_empty() => {
                let required = clauses
                    .get("minimum_should_match")
                    .and_then(Value::as_u64)
                    .unwrap_or(1) as usize;
                list.iter()
                    .filter(|q| matches(q, document, scope))
                    .count()
                    >= required
            }
            _ => true,
        };
        return all("must") && all("filter") && none && should;
    }

    if let Some(nested) = query.get("nested") {
        let path = nested["path"].as_str().unwrap_or_default();
        return document[path].as_array().is_some_and(|elements| {
            elements
                .iter()
                .any(|element| matches(&nested["query"], element, Some(path)))
        });
    }

    if let Some(term) = query.get("term").and_then(Value::as_object) {
        return term.iter().all(|(field, expected)| {
            let expected = expected.get("value").unwrap_or(expected);
            lookup(document, field, scope) == Some(expected)
        });
    }

    if let Some(multi) = query.get("multi_match") {
        let text = multi["query"].as_str().unwrap_or_default();
        let fuzzy = multi.get("fuzziness").is_some();
        return multi["fields"].as_array().is_some_and(|fields| {
            fields.iter().filter_map(Value::as_str).any(|field| {
                let field = field.split('^').next().unwrap_or(field);
                lookup(document, field, scope)
                    .and_then(Value::as_str)
                    .is_some_and(|haystack| text_matches(text, haystack, fuzzy))
            })
        });
    }

    false
}

fn lookup<'a>(document: &'a Value, field: &str, scope: Option<&str>) -> Option<&'a Value> {
    let local = match scope {
        Some(path) => field.strip_prefix(path)?.strip_prefix('.')?,
        None => field,
    };
    document.get(local)
}

fn text_matches(query: &str, haystack: &str, fuzzy: bool) -> bool {
    let words: Vec<String> = tokens(haystack);
    tokens(query).iter().any(|token| {
        let allowed = if fuzzy { auto_fuzziness(token) } else { 0 };
        words.iter().any(|word| levenshtein(token, word) <= allowed)
    })
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn auto_fuzziness(token: &str) -> usize {
    match token.chars().count() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, left) in a.chars().enumerate() {
        let mut current = vec![i + 1];
        for (j, right) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(left != *right);
            current.push(substitution.min(previous[j + 1] + 1).min(current[j] + 1));
        }
        previous = current;
    }
    previous[b.len()]
}

pub fn genre_doc(id: Uuid, name: &str) -> Value {
    json!({ "id": id.to_string(), "name": name })
}

pub fn person_doc(id: Uuid, name: &str) -> Value {
    json!({ "id": id.to_string(), "name": name })
}

pub fn film_doc(id: Uuid, title: &str, rating: f64) -> Value {
    json!({
        "id": id.to_string(),
        "title": title,
        "description": null,
        "imdb_rating": rating,
        "genres": [],
        "actors": [],
        "writers": [],
        "directors": [],
    })
}

/// Append `{id, name}` to one of the nested arrays of a film document.
pub fn with_ref(mut film: Value, role: &str, id: Uuid, name: &str) -> Value {
    if let Some(list) = film[role].as_array_mut() {
        list.push(json!({ "id": id.to_string(), "name": name }));
    }
    film
}

pub fn memory_cache() -> CacheManager {
    let config = CacheConfig::default();
    CacheManager::new(Arc::new(MemoryStore::new(&config)), config)
}

pub fn app(engine: Arc<InMemoryEngine>, cache: CacheManager) -> Router {
    build_router(AppState::new(engine, cache))
}

/// Issue a GET and decode the body as JSON (`Value::Null` for empty bodies).
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header(header::HOST, "catalogue.test")
        .body(Body::empty())
        .expect("request builds");
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body collects");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

pub fn ids(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|item| item["id"].as_str().expect("id field").to_string())
        .collect()
}
