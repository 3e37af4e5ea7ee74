use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::engine::{SearchEngine, SearchError};
use crate::application::repos::SearchHit;

const INDEX_NOT_FOUND: &str = "index_not_found_exception";
const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// Elasticsearch REST client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ElasticClient {
    http: Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source", default)]
    source: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorCause,
}

#[derive(Debug, Deserialize)]
struct ErrorCause {
    #[serde(rename = "type")]
    kind: String,
}

impl ElasticClient {
    pub fn new(base: &str, request_timeout: Duration) -> Result<Self, SearchError> {
        let base = Url::parse(base)
            .map_err(|err| SearchError::Unavailable(format!("invalid url `{base}`: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(SearchError::Unavailable(format!(
                "url `{base}` cannot carry a path"
            )));
        }

        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(transport)?;

        Ok(Self { http, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(target: "kinoteka::elastic", %method, %url, "search engine request");
        self.http.request(method, url)
    }
}

#[async_trait]
impl SearchEngine for ElasticClient {
    async fn ping(&self) -> Result<(), SearchError> {
        let response = self
            .request(Method::GET, &[])
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response).await.map(|_| ())
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let response = self
            .request(Method::HEAD, &[index])
            .send()
            .await
            .map_err(transport)?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(SearchError::Response {
                status: status.as_u16(),
                body: String::new(),
            }),
        }
    }

    async fn create_index(&self, index: &str, schema: &Value) -> Result<(), SearchError> {
        let response = self
            .request(Method::PUT, &[index])
            .json(schema)
            .send()
            .await
            .map_err(transport)?;

        match ensure_success(response).await {
            Ok(_) => Ok(()),
            // Another process created it between the existence check and now.
            Err(SearchError::Response { body, .. }) if error_kind(&body) == Some(ALREADY_EXISTS) => {
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<SearchHit>, SearchError> {
        let response = self
            .request(Method::GET, &[index, "_doc", id])
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            let body = response.text().await.map_err(transport)?;
            return match error_kind(&body) {
                Some(INDEX_NOT_FOUND) => Err(SearchError::IndexNotFound {
                    index: index.to_string(),
                }),
                _ => Ok(None),
            };
        }

        let response = ensure_success(response).await?;
        let document: GetResponse = response
            .json()
            .await
            .map_err(|err| SearchError::Decode(err.to_string()))?;

        Ok(document.found.then(|| SearchHit {
            id: document.id,
            score: None,
            source: document.source,
        }))
    }

    async fn search(&self, index: &str, body: &Value) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .request(Method::POST, &[index, "_search"])
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        let response = match ensure_success(response).await {
            Ok(response) => response,
            Err(SearchError::Response { status: 404, body })
                if error_kind(&body) == Some(INDEX_NOT_FOUND) =>
            {
                return Err(SearchError::IndexNotFound {
                    index: index.to_string(),
                });
            }
            Err(err) => return Err(err),
        };

        let result: SearchResponse = response
            .json()
            .await
            .map_err(|err| SearchError::Decode(err.to_string()))?;
        Ok(result.hits.hits)
    }
}

async fn ensure_success(response: Response) -> Result<Response, SearchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SearchError::Response {
        status: status.as_u16(),
        body,
    })
}

fn error_kind(body: &str) -> Option<&'static str> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    match envelope.error.kind.as_str() {
        INDEX_NOT_FOUND => Some(INDEX_NOT_FOUND),
        ALREADY_EXISTS => Some(ALREADY_EXISTS),
        _ => None,
    }
}

fn transport(err: reqwest::Error) -> SearchError {
    SearchError::Unavailable(err.to_string())
}
