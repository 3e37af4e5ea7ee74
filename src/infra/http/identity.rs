//! Request identity extraction for cache keys.

use axum::{
    extract::FromRequestParts,
    http::{header::HOST, request::Parts},
};

use crate::{application::error::AppError, cache::RequestIdentity};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

impl<S: Send + Sync> FromRequestParts<S> for RequestIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let scheme = parts
            .headers
            .get(FORWARDED_PROTO)
            .and_then(|value| value.to_str().ok())
            .or_else(|| parts.uri.scheme_str())
            .unwrap_or("http");

        let host = parts
            .headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| parts.uri.authority().map(|authority| authority.as_str()))
            .unwrap_or("localhost");

        RequestIdentity::from_parts(scheme, host, parts.uri.path(), parts.uri.query())
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> RequestIdentity {
        let (mut parts, _) = request.into_parts();
        RequestIdentity::from_request_parts(&mut parts, &())
            .await
            .expect("identity")
    }

    #[tokio::test]
    async fn identity_uses_host_header_and_sorted_query() {
        let request = Request::builder()
            .uri("/api/v1/films?sort=-imdb_rating&page_size=8")
            .header(HOST, "catalogue.local:8000")
            .body(())
            .expect("request");

        assert_eq!(
            extract(request).await.as_str(),
            "http://catalogue.local:8000/api/v1/films?page_size=8&sort=-imdb_rating"
        );
    }

    #[tokio::test]
    async fn forwarded_proto_overrides_scheme() {
        let request = Request::builder()
            .uri("/api/v1/genres")
            .header(HOST, "catalogue.example")
            .header(FORWARDED_PROTO, "https")
            .body(())
            .expect("request");

        assert_eq!(
            extract(request).await.as_str(),
            "https://catalogue.example/api/v1/genres"
        );
    }

    #[tokio::test]
    async fn missing_host_falls_back_to_localhost() {
        let request = Request::builder()
            .uri("/api/v1/persons")
            .body(())
            .expect("request");

        assert_eq!(extract(request).await.as_str(), "http://localhost/api/v1/persons");
    }
}
