//! `ElasticClient` against a mocked Elasticsearch REST endpoint.

use std::time::Duration;

use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

use kinoteka::infra::elastic::{ElasticClient, SearchEngine, SearchError};

fn client(server: &MockServer) -> ElasticClient {
    ElasticClient::new(&server.uri(), Duration::from_secs(5)).expect("client builds")
}

fn index_missing(index: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "error": {
            "type": "index_not_found_exception",
            "reason": format!("no such index [{index}]"),
        },
        "status": 404,
    }))
}

#[tokio::test]
async fn search_posts_body_and_parses_hits() {
    let server = MockServer::start().await;
    let query = json!({ "size": 1, "from": 0 });

    Mock::given(method("POST"))
        .and(path("/movies/_search"))
        .and(body_json(&query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 1,
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "hits": [{
                    "_index": "movies",
                    "_id": "3d825f60-9fff-4dfe-b294-1a45fa1e115d",
                    "_score": 1.0,
                    "_source": { "title": "Star Wars" }
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hits = client(&server)
        .search("movies", &query)
        .await
        .expect("search succeeds");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "3d825f60-9fff-4dfe-b294-1a45fa1e115d");
    assert_eq!(hits[0].score, Some(1.0));
    assert_eq!(hits[0].source["title"], "Star Wars");
}

#[tokio::test]
async fn search_reports_missing_index() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/genres/_search"))
        .respond_with(index_missing("genres"))
        .mount(&server)
        .await;

    let err = client(&server)
        .search("genres", &json!({}))
        .await
        .expect_err("index is missing");

    assert!(matches!(err, SearchError::IndexNotFound { index } if index == "genres"));
}

#[tokio::test]
async fn server_errors_keep_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/movies/_search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("shard failure"))
        .mount(&server)
        .await;

    let err = client(&server)
        .search("movies", &json!({}))
        .await
        .expect_err("server error");

    assert!(matches!(
        err,
        SearchError::Response { status: 500, ref body } if body == "shard failure"
    ));
}

#[tokio::test]
async fn get_document_found_and_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/persons/_doc/known"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "persons",
            "_id": "known",
            "found": true,
            "_source": { "name": "Mark Hamill" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/persons/_doc/unknown"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "_index": "persons",
            "_id": "unknown",
            "found": false
        })))
        .mount(&server)
        .await;

    let client = client(&server);

    let hit = client
        .get_document("persons", "known")
        .await
        .expect("request succeeds")
        .expect("document present");
    assert_eq!(hit.id, "known");
    assert_eq!(hit.source["name"], "Mark Hamill");

    let missing = client
        .get_document("persons", "unknown")
        .await
        .expect("request succeeds");
    assert!(missing.is_none());
}

#[tokio::test]
async fn get_document_distinguishes_missing_index() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/persons/_doc/any"))
        .respond_with(index_missing("persons"))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_document("persons", "any")
        .await
        .expect_err("index is missing");

    assert!(matches!(err, SearchError::IndexNotFound { .. }));
}

#[tokio::test]
async fn index_existence_uses_head() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/movies"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/genres"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.index_exists("movies").await.expect("head succeeds"));
    assert!(!client.index_exists("genres").await.expect("head succeeds"));
}

#[tokio::test]
async fn create_index_tolerates_concurrent_creation() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/persons"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "resource_already_exists_exception",
                "reason": "index [persons] already exists"
            },
            "status": 400
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .create_index("persons", &json!({ "mappings": {} }))
        .await
        .expect("already existing index is fine");
}

#[tokio::test]
async fn ping_requires_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server).ping().await.expect_err("cluster is down");
    assert!(matches!(err, SearchError::Response { status: 503, .. }));
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/es/movies/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hits": { "hits": [] } })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ElasticClient::new(&format!("{}/es/", server.uri()), Duration::from_secs(5))
        .expect("client builds");
    let hits = client
        .search("movies", &json!({}))
        .await
        .expect("search succeeds");
    assert!(hits.is_empty());
}

#[test]
fn rejects_urls_without_a_path() {
    let err = ElasticClient::new("mailto:ops@example.com", Duration::from_secs(1))
        .expect_err("not a base url");
    assert!(matches!(err, SearchError::Unavailable(_)));
}
