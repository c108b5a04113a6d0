//! Integration tests for the Pinecone index adapter
//!
//! Requests and responses are verified against mockito servers standing in
//! for the data plane and the control plane.

use mockito::{Matcher, Server};
use product_search::adapters::index::PineconeIndex;
use product_search::domain::models::{IndexConfig, IndexRecord, MetadataValue, Product};
use product_search::domain::ports::{IndexQuery, VectorIndex};
use product_search::DomainError;
use serde_json::json;

fn config(host: Option<String>, control_plane_url: String) -> IndexConfig {
    IndexConfig {
        api_key: Some("pc_test_key".to_string()),
        name: Some("products".to_string()),
        host,
        control_plane_url,
        api_version: "2024-07".to_string(),
        timeout_secs: 5,
    }
}

fn index_for(server: &Server) -> PineconeIndex {
    PineconeIndex::new(&config(Some(server.url()), "http://127.0.0.1:1".to_string()))
        .expect("Failed to create index client")
}

fn product() -> Product {
    Product {
        id: "p001".to_string(),
        name: "Trail Runner".to_string(),
        description: "Lightweight running shoe".to_string(),
        price: 89.5,
        category: "Footwear".to_string(),
        brand: "Stride".to_string(),
        rating: 4.5,
        in_stock: true,
        image: "https://example.com/p001.jpg".to_string(),
        colors: vec!["red".to_string(), "blue".to_string()],
        features: vec!["breathable".to_string(), "grippy".to_string()],
    }
}

#[tokio::test]
async fn test_upsert_request_shape() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/vectors/upsert")
        .match_header("api-key", "pc_test_key")
        .match_header("x-pinecone-api-version", "2024-07")
        .match_body(Matcher::PartialJson(json!({
            "vectors": [{
                "id": "p001",
                "values": [0.5, 0.25],
                "metadata": {
                    "id": "p001",
                    "colors": "red|blue",
                    "features": "breathable|grippy",
                    "inStock": true,
                    "price": 89.5
                }
            }]
        })))
        .with_status(200)
        .with_body(r#"{"upsertedCount": 1}"#)
        .create_async()
        .await;

    let record = IndexRecord::from_product(&product(), vec![0.5, 0.25]);
    let written = index_for(&server).upsert(&[record]).await.unwrap();

    assert_eq!(written, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upsert_empty_batch_is_noop() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/vectors/upsert")
        .expect(0)
        .create_async()
        .await;

    assert_eq!(index_for(&server).upsert(&[]).await.unwrap(), 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_query_request_and_matches() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/query")
        .match_header("api-key", "pc_test_key")
        .match_body(Matcher::PartialJson(json!({
            "vector": [0.5, 0.25],
            "topK": 10,
            "includeMetadata": true
        })))
        .with_status(200)
        .with_body(
            json!({
                "matches": [
                    {
                        "id": "p001",
                        "score": 0.93,
                        "metadata": { "name": "Trail Runner", "colors": "red|blue", "price": 89.5 }
                    },
                    { "id": "p002", "score": 0.41 }
                ],
                "namespace": ""
            })
            .to_string(),
        )
        .create_async()
        .await;

    let matches = index_for(&server)
        .query(&IndexQuery::with_metadata(vec![0.5, 0.25], 10))
        .await
        .unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].id, "p001");
    assert_eq!(matches[0].score, Some(0.93));
    let metadata = matches[0].metadata.as_ref().unwrap();
    assert_eq!(metadata["colors"], MetadataValue::Text("red|blue".to_string()));
    assert_eq!(metadata["price"], MetadataValue::Number(89.5));
    assert!(matches[1].metadata.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_query_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/query")
        .with_status(500)
        .with_body("internal")
        .create_async()
        .await;

    let err = index_for(&server)
        .query(&IndexQuery::with_metadata(vec![0.1], 10))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::ExternalService { ref service, .. } if service == "pinecone"));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_host_resolved_once_through_control_plane() {
    let mut data_plane = Server::new_async().await;
    let mut control_plane = Server::new_async().await;

    let describe = control_plane
        .mock("GET", "/indexes/products")
        .match_header("api-key", "pc_test_key")
        .with_status(200)
        .with_body(
            json!({
                "name": "products",
                "dimension": 384,
                "metric": "cosine",
                "host": data_plane.url()
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let query = data_plane
        .mock("POST", "/query")
        .with_status(200)
        .with_body(r#"{"matches": []}"#)
        .expect(2)
        .create_async()
        .await;

    let index = PineconeIndex::new(&config(None, control_plane.url())).unwrap();
    for _ in 0..2 {
        let matches = index
            .query(&IndexQuery::with_metadata(vec![0.1, 0.2], 10))
            .await
            .unwrap();
        assert!(matches.is_empty());
    }

    assert_eq!(index.host().await.unwrap(), data_plane.url());
    describe.assert_async().await;
    query.assert_async().await;
}

#[tokio::test]
async fn test_unknown_index_fails() {
    let mut control_plane = Server::new_async().await;
    let _describe = control_plane
        .mock("GET", "/indexes/products")
        .with_status(404)
        .with_body(r#"{"error":{"code":"NOT_FOUND","message":"Resource products not found"}}"#)
        .create_async()
        .await;

    let index = PineconeIndex::new(&config(None, control_plane.url())).unwrap();
    let err = index
        .query(&IndexQuery::with_metadata(vec![0.1], 10))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("404"));
}

#[test]
fn test_missing_api_key_fails_fast() {
    let mut config = config(None, "http://127.0.0.1:1".to_string());
    config.api_key = None;
    assert!(matches!(
        PineconeIndex::new(&config),
        Err(DomainError::ConfigurationMissing(_))
    ));
}
