//! Integration tests: auth injection, envelope handling, default container tag, upload.

mod common;

use common::{slow_stub, stub, stub_raw};
use momo_client::{
    CancellationToken, ClientError, ErrorCode, MomoClient, MomoClientConfig, RawRequest,
    RequestOptions, UploadFile,
};
use momo_types::{
    CreateDocumentRequest, CreateMemoryRequest, ListDocumentsQuery, ListMemoriesQuery,
    SearchRequest, UploadDocumentParams,
};
use serde_json::json;
use std::time::Duration;

fn client(config: MomoClientConfig) -> MomoClient {
    MomoClient::new(config).unwrap()
}

fn health_body() -> serde_json::Value {
    json!({ "data": { "status": "ok", "version": "1.0.0", "uptime": 100 } })
}

#[tokio::test]
async fn adds_bearer_header_when_api_key_is_set() {
    let stub = stub(200, health_body()).await;
    let c = client(MomoClientConfig::new(stub.base_url()).with_api_key("test-key-123"));

    c.health().check(&RequestOptions::default()).await.unwrap();

    let req = stub.only_request();
    assert_eq!(req.header("authorization"), Some("Bearer test-key-123"));
    assert_eq!(req.path, "/api/v1/health");
}

#[tokio::test]
async fn omits_authorization_without_key() {
    let stub = stub(200, health_body()).await;
    let c = client(MomoClientConfig::new(stub.base_url()));

    c.health().check(&RequestOptions::default()).await.unwrap();

    assert_eq!(stub.only_request().header("authorization"), None);
}

#[tokio::test]
async fn key_provider_is_awaited_per_request() {
    let stub = stub(200, health_body()).await;
    let c = client(
        MomoClientConfig::new(stub.base_url())
            .with_api_key("static-key")
            .with_key_provider(|| async { Some("dynamic-key".to_string()) }),
    );

    c.health().check(&RequestOptions::default()).await.unwrap();

    assert_eq!(stub.only_request().header("authorization"), Some("Bearer dynamic-key"));
}

#[tokio::test]
async fn per_call_headers_are_additive() {
    let stub = stub(200, health_body()).await;
    let c = client(MomoClientConfig::new(stub.base_url()).with_api_key("k"));

    let opts = RequestOptions::new().with_header("x-request-id", "abc");
    c.health().check(&opts).await.unwrap();

    let req = stub.only_request();
    assert_eq!(req.header("x-request-id"), Some("abc"));
    assert_eq!(req.header("authorization"), Some("Bearer k"));
}

#[tokio::test]
async fn converts_error_envelope_to_momo_error() {
    let stub = stub(
        401,
        json!({ "error": { "code": "unauthorized", "message": "Missing or invalid API key" } }),
    )
    .await;
    let c = client(MomoClientConfig::new(stub.base_url()));

    let err = c
        .search()
        .search(SearchRequest::new("hello"), &RequestOptions::default())
        .await
        .unwrap_err();

    match err {
        ClientError::Api(e) => {
            assert_eq!(e.status, 401);
            assert_eq!(e.code, ErrorCode::Unauthorized);
            assert_eq!(e.message, "Missing or invalid API key");
            assert_eq!(e.path, "/api/v1/search");
            assert_eq!(e.method, "POST");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn falls_back_to_status_code_when_envelope_lacks_code() {
    let stub = stub(404, json!({})).await;
    let c = client(MomoClientConfig::new(stub.base_url()));

    let err = c
        .documents()
        .get("nonexistent", &RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.code(), Some(ErrorCode::NotFound));
}

#[tokio::test]
async fn non_json_failure_still_normalizes() {
    let stub = stub_raw(503, "upstream down").await;
    let c = client(MomoClientConfig::new(stub.base_url()));

    let err = c.admin().run_forgetting(&RequestOptions::default()).await.unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::InternalError));
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn unwraps_data_envelope() {
    let stub = stub(
        200,
        json!({
            "data": {
                "id": "doc-123",
                "title": "Test Doc",
                "content": "hello world",
                "containerTags": [],
                "metadata": {},
                "createdAt": "2025-01-01T00:00:00Z",
                "updatedAt": "2025-01-01T00:00:00Z"
            }
        }),
    )
    .await;
    let c = client(MomoClientConfig::new(stub.base_url()).with_api_key("key"));

    let doc = c.documents().get("doc-123", &RequestOptions::default()).await.unwrap();

    assert_eq!(doc.document_id, "doc-123");
    assert_eq!(doc.content.as_deref(), Some("hello world"));

    let raw: serde_json::Value = c
        .raw()
        .json(RawRequest::get("/api/v1/documents").segment("doc-123"), &RequestOptions::default())
        .await
        .unwrap();
    assert!(raw.get("data").is_none());
    assert_eq!(raw["id"], "doc-123");
}

#[tokio::test]
async fn success_body_without_id_is_a_decode_error() {
    let stub = stub(200, json!({})).await;
    let c = client(MomoClientConfig::new(stub.base_url()));

    let err = c
        .documents()
        .get("doc-1", &RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn null_fields_in_payload_decode_as_defaults() {
    let stub = stub(
        200,
        json!({ "data": { "id": "doc-1", "metadata": null, "containerTags": null } }),
    )
    .await;
    let c = client(MomoClientConfig::new(stub.base_url()));

    let doc = c.documents().get("doc-1", &RequestOptions::default()).await.unwrap();

    assert_eq!(doc.document_id, "doc-1");
    assert!(doc.container_tags.is_empty());
    assert!(doc.metadata.is_empty());
}

#[tokio::test]
async fn passes_through_bodies_without_envelope() {
    let stub = stub(200, json!({ "status": "ok", "version": "1.0.0", "uptime": 100 })).await;
    let c = client(MomoClientConfig::new(stub.base_url()));

    let health = c.health().check(&RequestOptions::default()).await.unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.version.as_deref(), Some("1.0.0"));
}

#[tokio::test]
async fn applies_default_container_tag() {
    let stub = stub(200, json!({ "data": { "id": "doc-123", "ingestionId": "ing-456" } })).await;
    let c = client(
        MomoClientConfig::new(stub.base_url())
            .with_api_key("key")
            .with_default_container_tag("my-container"),
    );

    let created = c
        .documents()
        .create(CreateDocumentRequest::new("test content"), &RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(created.document_id, "doc-123");
    assert_eq!(stub.only_request().json()["containerTag"], "my-container");
}

#[tokio::test]
async fn explicit_container_tag_wins() {
    let stub = stub(200, json!({ "data": { "id": "doc-123", "ingestionId": "ing-456" } })).await;
    let c = client(
        MomoClientConfig::new(stub.base_url())
            .with_api_key("key")
            .with_default_container_tag("default-tag"),
    );

    let body = CreateDocumentRequest {
        container_tag: Some("explicit-tag".to_string()),
        ..CreateDocumentRequest::new("test")
    };
    c.documents().create(body, &RequestOptions::default()).await.unwrap();

    assert_eq!(stub.only_request().json()["containerTag"], "explicit-tag");
}

#[tokio::test]
async fn search_uses_default_tag_as_single_element_list() {
    let stub = stub(200, json!({ "data": { "results": [] } })).await;
    let c = client(MomoClientConfig::new(stub.base_url()).with_default_container_tag("T"));

    let res = c
        .search()
        .search(SearchRequest::new("q"), &RequestOptions::default())
        .await
        .unwrap();

    assert!(res.results.is_empty());
    let body = stub.only_request().json();
    assert_eq!(body["containerTags"], json!(["T"]));
    assert_eq!(body["q"], "q");
}

#[tokio::test]
async fn memory_list_sends_default_tag_as_query() {
    let stub = stub(200, json!({ "data": { "memories": [] } })).await;
    let c = client(MomoClientConfig::new(stub.base_url()).with_default_container_tag("T"));

    let list = c
        .memories()
        .list(
            ListMemoriesQuery {
                limit: Some(5),
                ..Default::default()
            },
            &RequestOptions::default(),
        )
        .await
        .unwrap();

    assert!(list.memories.is_empty());
    let req = stub.only_request();
    assert_eq!(req.path, "/api/v1/memories");
    assert_eq!(req.query.as_deref(), Some("containerTag=T&limit=5"));
}

#[tokio::test]
async fn document_list_repeats_bracketed_tags() {
    let stub = stub(200, json!({ "data": { "documents": [] } })).await;
    let c = client(MomoClientConfig::new(stub.base_url()).with_default_container_tag("ignored"));

    c.documents()
        .list(
            ListDocumentsQuery {
                container_tags: Some(vec!["a".to_string(), "b".to_string()]),
                limit: Some(10),
                cursor: None,
            },
            &RequestOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(
        stub.only_request().query.as_deref(),
        Some("containerTags[]=a&containerTags[]=b&limit=10")
    );
}

#[tokio::test]
async fn memory_create_uses_default_tag() {
    let stub = stub(200, json!({ "data": { "id": "mem-1", "content": "c" } })).await;
    let c = client(MomoClientConfig::new(stub.base_url()).with_default_container_tag("T"));

    let mem = c
        .memories()
        .create(CreateMemoryRequest::new("c"), &RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(mem.id, "mem-1");
    assert_eq!(stub.only_request().json()["containerTag"], "T");
}

#[tokio::test]
async fn forget_by_id_sends_delete_with_body() {
    let stub = stub(200, json!({ "data": { "id": "mem-123", "forgotten": true } })).await;
    let c = client(MomoClientConfig::new(stub.base_url()).with_api_key("key"));

    let res = c
        .memories()
        .forget_by_id("mem-123", Some("test reason".to_string()), &RequestOptions::default())
        .await
        .unwrap();

    assert!(res.forgotten);
    let req = stub.only_request();
    assert_eq!(req.method, axum::http::Method::DELETE);
    assert_eq!(req.path, "/api/v1/memories/mem-123");
    assert_eq!(req.json()["reason"], "test reason");
}

#[tokio::test]
async fn path_ids_are_percent_encoded() {
    let stub = stub(200, json!({ "data": { "nodes": [], "links": [] } })).await;
    let c = client(MomoClientConfig::new(stub.base_url()));

    c.graph()
        .container_graph("team/a b", &Default::default(), &RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(stub.only_request().path, "/api/v1/containers/team%2Fa%20b/graph");
}

#[tokio::test]
async fn timeout_aborts_the_request() {
    let stub = slow_stub(Duration::from_secs(5), health_body()).await;
    let c = client(MomoClientConfig::new(stub.base_url()));

    let opts = RequestOptions::new().with_timeout(Duration::from_millis(100));
    let err = c.health().check(&opts).await.unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
}

#[tokio::test]
async fn cancellation_token_aborts_the_request() {
    let stub = slow_stub(Duration::from_secs(5), health_body()).await;
    let c = client(MomoClientConfig::new(stub.base_url()));

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });
    let opts = RequestOptions::new()
        .with_cancel(token)
        .with_timeout(Duration::from_secs(10));
    let err = c.health().check(&opts).await.unwrap_err();

    assert!(matches!(err, ClientError::Cancelled), "got {:?}", err);
}

#[tokio::test]
async fn rejects_empty_base_url() {
    let err = MomoClient::new(MomoClientConfig::new("")).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}

#[tokio::test]
async fn upload_builds_multipart_with_auth() {
    let stub = stub(200, json!({ "data": { "id": "doc-upload-1", "ingestionId": "ing-789" } })).await;
    let c = client(MomoClientConfig::new(stub.base_url()).with_api_key("test-key-upload"));

    let file = UploadFile::new("test file content").with_mime_type("text/plain");
    let res = c
        .documents()
        .upload(file, UploadDocumentParams::default(), &RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(res.document_id, "doc-upload-1");
    let req = stub.only_request();
    assert_eq!(req.method, axum::http::Method::POST);
    assert_eq!(req.path, "/api/v1/documents:upload");
    assert_eq!(req.header("authorization"), Some("Bearer test-key-upload"));
    assert!(req
        .header("content-type")
        .unwrap_or_default()
        .starts_with("multipart/form-data"));
    let body = req.body_text();
    assert!(body.contains("name=\"file\"; filename=\"blob\""));
    assert!(body.contains("test file content"));
    assert!(!body.contains("name=\"containerTag\""));
}

#[tokio::test]
async fn upload_sends_optional_fields() {
    let stub = stub(200, json!({ "data": { "id": "doc-upload-4", "ingestionId": "ing-792" } })).await;
    let c = client(MomoClientConfig::new(stub.base_url()).with_default_container_tag("upload-tag"));

    let params = UploadDocumentParams {
        extract_memories: Some(true),
        content_type: Some("audio/mpeg".to_string()),
        metadata: Some("{\"k\":1}".to_string()),
        ..Default::default()
    };
    c.documents()
        .upload(UploadFile::new(vec![1u8, 2, 3]), params, &RequestOptions::default())
        .await
        .unwrap();

    let body = stub.only_request().body_text();
    assert!(body.contains("name=\"containerTag\"\r\n\r\nupload-tag"));
    assert!(body.contains("name=\"extractMemories\"\r\n\r\ntrue"));
    assert!(body.contains("name=\"contentType\"\r\n\r\naudio/mpeg"));
    assert!(body.contains("name=\"metadata\"\r\n\r\n{\"k\":1}"));
}

#[tokio::test]
async fn upload_from_path_uses_file_name() {
    let stub = stub(200, json!({ "data": { "id": "doc-upload-3", "ingestionId": "ing-791" } })).await;
    let c = client(MomoClientConfig::new(stub.base_url()).with_api_key("key"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.txt");
    std::fs::write(&path, "sample fixture").unwrap();

    c.documents()
        .upload_from_path(&path, UploadDocumentParams::default(), &RequestOptions::default())
        .await
        .unwrap();

    let body = stub.only_request().body_text();
    assert!(body.contains("filename=\"sample.txt\""));
    assert!(body.contains("sample fixture"));
}

#[tokio::test]
async fn upload_treats_error_envelope_as_failure_even_on_200() {
    let stub = stub(200, json!({ "error": { "message": "quota exceeded" } })).await;
    let c = client(MomoClientConfig::new(stub.base_url()));

    let err = c
        .documents()
        .upload(UploadFile::new("x"), UploadDocumentParams::default(), &RequestOptions::default())
        .await
        .unwrap_err();

    match err {
        ClientError::Api(e) => {
            assert_eq!(e.status, 200);
            assert_eq!(e.code, ErrorCode::InternalError);
            assert_eq!(e.message, "quota exceeded");
            assert_eq!(e.path, "/api/v1/documents:upload");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn upload_failure_uses_status_table() {
    let stub = stub(409, json!({ "detail": "duplicate" })).await;
    let c = client(MomoClientConfig::new(stub.base_url()));

    let err = c
        .documents()
        .upload(UploadFile::new("x"), UploadDocumentParams::default(), &RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::Conflict));
}
