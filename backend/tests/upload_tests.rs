mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request};
use common::*;
use doclink_backend::{
    document_storage::{DocumentStorage, InMemoryObjectStore},
    server,
    types::Environment,
};
use http::StatusCode;
use tower::ServiceExt;

const MIB: usize = 1024 * 1024;

// Happy path tests

#[tokio::test]
async fn test_upload_invoice_pdf_end_to_end() {
    let setup = TestSetup::new();
    let data = generate_test_document(2 * MIB);

    let response = setup
        .upload_file("invoice.pdf", "application/pdf", &data)
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["type"], "application/pdf");
    assert_eq!(body["size"], 2_097_152);
    assert_eq!(body["filename"], "invoice.pdf");

    let url = body["url"].as_str().unwrap();
    assert!(url.contains("invoice.pdf"));
    let (_, filename) = split_object_url(url, TEST_PUBLIC_BASE_URL, TEST_BUCKET)
        .expect("URL should be {base}/{bucket}/{digits}-{filename}");
    assert_eq!(filename, "invoice.pdf");

    let puts = setup.object_store.put_requests().await;
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].bucket, TEST_BUCKET);
    assert_eq!(puts[0].body.len(), 2 * MIB);
    assert_eq!(puts[0].content_disposition, "inline");
    assert!(url.ends_with(&puts[0].key));
}

#[tokio::test]
async fn test_pdf_content_type_ignores_browser_reported_type() {
    let setup = TestSetup::new();

    for declared in ["application/octet-stream", "text/plain", "application/x-pdf"] {
        let response = setup.upload_file("report.pdf", declared, b"%PDF-1.4").await;

        assert_eq!(response.status(), StatusCode::OK, "declared: {declared}");
        let body = parse_response_body(response).await;
        assert_eq!(body["type"], "application/pdf", "declared: {declared}");
    }
}

#[tokio::test]
async fn test_word_documents_resolve_to_msword() {
    let setup = TestSetup::new();

    for (filename, declared) in [
        ("contract.doc", "application/octet-stream"),
        (
            "contract.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ),
    ] {
        let response = setup.upload_file(filename, declared, b"PK\x03\x04").await;

        assert_eq!(response.status(), StatusCode::OK, "filename: {filename}");
        let body = parse_response_body(response).await;
        assert_eq!(body["type"], "application/msword", "filename: {filename}");
    }

    let puts = setup.object_store.put_requests().await;
    assert!(puts.iter().all(|p| p.content_type == "application/msword"));
}

#[tokio::test]
async fn test_same_filename_twice_produces_distinct_urls() {
    let setup = TestSetup::new();

    let first = setup.upload_file("report.pdf", "application/pdf", b"%PDF-1").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = setup.upload_file("report.pdf", "application/pdf", b"%PDF-2").await;

    let first = parse_response_body(first).await;
    let second = parse_response_body(second).await;
    assert_ne!(first["url"], second["url"]);

    let puts = setup.object_store.put_requests().await;
    assert_eq!(puts.len(), 2);
    assert_ne!(puts[0].key, puts[1].key);
}

#[tokio::test]
async fn test_other_fields_are_ignored() {
    let setup = TestSetup::new();
    let data = generate_test_document(1024);

    let response = setup
        .send_multipart(
            "/api/upload",
            &[
                MultipartPart::text("note", "quarterly numbers"),
                MultipartPart::file("file", "q3.pdf", "application/pdf", &data),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(setup.object_store.put_count().await, 1);
}

#[tokio::test]
async fn test_client_directories_are_stripped_from_filename() {
    let setup = TestSetup::new();

    let response = setup
        .upload_file("C:\\Users\\me\\scan.pdf", "application/pdf", b"%PDF")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["filename"], "scan.pdf");
    assert!(!body["url"].as_str().unwrap().contains("Users"));
}

// Missing file tests

#[tokio::test]
async fn test_missing_file_field_returns_400_without_storage_calls() {
    let setup = TestSetup::new();

    let response = setup
        .send_multipart("/api/upload", &[MultipartPart::text("other", "value")])
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "No file uploaded");
    assert_eq!(setup.object_store.put_count().await, 0);
}

#[tokio::test]
async fn test_file_field_without_filename_is_missing() {
    let setup = TestSetup::new();

    let response = setup
        .send_multipart("/api/upload", &[MultipartPart::text("file", "not a file")])
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(setup.object_store.put_count().await, 0);
}

#[tokio::test]
async fn test_empty_file_is_missing() {
    let setup = TestSetup::new();

    let response = setup.upload_file("empty.pdf", "application/pdf", b"").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert!(body["error"].is_string());
    assert_eq!(setup.object_store.put_count().await, 0);
}

#[tokio::test]
async fn test_non_multipart_request_is_missing_file() {
    let setup = TestSetup::new();

    let response = setup
        .send_post_request("/api/upload", "application/json", b"{}".to_vec())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "No file uploaded");
    assert_eq!(setup.object_store.put_count().await, 0);
}

// Server-side revalidation tests

#[tokio::test]
async fn test_unsupported_type_is_rejected_before_storage() {
    let setup = TestSetup::new();

    let response = setup.upload_file("photo.png", "image/png", b"\x89PNG").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("photo.png"));
    assert_eq!(setup.object_store.put_count().await, 0);
}

#[tokio::test]
async fn test_file_just_over_limit_is_rejected() {
    let setup = TestSetup::new();
    let data = generate_test_document(10 * MIB + 1);

    let response = setup.upload_file("big.pdf", "application/pdf", &data).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = parse_response_body(response).await;
    assert!(body["error"].is_string());
    assert_eq!(setup.object_store.put_count().await, 0);
}

#[tokio::test]
async fn test_body_over_request_limit_is_rejected() {
    let setup = TestSetup::new();
    let data = generate_test_document(12 * MIB);

    let response = setup.upload_file("huge.pdf", "application/pdf", &data).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(setup.object_store.put_count().await, 0);
}

#[tokio::test]
async fn test_file_at_limit_is_accepted() {
    let setup = TestSetup::new();
    let data = generate_test_document(10 * MIB);

    let response = setup.upload_file("edge.pdf", "application/pdf", &data).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["size"], 10 * MIB);
}

// Storage failure tests

#[tokio::test]
async fn test_storage_failure_returns_500_with_details() {
    let setup = TestSetup::with_store(InMemoryObjectStore::failing("bucket is read-only"));

    let response = setup
        .upload_file("invoice.pdf", "application/pdf", b"%PDF")
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "Failed to upload file");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("bucket is read-only"));
}

#[tokio::test]
async fn test_request_timeout_returns_json_error() {
    setup_test_env();
    let document_storage = Arc::new(DocumentStorage::new(
        Arc::new(SlowObjectStore {
            delay: Duration::from_secs(3),
        }),
        TEST_BUCKET.to_string(),
        TEST_PUBLIC_BASE_URL,
    ));
    let router = server::router(
        Environment::Development,
        document_storage,
        Duration::from_millis(200),
    );

    let request = Request::builder()
        .uri("/api/upload")
        .method("POST")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(&[MultipartPart::file(
            "file",
            "slow.pdf",
            "application/pdf",
            b"%PDF-1.7",
        )])))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "Request timed out");
    assert!(body["details"].as_str().unwrap().contains("0.2 s"));
}
