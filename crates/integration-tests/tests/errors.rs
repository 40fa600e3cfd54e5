//! How backend failures reach the caller.

use std::net::TcpListener;

use tempfile::TempDir;
use wonderland_client::error::{GENERIC_API_MESSAGE, NETWORK_MESSAGE};
use wonderland_client::{ClientConfig, ClientError, Storefront};
use wonderland_integration_tests::TestBackend;

async fn catalog_error(backend: &TestBackend) -> ClientError {
    let dir = TempDir::new().expect("temp dir");
    let mut shop = backend.storefront(dir.path());
    shop.products
        .fetch_all()
        .await
        .expect_err("fetch should fail")
}

#[tokio::test]
async fn test_detail_string_is_shown_verbatim() {
    let backend = TestBackend::start().await;
    backend.fail_with(400, r#"{"detail": "Category must be Electronic, Plush or BoardGame"}"#);

    let err = catalog_error(&backend).await;
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.user_message(),
        "Category must be Electronic, Plush or BoardGame"
    );
}

#[tokio::test]
async fn test_validation_detail_uses_first_message() {
    let backend = TestBackend::start().await;
    backend.fail_with(
        422,
        r#"{"detail": [
            {"loc": ["query", "category"], "msg": "Input should be 'Electronic', 'Plush' or 'BoardGame'"},
            {"loc": ["query", "limit"], "msg": "Input should be a valid integer"}
        ]}"#,
    );

    let err = catalog_error(&backend).await;
    assert_eq!(err.status(), Some(422));
    assert_eq!(
        err.to_string(),
        "Input should be 'Electronic', 'Plush' or 'BoardGame'"
    );
}

#[tokio::test]
async fn test_message_field_is_used_without_detail() {
    let backend = TestBackend::start().await;
    backend.fail_with(503, r#"{"message": "Down for maintenance"}"#);

    let err = catalog_error(&backend).await;
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "Down for maintenance");
}

#[tokio::test]
async fn test_unreadable_error_body_falls_back_to_generic_message() {
    let backend = TestBackend::start().await;

    backend.fail_with(502, "Bad Gateway");
    assert_eq!(catalog_error(&backend).await.to_string(), GENERIC_API_MESSAGE);

    backend.fail_with(500, "");
    assert_eq!(catalog_error(&backend).await.to_string(), GENERIC_API_MESSAGE);

    backend.fail_with(400, r#"{"detail": "   "}"#);
    assert_eq!(catalog_error(&backend).await.to_string(), GENERIC_API_MESSAGE);
}

#[tokio::test]
async fn test_unexpected_success_body_is_a_decode_error() {
    let backend = TestBackend::start().await;
    backend.fail_with(200, r#"{"products": []}"#);

    let err = catalog_error(&backend).await;
    assert!(matches!(err, ClientError::Decode(_)));
    assert_eq!(err.user_message(), GENERIC_API_MESSAGE);
}

#[tokio::test]
async fn test_unauthorized_without_detail() {
    let backend = TestBackend::start().await;
    backend.fail_with(401, "{}");

    let err = catalog_error(&backend).await;
    assert!(err.is_auth());
    assert_eq!(err.status(), Some(401));
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind failed");
        listener.local_addr().expect("no local address").port()
    };
    let dir = TempDir::new().expect("temp dir");
    let config = ClientConfig::for_base_url(&format!("http://127.0.0.1:{port}/api"), dir.path())
        .expect("config failed");
    let mut shop = Storefront::open(&config).expect("open failed");

    let err = shop
        .products
        .fetch_all()
        .await
        .expect_err("fetch should fail");
    assert!(err.is_network());
    assert_eq!(err.to_string(), NETWORK_MESSAGE);
    assert_eq!(err.status(), None);
}
