//! Login, registration, session restore and logout against the mock backend.

use axum::http::Method;
use secrecy::SecretString;
use tempfile::TempDir;
use wonderland_client::ClientError;
use wonderland_client::api::ProfileUpdate;
use wonderland_core::validation::RegistrationForm;
use wonderland_core::{Role, ValidationError};
use wonderland_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, CUSTOMER_EMAIL, CUSTOMER_PASSWORD, TestBackend,
};

fn password(text: &str) -> SecretString {
    SecretString::from(text)
}

#[tokio::test]
async fn test_login_establishes_and_persists_session() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut shop = backend.storefront(dir.path());

    let session = shop
        .auth
        .login(CUSTOMER_EMAIL, &password(CUSTOMER_PASSWORD))
        .await
        .expect("login failed");
    assert_eq!(session.user.name, "Ali Khan");
    assert_eq!(session.user.role, Role::Customer);
    assert!(shop.auth.is_authenticated());
    assert!(!shop.auth.is_admin());
    assert!(backend.config(dir.path()).session_file().exists());

    // A later run picks the token up from disk
    let mut next_run = backend.storefront(dir.path());
    assert!(next_run.api.has_token());
    assert!(!next_run.auth.is_authenticated());
    assert!(next_run.auth.refresh_session().await.expect("refresh failed"));
    assert_eq!(
        next_run.auth.user().map(|u| u.email.as_str()),
        Some(CUSTOMER_EMAIL)
    );
    assert_eq!(backend.request_count(&Method::GET, "/auth/me"), 1);
}

#[tokio::test]
async fn test_admin_login() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let shop = backend
        .signed_in(dir.path(), ADMIN_EMAIL, ADMIN_PASSWORD)
        .await;
    assert!(shop.auth.is_admin());
}

#[tokio::test]
async fn test_failed_login_keeps_previous_session() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut shop = backend
        .signed_in(dir.path(), CUSTOMER_EMAIL, CUSTOMER_PASSWORD)
        .await;

    let err = shop
        .auth
        .login(ADMIN_EMAIL, &password("wrong-password"))
        .await
        .expect_err("login should fail");
    assert!(err.is_auth());
    assert_eq!(err.to_string(), "Incorrect email or password");

    assert!(shop.api.has_token());
    assert_eq!(
        shop.auth.user().map(|u| u.email.as_str()),
        Some(CUSTOMER_EMAIL)
    );

    // The old token still works
    shop.orders.load_mine().await.expect("token was dropped");
}

#[tokio::test]
async fn test_login_validation_never_reaches_the_backend() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut shop = backend.storefront(dir.path());

    let err = shop
        .auth
        .login("  ", &password(CUSTOMER_PASSWORD))
        .await
        .expect_err("blank email accepted");
    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::MissingCredentials)
    ));

    let err = shop
        .auth
        .login("not-an-email", &password(CUSTOMER_PASSWORD))
        .await
        .expect_err("bad email accepted");
    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::InvalidEmail(_))
    ));

    assert_eq!(backend.total_requests(), 0);
}

#[tokio::test]
async fn test_login_fetches_user_when_response_omits_it() {
    let backend = TestBackend::start().await;
    backend.omit_user_in_auth_responses();
    let dir = TempDir::new().expect("temp dir");
    let shop = backend
        .signed_in(dir.path(), CUSTOMER_EMAIL, CUSTOMER_PASSWORD)
        .await;

    assert_eq!(shop.auth.user().map(|u| u.name.as_str()), Some("Ali Khan"));
    assert_eq!(backend.request_count(&Method::GET, "/auth/me"), 1);
}

#[tokio::test]
async fn test_register_signs_in() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut shop = backend.storefront(dir.path());

    let form = RegistrationForm {
        name: "Sara Ahmed",
        email: "sara@example.pk",
        password: "teddy123",
        confirm_password: "teddy123",
    };
    let session = shop.auth.register(&form).await.expect("register failed");
    assert_eq!(session.user.name, "Sara Ahmed");
    assert_eq!(session.user.role, Role::Customer);
    assert!(shop.api.has_token());
}

#[tokio::test]
async fn test_register_duplicate_email_surfaces_backend_message() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut shop = backend.storefront(dir.path());

    let form = RegistrationForm {
        name: "Ali Again",
        email: CUSTOMER_EMAIL,
        password: "secret123",
        confirm_password: "secret123",
    };
    let err = shop.auth.register(&form).await.expect_err("duplicate accepted");
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Email already registered");
    assert!(!shop.auth.is_authenticated());
}

#[tokio::test]
async fn test_register_mismatched_passwords_rejected_locally() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut shop = backend.storefront(dir.path());

    let form = RegistrationForm {
        name: "Sara Ahmed",
        email: "sara@example.pk",
        password: "teddy123",
        confirm_password: "teddy124",
    };
    let err = shop.auth.register(&form).await.expect_err("mismatch accepted");
    assert_eq!(err.to_string(), "Passwords do not match");
    assert_eq!(backend.total_requests(), 0);
}

#[tokio::test]
async fn test_rejected_token_is_cleared_everywhere() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut shop = backend
        .signed_in(dir.path(), CUSTOMER_EMAIL, CUSTOMER_PASSWORD)
        .await;
    let session_file = backend.config(dir.path()).session_file();
    assert!(session_file.exists());

    backend.revoke_tokens();
    let err = shop.orders.load_mine().await.expect_err("revoked token accepted");
    assert!(err.is_auth());

    assert!(!shop.api.has_token());
    assert!(!shop.auth.is_authenticated());
    assert!(!session_file.exists());
}

#[tokio::test]
async fn test_refresh_with_revoked_token_signs_out() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    drop(
        backend
            .signed_in(dir.path(), CUSTOMER_EMAIL, CUSTOMER_PASSWORD)
            .await,
    );
    backend.revoke_tokens();

    let mut shop = backend.storefront(dir.path());
    assert!(!shop.auth.refresh_session().await.expect("refresh errored"));
    assert!(!shop.api.has_token());
}

#[tokio::test]
async fn test_refresh_without_token_makes_no_request() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut shop = backend.storefront(dir.path());

    assert!(!shop.auth.refresh_session().await.expect("refresh errored"));
    assert_eq!(backend.total_requests(), 0);
}

#[tokio::test]
async fn test_refresh_keeps_token_when_backend_is_down() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    drop(
        backend
            .signed_in(dir.path(), CUSTOMER_EMAIL, CUSTOMER_PASSWORD)
            .await,
    );

    backend.fail_with(503, r#"{"detail": "Service unavailable"}"#);
    let mut shop = backend.storefront(dir.path());
    let err = shop
        .auth
        .refresh_session()
        .await
        .expect_err("refresh should fail");
    assert_eq!(err.status(), Some(503));
    assert!(shop.api.has_token());
    assert!(!shop.auth.is_authenticated());

    backend.recover();
    assert!(shop.auth.refresh_session().await.expect("refresh failed"));
}

#[tokio::test]
async fn test_logout_forgets_token() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut shop = backend
        .signed_in(dir.path(), CUSTOMER_EMAIL, CUSTOMER_PASSWORD)
        .await;

    shop.auth.logout();
    assert!(!shop.auth.is_authenticated());
    assert!(!backend.config(dir.path()).session_file().exists());

    shop.products.fetch_all().await.expect("catalog fetch failed");
    let last = backend.requests().pop().expect("no request recorded");
    assert_eq!(last.path, "/products");
    assert_eq!(last.bearer, None);
}

#[tokio::test]
async fn test_update_profile() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut shop = backend
        .signed_in(dir.path(), CUSTOMER_EMAIL, CUSTOMER_PASSWORD)
        .await;

    let user = shop
        .auth
        .update_profile(ProfileUpdate {
            name: Some(" Ali Raza ".to_string()),
            email: None,
        })
        .await
        .expect("profile update failed");
    assert_eq!(user.name, "Ali Raza");
    assert_eq!(shop.auth.user().map(|u| u.name.as_str()), Some("Ali Raza"));

    let err = shop
        .auth
        .update_profile(ProfileUpdate {
            name: None,
            email: Some(ADMIN_EMAIL.to_string()),
        })
        .await
        .expect_err("taken email accepted");
    assert_eq!(err.to_string(), "Email already in use");
    assert_eq!(shop.auth.user().map(|u| u.name.as_str()), Some("Ali Raza"));
}

#[tokio::test]
async fn test_update_profile_requires_session() {
    let backend = TestBackend::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut shop = backend.storefront(dir.path());

    let err = shop
        .auth
        .update_profile(ProfileUpdate {
            name: Some("Nobody".to_string()),
            email: None,
        })
        .await
        .expect_err("anonymous update accepted");
    assert!(err.is_auth());
    assert_eq!(backend.total_requests(), 0);
}
