/// Account flow integration tests
/// Sign-up, email verification, login, password reset, and route protection
mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{TestApp, TEST_PASSWORD, TEST_SECRET};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use tunehub_core::types::Role;
use tunehub_server::services::auth::Claims;

fn sign_up_body(email: &str) -> serde_json::Value {
    json!({
        "name": "Grace Hopper",
        "age": 40,
        "gender": "female",
        "email": email,
        "password": TEST_PASSWORD,
    })
}

fn login_body(email: &str, password: &str) -> serde_json::Value {
    json!({ "email": email, "password": password })
}

#[tokio::test]
async fn test_signup_verify_login_flow() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/v1/users/signup", None, sign_up_body("grace@example.com"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "success");

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "grace@example.com");
    assert!(sent[0].body.contains("/api/v1/users/verify-email/"));

    // Unverified accounts cannot log in yet
    let response = app
        .post(
            "/api/v1/users/login",
            None,
            login_body("grace@example.com", TEST_PASSWORD),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let token = app.mailer.last_token();
    let response = app
        .post(
            &format!("/api/v1/users/verify-email/{token}"),
            None,
            json!({ "email": "grace@example.com" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert!(body["token"].is_string());
    assert_eq!(body["data"]["user"]["is_verified"], true);

    let response = app
        .post(
            "/api/v1/users/login",
            None,
            login_body("GRACE@example.com", TEST_PASSWORD),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let session = response.json()["token"].as_str().unwrap().to_string();

    let response = app.get("/api/v1/users/me", Some(&session)).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["data"]["user"]["email"], "grace@example.com");
    assert_eq!(body["data"]["user"]["role"], "user");
    assert!(body["data"]["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_verification_token_is_bound_to_email() {
    let app = TestApp::new().await;
    app.post("/api/v1/users/signup", None, sign_up_body("a@example.com"))
        .await;
    let token = app.mailer.last_token();

    let response = app
        .post(
            &format!("/api/v1/users/verify-email/{token}"),
            None,
            json!({ "email": "someone-else@example.com" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "Invalid user or verification token.");

    // Token is single use
    let uri = format!("/api/v1/users/verify-email/{token}");
    let first = app.post(&uri, None, json!({ "email": "a@example.com" })).await;
    let second = app.post(&uri, None, json!({ "email": "a@example.com" })).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_validation_and_duplicates() {
    let app = TestApp::new().await;

    let mut body = sign_up_body("young@example.com");
    body["age"] = json!(8);
    let response = app.post("/api/v1/users/signup", None, body).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["status"], "fail");

    let response = app
        .post("/api/v1/users/signup", None, sign_up_body("not-an-email"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    app.post("/api/v1/users/signup", None, sign_up_body("dup@example.com"))
        .await;
    let response = app
        .post("/api/v1/users/signup", None, sign_up_body("Dup@Example.com"))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_failed_verification_mail_removes_account() {
    let app = TestApp::with_failing_mailer().await;

    let response = app
        .post("/api/v1/users/signup", None, sign_up_body("lost@example.com"))
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["status"], "error");

    let stored = tunehub_storage::users::get_credentials_by_email(app.pool(), "lost@example.com")
        .await
        .unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = TestApp::new().await;
    app.user("known@example.com", Role::User).await;

    let wrong_password = app
        .post(
            "/api/v1/users/login",
            None,
            login_body("known@example.com", "wrong-password"),
        )
        .await;
    let unknown_user = app
        .post(
            "/api/v1/users/login",
            None,
            login_body("unknown@example.com", TEST_PASSWORD),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.json(), unknown_user.json());

    let missing_field = app
        .post("/api/v1/users/login", None, json!({ "email": "known@example.com" }))
        .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_forgot_password_does_not_reveal_accounts() {
    let app = TestApp::new().await;
    app.user("member@example.com", Role::User).await;

    let known = app
        .post(
            "/api/v1/users/forgot-password",
            None,
            json!({ "email": "member@example.com" }),
        )
        .await;
    let unknown = app
        .post(
            "/api/v1/users/forgot-password",
            None,
            json!({ "email": "stranger@example.com" }),
        )
        .await;

    assert_eq!(known.status, StatusCode::OK);
    assert_eq!(known.status, unknown.status);
    assert_eq!(known.json(), unknown.json());
    assert_eq!(app.mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_password_reset_invalidates_older_sessions() {
    let app = TestApp::new().await;
    let (user, _) = app.user("reset@example.com", Role::User).await;

    // Session issued well before the reset
    let now = Utc::now().timestamp();
    let stale = encode(
        &Header::default(),
        &Claims {
            sub: user.id.to_string(),
            iat: now - 60,
            exp: now + 3600,
        },
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();
    assert_eq!(app.get("/api/v1/users/me", Some(&stale)).await.status, StatusCode::OK);

    app.post(
        "/api/v1/users/forgot-password",
        None,
        json!({ "email": "reset@example.com" }),
    )
    .await;
    let token = app.mailer.last_token();

    let response = app
        .post(
            &format!("/api/v1/users/reset-password/{token}"),
            None,
            json!({ "password": "a-brand-new-password" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let fresh = response.json()["token"].as_str().unwrap().to_string();

    let response = app.get("/api/v1/users/me", Some(&stale)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json()["message"],
        "User recently changed password! Please log in again."
    );

    assert_eq!(app.get("/api/v1/users/me", Some(&fresh)).await.status, StatusCode::OK);

    let response = app
        .post(
            "/api/v1/users/login",
            None,
            login_body("reset@example.com", "a-brand-new-password"),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // The reset token is consumed
    let response = app
        .post(
            &format!("/api/v1/users/reset-password/{token}"),
            None,
            json!({ "password": "yet-another-password" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_require_a_live_session() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/songs", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["status"], "fail");

    let response = app.get("/api/v1/songs", Some("not-a-jwt")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let (user, token) = app.user("gone@example.com", Role::User).await;
    assert_eq!(app.get("/api/v1/songs", Some(&token)).await.status, StatusCode::OK);

    tunehub_storage::users::delete(app.pool(), &user.id).await.unwrap();
    let response = app.get("/api/v1/songs", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_and_unknown_routes() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");

    let response = app.get("/api/v1/no-such-thing", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.json(),
        json!({ "status": "fail", "message": "This route is not defined!" })
    );
}
