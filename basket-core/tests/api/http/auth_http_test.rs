//! Registration, login and access gate HTTP tests

use super::{
    build_test_router, get_json, post_json, put_json, TestAppState, TEST_PASSWORD,
};
use crate::api::test_jwt_config;
use basket_core::config::JwtConfig;
use basket_core::domain::{Role, StringUuid};
use basket_core::jwt::JwtManager;
use basket_core::repository::UserRepository;
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn register_body(email: &str) -> Value {
    json!({
        "name": "New Customer",
        "email": email,
        "password": "hunter22"
    })
}

// ============================================================================
// Register
// ============================================================================

#[tokio::test]
async fn test_register_returns_201_with_summary() {
    let state = TestAppState::new();
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/auth/register", None, &register_body("new@example.com")).await;

    assert_eq!(status, StatusCode::CREATED);
    let body = body.unwrap();
    assert_eq!(body["message"], "User registered successfully!");
    assert_eq!(body["user"]["email"], "new@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_case_insensitive_conflicts() {
    let state = TestAppState::new();
    let app = build_test_router(state.clone());

    let (first, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/auth/register", None, &register_body("dup@example.com")).await;
    let (second, body): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/auth/register", None, &register_body("DUP@Example.com")).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body.unwrap()["message"], "User with this email already exists");
    assert_eq!(state.user_repo.count().await, 1);
}

#[tokio::test]
async fn test_register_ignores_requested_admin_role() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let mut body = register_body("sneaky@example.com");
    body["role"] = json!("admin");
    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/auth/register", None, &body).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.unwrap()["user"]["role"], "user");
}

#[tokio::test]
async fn test_register_validation_errors_list_each_field() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/auth/register",
        None,
        &json!({ "name": "Al", "email": "not-an-email", "password": "123" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = body.unwrap();
    assert_eq!(body["message"], "Validation failed");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "name", "password"]);
}

#[tokio::test]
async fn test_register_unknown_role_is_validation_error() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let mut body = register_body("role@example.com");
    body["role"] = json!("superuser");
    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/auth/register", None, &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["errors"][0]["field"], "body");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_issues_token_for_account() {
    let state = TestAppState::new();
    let (user, _) = state.seed_admin().await;
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/auth/login",
        None,
        &json!({ "email": "ADMIN@example.com", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["user"]["id"], user.id.to_string());

    let claims = state
        .jwt_manager
        .verify_session_token(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.role, Role::Admin);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_the_same() {
    let state = TestAppState::new();
    state.seed_customer().await;
    let app = build_test_router(state);

    let (wrong_pw, wrong_pw_body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/auth/login",
        None,
        &json!({ "email": "jane@example.com", "password": "not-it" }),
    )
    .await;
    let (unknown, unknown_body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/auth/login",
        None,
        &json!({ "email": "ghost@example.com", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(wrong_pw, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body.unwrap()["message"], "Invalid email or password");
    assert_eq!(unknown_body.unwrap()["message"], "Invalid email or password");
}

// ============================================================================
// Access gate
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_401() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/users/profile", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.unwrap()["message"], "Not authorized, no token");
}

#[tokio::test]
async fn test_tampered_token_is_401() {
    let state = TestAppState::new();
    let (_, token) = state.seed_customer().await;
    let app = build_test_router(state);

    let tampered = format!("{}x", token);
    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/users/profile", Some(&tampered)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.unwrap()["message"], "Not authorized, token failed");
}

#[tokio::test]
async fn test_expired_token_is_401() {
    let state = TestAppState::new();
    let (user, _) = state.seed_customer().await;
    let app = build_test_router(state);

    // Negative lifetime well past the verification leeway
    let expired_issuer = JwtManager::new(JwtConfig {
        session_ttl_secs: -120,
        ..test_jwt_config()
    });
    let token = expired_issuer
        .issue_session_token(user.id, user.role)
        .unwrap();

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/users/profile", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.unwrap()["message"], "Not authorized, token failed");
}

#[tokio::test]
async fn test_token_signed_with_other_key_is_401() {
    let state = TestAppState::new();
    let (user, _) = state.seed_customer().await;
    let app = build_test_router(state);

    let foreign = JwtManager::new(JwtConfig {
        secret: "some-other-secret-entirely".to_string(),
        ..test_jwt_config()
    });
    let token = foreign.issue_session_token(user.id, user.role).unwrap();

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/cart", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_account_is_401() {
    let state = TestAppState::new();
    let app = build_test_router(state.clone());

    let ghost_token = state
        .jwt_manager
        .issue_session_token(StringUuid::new_v4(), Role::User)
        .unwrap();

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/users/profile", Some(&ghost_token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.unwrap()["message"], "No user found with this id");
}

#[tokio::test]
async fn test_admin_route_as_user_is_403() {
    let state = TestAppState::new();
    let (_, token) = state.seed_customer().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/admin/users", Some(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body.unwrap()["message"], "Access denied. Admins only.");
}

#[tokio::test]
async fn test_admin_route_as_admin_proceeds() {
    let state = TestAppState::new();
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/admin/users", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_demoted_admin_loses_access_with_old_token() {
    let state = TestAppState::new();
    let (admin, token) = state.seed_admin().await;
    let app = build_test_router(state.clone());

    // Role is re-read from the store on every request
    let mut demoted = state.user_repo.get(admin.id).await.unwrap();
    demoted.role = Role::User;
    state.user_repo.save(&demoted).await.unwrap();

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/admin/users", Some(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_gate_runs_before_body_validation() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) =
        put_json(&app, "/api/v1/users/profile", None, &json!({ "name": 42 })).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.unwrap()["message"], "Not authorized, no token");
}
