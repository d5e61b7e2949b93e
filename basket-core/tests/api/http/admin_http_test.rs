//! Admin account management HTTP tests

use super::{build_test_router, delete_json, get_json, put_json, TestAppState};
use axum::http::StatusCode;
use basket_core::domain::Role;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[tokio::test]
async fn test_admin_lists_users() {
    let state = TestAppState::new();
    state.seed_customer().await;
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/admin/users", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let users = body.unwrap()["data"].as_array().unwrap().clone();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("passwordHash").is_none()));
}

#[tokio::test]
async fn test_customer_cannot_list_users() {
    let state = TestAppState::new();
    let (_, token) = state.seed_customer().await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/admin/users", Some(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_gets_single_user() {
    let state = TestAppState::new();
    let (jane, _) = state.seed_customer().await;
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, &format!("/api/v1/admin/users/{}", jane.id), Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["data"]["email"], "jane@example.com");
}

#[tokio::test]
async fn test_admin_get_missing_user_is_404() {
    let state = TestAppState::new();
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = get_json(
        &app,
        &format!("/api/v1/admin/users/{}", uuid::Uuid::new_v4()),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_promotes_user() {
    let state = TestAppState::new();
    let (jane, jane_token) = state.seed_customer().await;
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/v1/admin/users/{}", jane.id),
        Some(&token),
        &json!({ "role": "admin", "name": "Jane Manager" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["data"]["role"], "admin");
    assert_eq!(state.user_repo.get(jane.id).await.unwrap().role, Role::Admin);

    // The role is read per request, so Jane's existing token now passes the admin gate
    let (admin_status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/admin/users", Some(&jane_token)).await;
    assert_eq!(admin_status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_update_to_taken_email_is_409() {
    let state = TestAppState::new();
    let (jane, _) = state.seed_customer().await;
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/v1/admin/users/{}", jane.id),
        Some(&token),
        &json!({ "email": "ADMIN@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_update_with_unknown_role_is_400() {
    let state = TestAppState::new();
    let (jane, _) = state.seed_customer().await;
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/v1/admin/users/{}", jane.id),
        Some(&token),
        &json!({ "role": "superuser" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_deletes_user() {
    let state = TestAppState::new();
    let (jane, jane_token) = state.seed_customer().await;
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<Value>) =
        delete_json(&app, &format!("/api/v1/admin/users/{}", jane.id), Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["message"], "User removed");
    assert!(state.user_repo.get(jane.id).await.is_none());

    let (after, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/users/profile", Some(&jane_token)).await;
    assert_eq!(after, StatusCode::UNAUTHORIZED);
    assert_eq!(body.unwrap()["message"], "No user found with this id");
}

#[tokio::test]
async fn test_admin_update_blank_name_is_400() {
    let state = TestAppState::new();
    let (jane, _) = state.seed_customer().await;
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/v1/admin/users/{}", jane.id),
        Some(&token),
        &json!({ "name": "    " }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["errors"][0]["field"], "name");
    assert_eq!(state.user_repo.get(jane.id).await.unwrap().name, "Jane Customer");
}
