//! Own-profile, credential and shipping address HTTP tests

use super::{
    build_test_router, delete_json, get_json, post_json, put_json, TestAppState, TEST_PASSWORD,
};
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn address(full_name: &str, is_default: bool) -> Value {
    json!({
        "fullName": full_name,
        "phone": "+31 6 1234 5678",
        "addressLine1": "Keizersgracht 1",
        "city": "Amsterdam",
        "postalCode": "1015 CJ",
        "country": "NL",
        "isDefault": is_default
    })
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn test_get_profile_returns_own_account() {
    let state = TestAppState::new();
    let (user, token) = state.seed_customer().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/users/profile", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body.unwrap()["data"];
    assert_eq!(data["id"], user.id.to_string());
    assert_eq!(data["email"], "jane@example.com");
    assert_eq!(data["shippingAddresses"], json!([]));
    assert!(data.get("passwordHash").is_none());
    assert!(data.get("version").is_none());
}

#[tokio::test]
async fn test_update_profile_changes_name_and_email() {
    let state = TestAppState::new();
    let (user, token) = state.seed_customer().await;
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/v1/users/profile",
        Some(&token),
        &json!({ "name": "Jane Doe", "email": "Jane.Doe@Example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["data"]["email"], "jane.doe@example.com");
    let stored = state.user_repo.get(user.id).await.unwrap();
    assert_eq!(stored.name, "Jane Doe");
}

#[tokio::test]
async fn test_update_profile_to_taken_email_conflicts() {
    let state = TestAppState::new();
    let (_, token) = state.seed_customer().await;
    state.seed_admin().await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/v1/users/profile",
        Some(&token),
        &json!({ "email": "admin@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_profile_short_name_is_400() {
    let state = TestAppState::new();
    let (_, token) = state.seed_customer().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/v1/users/profile",
        Some(&token),
        &json!({ "name": "Jo" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["errors"][0]["field"], "name");
}

// ============================================================================
// Change password
// ============================================================================

#[tokio::test]
async fn test_change_password_then_login_with_new_one() {
    let state = TestAppState::new();
    let (_, token) = state.seed_customer().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/v1/users/change-password",
        Some(&token),
        &json!({ "currentPassword": TEST_PASSWORD, "newPassword": "brand-new-pw" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["message"], "Password updated successfully");

    let (old_login, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/auth/login",
        None,
        &json!({ "email": "jane@example.com", "password": TEST_PASSWORD }),
    )
    .await;
    let (new_login, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/auth/login",
        None,
        &json!({ "email": "jane@example.com", "password": "brand-new-pw" }),
    )
    .await;

    assert_eq!(old_login, StatusCode::UNAUTHORIZED);
    assert_eq!(new_login, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_wrong_current_is_400() {
    let state = TestAppState::new();
    let (_, token) = state.seed_customer().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/v1/users/change-password",
        Some(&token),
        &json!({ "currentPassword": "guess", "newPassword": "brand-new-pw" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["message"], "Current password is incorrect");
}

// ============================================================================
// Addresses
// ============================================================================

#[tokio::test]
async fn test_add_address_returns_201_and_full_list() {
    let state = TestAppState::new();
    let (_, token) = state.seed_customer().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/users/addresses",
        Some(&token),
        &address("Jane Customer", true),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let list = body.unwrap()["data"].as_array().unwrap().clone();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["fullName"], "Jane Customer");
    assert_eq!(list[0]["isDefault"], true);
}

#[tokio::test]
async fn test_new_default_address_clears_previous_default() {
    let state = TestAppState::new();
    let (user, token) = state.seed_customer().await;
    let app = build_test_router(state.clone());

    let _: (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/users/addresses", Some(&token), &address("Home", true)).await;
    let _: (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/users/addresses", Some(&token), &address("Office", true)).await;

    let stored = state.user_repo.get(user.id).await.unwrap();
    let defaults: Vec<&str> = stored
        .shipping_addresses
        .iter()
        .filter(|a| a.is_default)
        .map(|a| a.full_name.as_str())
        .collect();
    assert_eq!(defaults, vec!["Office"]);
}

#[tokio::test]
async fn test_add_address_missing_fields_is_400() {
    let state = TestAppState::new();
    let (_, token) = state.seed_customer().await;
    let app = build_test_router(state);

    let mut body = address("Jane", false);
    body["city"] = json!("");
    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/users/addresses", Some(&token), &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["errors"][0]["field"], "city");
}

#[tokio::test]
async fn test_update_address_edits_only_that_entry() {
    let state = TestAppState::new();
    let (user, token) = state.seed_customer().await;
    let app = build_test_router(state.clone());

    let _: (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/users/addresses", Some(&token), &address("Home", false)).await;
    let _: (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/users/addresses", Some(&token), &address("Office", false)).await;
    let home_id = state.user_repo.get(user.id).await.unwrap().shipping_addresses[0].id;

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/v1/users/addresses/{}", home_id),
        Some(&token),
        &json!({ "city": "Utrecht" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let list = body.unwrap()["data"].as_array().unwrap().clone();
    assert_eq!(list[0]["city"], "Utrecht");
    assert_eq!(list[1]["city"], "Amsterdam");
}

#[tokio::test]
async fn test_delete_missing_address_is_404() {
    let state = TestAppState::new();
    let (_, token) = state.seed_customer().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = delete_json(
        &app,
        &format!("/api/v1/users/addresses/{}", uuid::Uuid::new_v4()),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["message"], "Address not found");
}

#[tokio::test]
async fn test_delete_address_leaves_others_intact() {
    let state = TestAppState::new();
    let (user, token) = state.seed_customer().await;
    let app = build_test_router(state.clone());

    for name in ["Home", "Office", "Cabin"] {
        let _: (StatusCode, Option<Value>) =
            post_json(&app, "/api/v1/users/addresses", Some(&token), &address(name, false)).await;
    }
    let office_id = state.user_repo.get(user.id).await.unwrap().shipping_addresses[1].id;

    let (status, body): (StatusCode, Option<Value>) = delete_json(
        &app,
        &format!("/api/v1/users/addresses/{}", office_id),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = body.unwrap()["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["fullName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Home", "Cabin"]);
}

#[tokio::test]
async fn test_address_path_with_bad_id_is_400() {
    let state = TestAppState::new();
    let (_, token) = state.seed_customer().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) =
        delete_json(&app, "/api/v1/users/addresses/not-a-uuid", Some(&token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"], "bad_request");
}

#[tokio::test]
async fn test_update_profile_name_is_checked_after_trimming() {
    let state = TestAppState::new();
    let (user, token) = state.seed_customer().await;
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/v1/users/profile",
        Some(&token),
        &json!({ "name": "   ab   " }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["errors"][0]["field"], "name");
    assert_eq!(state.user_repo.get(user.id).await.unwrap().name, "Jane Customer");
}

#[tokio::test]
async fn test_update_profile_stores_trimmed_name() {
    let state = TestAppState::new();
    let (user, token) = state.seed_customer().await;
    let app = build_test_router(state.clone());

    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/v1/users/profile",
        Some(&token),
        &json!({ "name": "  Jane Doe  " }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.user_repo.get(user.id).await.unwrap().name, "Jane Doe");
}
