//! Delivery location HTTP tests

use super::{build_test_router, delete_json, get_json, put_json, TestAppState};
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn western() -> Value {
    json!({
        "province": "Western",
        "cities": [
            { "name": "Colombo", "zones": ["Fort", "Pettah"] },
            { "name": "Negombo" }
        ]
    })
}

#[tokio::test]
async fn test_admin_upserts_and_public_reads() {
    let state = TestAppState::new();
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        put_json(&app, "/api/v1/locations", Some(&token), &western()).await;
    assert_eq!(status, StatusCode::OK);

    let (list_status, list): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/locations", None).await;
    let (get_status, one): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/locations/Western", None).await;

    assert_eq!(list_status, StatusCode::OK);
    assert_eq!(list.unwrap()["data"].as_array().unwrap().len(), 1);
    assert_eq!(get_status, StatusCode::OK);
    let data = one.unwrap()["data"].clone();
    assert_eq!(data["cities"][0]["zones"], json!(["Fort", "Pettah"]));
    assert_eq!(data["cities"][1]["zones"], json!([]));
}

#[tokio::test]
async fn test_upsert_replaces_existing_province() {
    let state = TestAppState::new();
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state);

    let _: (StatusCode, Option<Value>) =
        put_json(&app, "/api/v1/locations", Some(&token), &western()).await;
    let _: (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/v1/locations",
        Some(&token),
        &json!({ "province": "Western", "cities": [{ "name": "Gampaha" }] }),
    )
    .await;

    let (_, body): (StatusCode, Option<Value>) = get_json(&app, "/api/v1/locations", None).await;
    let data = body.unwrap()["data"].clone();
    assert_eq!(data.as_array().unwrap().len(), 1);
    assert_eq!(data[0]["cities"], json!([{ "name": "Gampaha", "zones": [] }]));
}

#[tokio::test]
async fn test_customer_cannot_upsert() {
    let state = TestAppState::new();
    let (_, token) = state.seed_customer().await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        put_json(&app, "/api/v1/locations", Some(&token), &western()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_upsert_blank_city_name_is_400() {
    let state = TestAppState::new();
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/v1/locations",
        Some(&token),
        &json!({ "province": "Western", "cities": [{ "name": "" }] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["errors"][0]["field"], "cities[0].name");
}

#[tokio::test]
async fn test_missing_province_is_404() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/locations/Nowhere", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["message"], "Location not found");
}

#[tokio::test]
async fn test_admin_deletes_province() {
    let state = TestAppState::new();
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state);

    let _: (StatusCode, Option<Value>) =
        put_json(&app, "/api/v1/locations", Some(&token), &western()).await;
    let (status, body): (StatusCode, Option<Value>) =
        delete_json(&app, "/api/v1/locations/Western", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["message"], "Location removed");

    let (again, _): (StatusCode, Option<Value>) =
        delete_json(&app, "/api/v1/locations/Western", Some(&token)).await;
    assert_eq!(again, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upsert_blank_province_is_400() {
    let state = TestAppState::new();
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/v1/locations",
        Some(&token),
        &json!({ "province": "   ", "cities": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["errors"][0]["field"], "province");

    let (_, list): (StatusCode, Option<Value>) = get_json(&app, "/api/v1/locations", None).await;
    assert_eq!(list.unwrap()["data"], json!([]));
}

#[tokio::test]
async fn test_upsert_trims_province_name() {
    let state = TestAppState::new();
    let (_, token) = state.seed_admin().await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/v1/locations",
        Some(&token),
        &json!({ "province": "  Southern ", "cities": [{ "name": " Galle " }] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = body.unwrap()["data"].clone();
    assert_eq!(data["province"], "Southern");
    assert_eq!(data["cities"][0]["name"], "Galle");
}
