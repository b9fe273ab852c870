use actix_web::{http::StatusCode, test::TestRequest};
use serde_json::{json, Value};
use storefront_common::{Envelope, ORDER_PLACED_QUEUE};

use crate::endpoint_tests::helpers::{get, post_json, request, TestState};

#[actix_web::test]
async fn health_endpoint() {
    let state = TestState::new().await;
    let (status, body) = get(&state, "/health").await;
    assert!(status.is_success());
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn placing_an_order_returns_the_row_and_publishes() {
    let state = TestState::new().await;
    let (status, body) = post_json(&state, "/order", json!({ "userId": 7 })).await;
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["userId"], 7);
    assert_eq!(order["status"], "placed");
    assert!(order["id"].as_i64().unwrap() > 0);
    // The field set is a compatibility contract with existing REST consumers, which construct
    // typed records from it and reject unknown fields.
    let mut keys: Vec<&str> = order.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["id", "status", "userId"]);

    let published = state.broker.published_to(ORDER_PLACED_QUEUE);
    assert_eq!(published.len(), 1);
    assert!(matches!(&published[0], Envelope::OrderPlaced(data) if data.user_id == 7));
}

#[actix_web::test]
async fn orders_listing_is_per_user() {
    let state = TestState::new().await;
    post_json(&state, "/order", json!({ "userId": 1 })).await;
    post_json(&state, "/order", json!({ "userId": 1 })).await;
    post_json(&state, "/order", json!({ "userId": 2 })).await;

    let (status, body) = get(&state, "/orders/1").await;
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o["userId"] == 1));

    let (_, body) = get(&state, "/orders/99").await;
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn a_malformed_order_body_is_a_400_with_a_json_error() {
    let state = TestState::new().await;
    let (status, body) = post_json(&state, "/order", json!({ "user": 7 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("Could not read request body"));

    let (status, _) = request(
        &state,
        TestRequest::post().uri("/order").insert_header(("Content-Type", "application/json")).set_payload("not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
