use actix_web::http::StatusCode;
use serde_json::{json, Value};

use crate::endpoint_tests::helpers::{get, post_json, TestState};

#[actix_web::test]
async fn unread_listing_is_empty_for_an_unknown_user() {
    let state = TestState::new().await;
    let (status, body) = get(&state, "/notifications/unread/42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn mark_read_removes_a_notification_from_the_unread_listing() {
    let state = TestState::new().await;
    let body = br#"{"event":"ORDER_STATUS_UPDATE","data":{"userId":6,"status":"shipped","orderId":11}}"#;
    state.notifications_api().handle_message(body).await.unwrap();

    let (status, listing) = get(&state, "/notifications/unread/6").await;
    assert_eq!(status, StatusCode::OK);
    let unread: Vec<Value> = serde_json::from_str(&listing).unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0]["content"], "Your order 11 status has been updated to shipped.");
    let id = unread[0]["id"].as_i64().unwrap();

    let (status, body) = post_json(&state, &format!("/notifications/mark-read/{id}"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let marked: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(marked["read"], true);

    let (_, listing) = get(&state, "/notifications/unread/6").await;
    assert_eq!(listing, "[]");
}

#[actix_web::test]
async fn marking_an_unknown_notification_is_a_404() {
    let state = TestState::new().await;
    let (status, body) = post_json(&state, "/notifications/mark-read/9999", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("Notification 9999"));
}
