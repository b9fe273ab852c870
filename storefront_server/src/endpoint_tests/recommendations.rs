use actix_web::http::StatusCode;
use serde_json::{json, Value};
use storefront_common::{Envelope, RECOMMENDATIONS_QUEUE};

use crate::endpoint_tests::helpers::{get, post_json, TestState};

#[actix_web::test]
async fn a_manual_recommendation_persists_and_publishes() {
    let state = TestState::new().await;
    let (status, body) =
        post_json(&state, "/recommend/5", json!({ "productId": 104, "reason": "you liked similar items" })).await;
    assert_eq!(status, StatusCode::OK);
    let rec: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(rec["userId"], 5);
    assert_eq!(rec["productId"], 104);
    assert_eq!(rec["reason"], "you liked similar items");
    let mut keys: Vec<&str> = rec.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["id", "productId", "reason", "userId"]);

    let published = state.broker.published_to(RECOMMENDATIONS_QUEUE);
    assert_eq!(published.len(), 1);
    assert!(matches!(
        &published[0],
        Envelope::NewRecommendation(data) if data.content == "Recommended product 104 because you liked similar items"
    ));
}

#[actix_web::test]
async fn recommendations_listing_returns_stored_rows() {
    let state = TestState::new().await;
    post_json(&state, "/recommend/3", json!({ "productId": 101, "reason": "first" })).await;
    post_json(&state, "/recommend/3", json!({ "productId": 102, "reason": "second" })).await;

    let (status, body) = get(&state, "/recommendations/3").await;
    assert_eq!(status, StatusCode::OK);
    let recs: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["productId"], 101);
    assert_eq!(recs[1]["productId"], 102);

    let (_, body) = get(&state, "/recommendations/4").await;
    assert_eq!(body, "[]");
}
