//! Recommendation worker behaviour: the preference gate, catalog picks, the scheduled sweep, and
//! malformed-message handling.

use mockall::mock;
use storefront_common::{
    Envelope,
    OrderPlacedData,
    UserPreferences,
    UserProfile,
    RECOMMENDATIONS_QUEUE,
};
use storefront_engine::{
    broker::{Disposition, MemoryBroker},
    catalog,
    test_utils::{memory_db, prepare_test_env},
    traits::{UserDirectory, UserDirectoryError},
    RecommendationApi,
    RECOMMENDATION_REASON,
};

mock! {
    pub Directory {}
    impl UserDirectory for Directory {
        async fn fetch_profile(&self, user_id: i64) -> Result<UserProfile, UserDirectoryError>;
        async fn fetch_all_profiles(&self) -> Result<Vec<UserProfile>, UserDirectoryError>;
    }
}

fn profile(user_id: i64, recommendations: bool) -> UserProfile {
    UserProfile {
        id: user_id,
        name: format!("user-{user_id}"),
        email: format!("user{user_id}@example.com"),
        preferences: UserPreferences { promotions: false, order_updates: true, recommendations },
    }
}

fn order_placed(user_id: i64) -> OrderPlacedData {
    OrderPlacedData { order_id: 1, user_id, status: "placed".to_string() }
}

#[tokio::test]
async fn opted_in_user_gets_exactly_one_recommendation_and_publish() {
    prepare_test_env();
    let db = memory_db().await;
    let broker = MemoryBroker::new();
    let mut directory = MockDirectory::new();
    directory.expect_fetch_profile().returning(|id| Ok(profile(id, true)));
    let api = RecommendationApi::new(db, broker.clone(), directory);

    let disposition = api.handle_order_placed(order_placed(7)).await.unwrap();
    assert_eq!(disposition, Disposition::Processed);

    let stored = api.recommendations_for_user(7).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(catalog::contains_product(stored[0].product_id));
    assert_eq!(stored[0].reason, RECOMMENDATION_REASON);

    let published = broker.published_to(RECOMMENDATIONS_QUEUE);
    assert_eq!(published.len(), 1);
    match &published[0] {
        Envelope::NewRecommendation(data) => {
            assert_eq!(data.user_id, 7);
            assert!(data.content.starts_with("Recommended product "));
            assert!(data.content.ends_with(&format!("because {RECOMMENDATION_REASON}")));
        },
        other => panic!("unexpected event on recommendations_queue: {other:?}"),
    }
}

#[tokio::test]
async fn opted_out_user_produces_nothing() {
    prepare_test_env();
    let db = memory_db().await;
    let broker = MemoryBroker::new();
    let mut directory = MockDirectory::new();
    directory.expect_fetch_profile().returning(|id| Ok(profile(id, false)));
    let api = RecommendationApi::new(db, broker.clone(), directory);

    let disposition = api.handle_order_placed(order_placed(3)).await.unwrap();
    assert_eq!(disposition, Disposition::Dropped);
    assert!(api.recommendations_for_user(3).await.unwrap().is_empty());
    assert!(broker.published().is_empty());
}

#[tokio::test]
async fn preference_fetch_failure_skips_silently() {
    prepare_test_env();
    let db = memory_db().await;
    let broker = MemoryBroker::new();
    let mut directory = MockDirectory::new();
    directory
        .expect_fetch_profile()
        .returning(|_| Err(UserDirectoryError::Unreachable("user service is down".to_string())));
    let api = RecommendationApi::new(db, broker.clone(), directory);

    // Not an error: the side effect is optional and the event must still be acknowledged.
    let disposition = api.handle_order_placed(order_placed(9)).await.unwrap();
    assert_eq!(disposition, Disposition::Dropped);
    assert!(broker.published().is_empty());
}

#[tokio::test]
async fn malformed_and_unexpected_messages_are_dropped_not_errors() {
    prepare_test_env();
    let db = memory_db().await;
    let broker = MemoryBroker::new();
    let api = RecommendationApi::new(db, broker.clone(), MockDirectory::new());

    let garbage = api.handle_message(b"not json at all").await.unwrap();
    assert_eq!(garbage, Disposition::Dropped);

    let unknown = api.handle_message(br#"{"event":"PRICE_DROP","data":{}}"#).await.unwrap();
    assert_eq!(unknown, Disposition::Dropped);

    // Structurally valid envelope with a missing required field inside `data`.
    let missing_field = api
        .handle_message(br#"{"event":"ORDER_PLACED","data":{"orderId":1,"status":"placed"}}"#)
        .await
        .unwrap();
    assert_eq!(missing_field, Disposition::Dropped);

    assert!(broker.published().is_empty());
}

#[tokio::test]
async fn sweep_covers_only_opted_in_users() {
    prepare_test_env();
    let db = memory_db().await;
    let broker = MemoryBroker::new();
    let mut directory = MockDirectory::new();
    directory
        .expect_fetch_all_profiles()
        .returning(|| Ok(vec![profile(1, true), profile(2, false), profile(3, true)]));
    let api = RecommendationApi::new(db, broker.clone(), directory);

    let result = api.sweep().await.unwrap();
    assert_eq!(result.generated, 2);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.failures, 0);

    assert_eq!(api.recommendations_for_user(1).await.unwrap().len(), 1);
    assert!(api.recommendations_for_user(2).await.unwrap().is_empty());
    assert_eq!(api.recommendations_for_user(3).await.unwrap().len(), 1);
    assert_eq!(broker.published_to(RECOMMENDATIONS_QUEUE).len(), 2);
}

#[tokio::test]
async fn sweep_contains_per_user_publish_failures() {
    prepare_test_env();
    let db = memory_db().await;
    let broker = MemoryBroker::new();
    broker.fail_publishes_to(RECOMMENDATIONS_QUEUE);
    let mut directory = MockDirectory::new();
    directory.expect_fetch_all_profiles().returning(|| Ok(vec![profile(1, true), profile(2, true)]));
    let api = RecommendationApi::new(db, broker.clone(), directory);

    let result = api.sweep().await.unwrap();
    assert_eq!(result.generated, 0);
    assert_eq!(result.failures, 2);
    // The rows were committed before the publishes failed; that gap is accepted.
    assert_eq!(api.recommendations_for_user(1).await.unwrap().len(), 1);
    assert_eq!(api.recommendations_for_user(2).await.unwrap().len(), 1);
}

#[tokio::test]
async fn manual_recommendation_persists_and_publishes() {
    prepare_test_env();
    let db = memory_db().await;
    let broker = MemoryBroker::new();
    let api = RecommendationApi::new(db, broker.clone(), MockDirectory::new());

    let rec = api.recommend(5, 104, "you liked similar items").await.unwrap();
    assert_eq!(rec.user_id, 5);
    assert_eq!(rec.product_id, 104);
    assert_eq!(rec.reason, "you liked similar items");

    let published = broker.published_to(RECOMMENDATIONS_QUEUE);
    assert_eq!(published.len(), 1);
    match &published[0] {
        Envelope::NewRecommendation(data) => {
            assert_eq!(data.content, "Recommended product 104 because you liked similar items");
        },
        other => panic!("unexpected event: {other:?}"),
    }
}
