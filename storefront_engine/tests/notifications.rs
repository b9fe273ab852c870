//! Notification worker behaviour: materialization from both event types, content templates,
//! mark-read idempotency, and the unread listing.

use storefront_engine::{
    api::{order_update_content, NotificationError},
    broker::Disposition,
    db_types::NotificationType,
    test_utils::{memory_db, prepare_test_env},
    NotificationApi,
};

#[tokio::test]
async fn recommendation_event_creates_a_notification_with_verbatim_content() {
    prepare_test_env();
    let api = NotificationApi::new(memory_db().await);

    let body = br#"{"event":"NEW_RECOMMENDATION","data":{"userId":7,"content":"Recommended product 101 because Based on your recent order."}}"#;
    let disposition = api.handle_message(body).await.unwrap();
    assert_eq!(disposition, Disposition::Processed);

    let unread = api.unread_for_user(7).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].kind, NotificationType::Recommendation);
    assert_eq!(unread[0].content, "Recommended product 101 because Based on your recent order.");
    assert!(!unread[0].read);
}

#[tokio::test]
async fn order_update_event_creates_a_server_composed_notification() {
    prepare_test_env();
    let api = NotificationApi::new(memory_db().await);

    let body = br#"{"event":"ORDER_STATUS_UPDATE","data":{"userId":7,"status":"shipped","orderId":1}}"#;
    let disposition = api.handle_message(body).await.unwrap();
    assert_eq!(disposition, Disposition::Processed);

    let unread = api.unread_for_user(7).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].kind, NotificationType::OrderUpdate);
    assert_eq!(unread[0].content, "Your order 1 status has been updated to shipped.");
    assert_eq!(unread[0].content, order_update_content(1, "shipped"));
}

#[tokio::test]
async fn malformed_and_unknown_events_create_no_rows() {
    prepare_test_env();
    let api = NotificationApi::new(memory_db().await);

    assert_eq!(api.handle_message(b"{{{{").await.unwrap(), Disposition::Dropped);
    assert_eq!(
        api.handle_message(br#"{"event":"USER_DELETED","data":{"userId":7}}"#).await.unwrap(),
        Disposition::Dropped
    );
    // ORDER_PLACED arrives on a queue this worker does not subscribe to; if one shows up anyway
    // it is dropped, not persisted.
    assert_eq!(
        api.handle_message(br#"{"event":"ORDER_PLACED","data":{"orderId":1,"userId":7,"status":"placed"}}"#)
            .await
            .unwrap(),
        Disposition::Dropped
    );
    assert!(api.unread_for_user(7).await.unwrap().is_empty());
}

#[tokio::test]
async fn mark_read_is_idempotent_and_fails_on_unknown_ids() {
    prepare_test_env();
    let api = NotificationApi::new(memory_db().await);

    let body = br#"{"event":"ORDER_STATUS_UPDATE","data":{"userId":2,"status":"shipped","orderId":9}}"#;
    api.handle_message(body).await.unwrap();
    let id = api.unread_for_user(2).await.unwrap()[0].id;

    let first = api.mark_read(id).await.unwrap();
    assert!(first.read);
    // Second call is a no-op mutation, not an error.
    let second = api.mark_read(id).await.unwrap();
    assert!(second.read);
    assert!(api.unread_for_user(2).await.unwrap().is_empty());

    match api.mark_read(9999).await {
        Err(NotificationError::NotFound(9999)) => {},
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn unread_listing_is_per_user_and_in_insertion_order() {
    prepare_test_env();
    let api = NotificationApi::new(memory_db().await);

    for (user_id, order_id) in [(1, 10), (2, 20), (1, 11)] {
        let body = format!(
            r#"{{"event":"ORDER_STATUS_UPDATE","data":{{"userId":{user_id},"status":"shipped","orderId":{order_id}}}}}"#
        );
        api.handle_message(body.as_bytes()).await.unwrap();
    }

    let unread = api.unread_for_user(1).await.unwrap();
    assert_eq!(unread.len(), 2);
    assert!(unread[0].id < unread[1].id);
    assert_eq!(unread[0].content, order_update_content(10, "shipped"));
    assert_eq!(unread[1].content, order_update_content(11, "shipped"));

    // Reading one leaves the other listed.
    api.mark_read(unread[0].id).await.unwrap();
    let remaining = api.unread_for_user(1).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, unread[1].id);
}
