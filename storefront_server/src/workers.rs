//! Background tasks: the order lifecycle ticker, the recommendation sweep, and the two queue
//! consumers. Every task is a detached `tokio::spawn`; do not await the returned handles.

use std::time::Duration;

use log::*;
use storefront_common::{ORDER_PLACED_QUEUE, ORDER_UPDATES_QUEUE, RECOMMENDATIONS_QUEUE};
use storefront_engine::{
    broker::{handler_fn, MessageBroker},
    traits::UserDirectory,
    NotificationApi,
    OrderLifecycleApi,
    RecommendationApi,
    SqliteDatabase,
};
use tokio::{
    task::JoinHandle,
    time::{interval, sleep, MissedTickBehavior},
};

const CONSUMER_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Advances every undelivered order one step per period.
///
/// Ticks are single-flight: each run is awaited inside the loop, and a tick that comes due while
/// a run is still in progress is delayed rather than fired concurrently.
pub fn start_order_lifecycle_worker<B: MessageBroker>(
    api: OrderLifecycleApi<SqliteDatabase, B>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; consume it so the first run happens one period in.
        timer.tick().await;
        info!("🕰️ Order lifecycle worker started. Orders advance every {period:?}");
        loop {
            timer.tick().await;
            match api.advance_all_orders().await {
                Ok(result) => {
                    if result.advanced_count() > 0 || result.update_failures > 0 {
                        info!(
                            "🕰️ Lifecycle tick: {} advanced, {} publish failures, {} update failures",
                            result.advanced_count(),
                            result.publish_failures,
                            result.update_failures
                        );
                    }
                },
                Err(e) => error!("🕰️ Lifecycle tick failed: {e}"),
            }
        }
    })
}

/// Generates a recommendation for every opted-in user once per period.
pub fn start_recommendation_sweep_worker<B, U>(
    api: RecommendationApi<SqliteDatabase, B, U>,
    period: Duration,
) -> JoinHandle<()>
where
    B: MessageBroker,
    U: UserDirectory + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer.tick().await;
        info!("🕰️ Recommendation sweep worker started. Sweeps run every {period:?}");
        loop {
            timer.tick().await;
            if let Err(e) = api.sweep().await {
                error!("🕰️ Recommendation sweep failed: {e}");
            }
        }
    })
}

/// Feeds `ORDER_PLACED` events to the recommendation worker, reconnecting on broker failures.
pub fn start_recommendation_consumer<B, U>(
    broker: B,
    api: RecommendationApi<SqliteDatabase, B, U>,
) -> JoinHandle<()>
where
    B: MessageBroker,
    U: UserDirectory + Clone + Send + Sync + 'static,
{
    let handler = handler_fn(api, |api, body| async move { api.handle_message(&body).await });
    tokio::spawn(async move {
        loop {
            if let Err(e) = broker.consume(&[ORDER_PLACED_QUEUE], handler.clone()).await {
                error!("📬️ Recommendation consumer lost its connection: {e}. Reconnecting in 5s.");
            }
            sleep(CONSUMER_RECONNECT_DELAY).await;
        }
    })
}

/// Feeds recommendation and order-update events to the notification worker. Both queues share one
/// channel and one handler; the envelope tag decides what gets materialized.
pub fn start_notification_consumer<B: MessageBroker>(
    broker: B,
    api: NotificationApi<SqliteDatabase>,
) -> JoinHandle<()> {
    let handler = handler_fn(api, |api, body| async move { api.handle_message(&body).await });
    tokio::spawn(async move {
        loop {
            if let Err(e) = broker.consume(&[RECOMMENDATIONS_QUEUE, ORDER_UPDATES_QUEUE], handler.clone()).await {
                error!("📬️ Notification consumer lost its connection: {e}. Reconnecting in 5s.");
            }
            sleep(CONSUMER_RECONNECT_DELAY).await;
        }
    })
}
