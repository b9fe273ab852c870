use std::fmt::Debug;

use log::*;
use storefront_common::{Envelope, NewRecommendationData, OrderPlacedData, RECOMMENDATIONS_QUEUE};

use crate::{
    api::RecommendationError,
    broker::{Disposition, MessageBroker},
    catalog,
    db_types::{NewRecommendation, Recommendation},
    traits::{RecommendationManagement, UserDirectory},
};

/// The reason attached to every generated (non-manual) recommendation.
pub const RECOMMENDATION_REASON: &str = "Based on your recent order.";

/// Composes the flattened, human-readable content string carried in `NEW_RECOMMENDATION` events.
/// The notification worker only ever sees this string, never the structured fields.
pub fn recommendation_content(product_id: i64, reason: &str) -> String {
    format!("Recommended product {product_id} because {reason}")
}

/// `RecommendationApi` consumes `ORDER_PLACED` events and generates product recommendations for
/// users who opted in, reactively (per order) and proactively (a periodic sweep over all users).
pub struct RecommendationApi<D, B, U> {
    db: D,
    broker: B,
    users: U,
}

impl<D, B, U> Debug for RecommendationApi<D, B, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecommendationApi")
    }
}

impl<D: Clone, B: Clone, U: Clone> Clone for RecommendationApi<D, B, U> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone(), broker: self.broker.clone(), users: self.users.clone() }
    }
}

impl<D, B, U> RecommendationApi<D, B, U> {
    pub fn new(db: D, broker: B, users: U) -> Self {
        Self { db, broker, users }
    }
}

/// Summary of a proactive recommendation sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepResult {
    /// Users that received a recommendation this sweep.
    pub generated: usize,
    /// Users skipped because the `recommendations` preference is off.
    pub skipped: usize,
    /// Users for whom generation failed (storage or publish). Logged, never fatal to the sweep.
    pub failures: usize,
}

impl<D, B, U> RecommendationApi<D, B, U>
where
    D: RecommendationManagement,
    B: MessageBroker,
    U: UserDirectory,
{
    /// The consumer entry point for the `order_placed_queue`.
    ///
    /// Malformed bodies and unrecognised events are logged and dropped (acknowledged, never
    /// redelivered). Only a storage or publish failure propagates, which the consumer turns into
    /// a nack-without-requeue.
    pub async fn handle_message(&self, body: &[u8]) -> Result<Disposition, RecommendationError> {
        let envelope = match serde_json::from_slice::<Envelope>(body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("🎁️ Dropping malformed message. {e}");
                return Ok(Disposition::Dropped);
            },
        };
        match envelope {
            Envelope::OrderPlaced(data) => self.handle_order_placed(data).await,
            other => {
                warn!("🎁️ Unhandled event: {}", other.event_name());
                Ok(Disposition::Dropped)
            },
        }
    }

    /// Reacts to a placed order: if the user has opted into recommendations, generate one,
    /// persist it, and publish `NEW_RECOMMENDATION`.
    ///
    /// A failed preference fetch is treated as "preferences absent" and skipped silently; this is
    /// an optional side effect, not an error surfaced to anyone.
    pub async fn handle_order_placed(&self, data: OrderPlacedData) -> Result<Disposition, RecommendationError> {
        let user_id = data.user_id;
        let profile = match self.users.fetch_profile(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                info!("🎁️ Could not fetch preferences for user {user_id}; skipping. {e}");
                return Ok(Disposition::Dropped);
            },
        };
        if !profile.preferences.recommendations {
            info!("🎁️ User {user_id} has not enabled recommendations.");
            return Ok(Disposition::Dropped);
        }
        self.generate_for_user(user_id).await?;
        Ok(Disposition::Processed)
    }

    /// The proactive path: fetch all users and generate a recommendation for each one with the
    /// preference enabled. Per-user failures are contained and counted.
    pub async fn sweep(&self) -> Result<SweepResult, RecommendationError> {
        let profiles = self.users.fetch_all_profiles().await?;
        debug!("🎁️ Sweep over {} users", profiles.len());
        let mut result = SweepResult::default();
        for profile in profiles {
            if !profile.preferences.recommendations {
                result.skipped += 1;
                continue;
            }
            match self.generate_for_user(profile.id).await {
                Ok(rec) => {
                    trace!("🎁️ Sweep generated recommendation {} for user {}", rec.id, profile.id);
                    result.generated += 1;
                },
                Err(e) => {
                    error!("🎁️ Sweep failed for user {}. {e}", profile.id);
                    result.failures += 1;
                },
            }
        }
        info!(
            "🎁️ Sweep complete: {} generated, {} skipped, {} failed",
            result.generated, result.skipped, result.failures
        );
        Ok(result)
    }

    /// The direct synchronous path, bypassing the event pipeline but still publishing
    /// `NEW_RECOMMENDATION` so downstream consumers see a consistent stream.
    pub async fn recommend(
        &self,
        user_id: i64,
        product_id: i64,
        reason: &str,
    ) -> Result<Recommendation, RecommendationError> {
        self.record_and_publish(user_id, product_id, reason).await
    }

    /// Pure read; no side effects.
    pub async fn recommendations_for_user(&self, user_id: i64) -> Result<Vec<Recommendation>, RecommendationError> {
        let recommendations = self.db.fetch_recommendations_for_user(user_id).await?;
        Ok(recommendations)
    }

    async fn generate_for_user(&self, user_id: i64) -> Result<Recommendation, RecommendationError> {
        let product = catalog::random_product();
        self.record_and_publish(user_id, product.id, RECOMMENDATION_REASON).await
    }

    /// Persistence and publish are not transactional together: if the publish fails after the
    /// commit, the recommendation row exists with no notification ever generated. Accepted gap.
    async fn record_and_publish(
        &self,
        user_id: i64,
        product_id: i64,
        reason: &str,
    ) -> Result<Recommendation, RecommendationError> {
        let rec = self
            .db
            .insert_recommendation(NewRecommendation { user_id, product_id, reason: reason.to_string() })
            .await?;
        debug!("🎁️ Stored recommendation {} for user {user_id}", rec.id);
        let envelope = Envelope::NewRecommendation(NewRecommendationData {
            user_id,
            content: recommendation_content(product_id, reason),
        });
        self.broker.publish(RECOMMENDATIONS_QUEUE, &envelope).await?;
        Ok(rec)
    }
}
