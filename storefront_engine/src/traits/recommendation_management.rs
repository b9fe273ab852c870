use crate::{
    db_types::{NewRecommendation, Recommendation},
    traits::StorageError,
};

/// Storage behaviour required by the recommendation worker. Recommendations are append-only.
#[allow(async_fn_in_trait)]
pub trait RecommendationManagement: Clone {
    async fn insert_recommendation(&self, rec: NewRecommendation) -> Result<Recommendation, StorageError>;

    async fn fetch_recommendations_for_user(&self, user_id: i64) -> Result<Vec<Recommendation>, StorageError>;
}
