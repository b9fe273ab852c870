use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewRecommendation, Recommendation},
    traits::StorageError,
};

pub async fn insert_recommendation(
    rec: NewRecommendation,
    conn: &mut SqliteConnection,
) -> Result<Recommendation, StorageError> {
    let rec: Recommendation = sqlx::query_as(
        r#"
            INSERT INTO recommendations (user_id, product_id, reason) VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(rec.user_id)
    .bind(rec.product_id)
    .bind(rec.reason)
    .fetch_one(conn)
    .await?;
    trace!("📝️ Recommendation {} inserted for user {}", rec.id, rec.user_id);
    Ok(rec)
}

pub async fn fetch_recommendations_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Recommendation>, StorageError> {
    let recommendations = sqlx::query_as("SELECT * FROM recommendations WHERE user_id = $1 ORDER BY id ASC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(recommendations)
}
