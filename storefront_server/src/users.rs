//! A thin client for the external user service.
//!
//! The engine only needs profiles with preference flags, so this wraps the two read endpoints
//! (`/user/{id}` and `/users`) and decodes the preference blob into [`UserProfile`].

use std::sync::Arc;

use log::*;
use reqwest::{Client, StatusCode};
use storefront_common::{UserProfile, UserRecord};
use storefront_engine::traits::{UserDirectory, UserDirectoryError};

#[derive(Clone)]
pub struct UserServiceClient {
    base_url: String,
    client: Arc<Client>,
}

impl UserServiceClient {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), client: Arc::new(Client::new()) }
    }

    /// GETs `path` and decodes the JSON body. A 404 becomes `Ok(None)` so callers can map it to
    /// their own not-found error.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Option<T>, UserDirectoryError> {
        let url = format!("{}{path}", self.base_url);
        let response =
            self.client.get(&url).send().await.map_err(|e| UserDirectoryError::Unreachable(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(UserDirectoryError::BadResponse(format!("{url} returned {}", response.status())));
        }
        response.json().await.map(Some).map_err(|e| UserDirectoryError::BadResponse(e.to_string()))
    }
}

impl UserDirectory for UserServiceClient {
    async fn fetch_profile(&self, user_id: i64) -> Result<UserProfile, UserDirectoryError> {
        let record: UserRecord =
            self.get_json(&format!("/user/{user_id}")).await?.ok_or(UserDirectoryError::UserNotFound(user_id))?;
        record.into_profile().map_err(|e| UserDirectoryError::BadResponse(e.to_string()))
    }

    async fn fetch_all_profiles(&self) -> Result<Vec<UserProfile>, UserDirectoryError> {
        let records: Vec<UserRecord> = self.get_json("/users").await?.unwrap_or_default();
        // A single unreadable preference blob should not sink a whole sweep.
        let profiles = records
            .into_iter()
            .filter_map(|record| {
                let id = record.id;
                match record.into_profile() {
                    Ok(profile) => Some(profile),
                    Err(e) => {
                        warn!("🎁️ Skipping user {id}: {e}");
                        None
                    },
                }
            })
            .collect();
        Ok(profiles)
    }
}
