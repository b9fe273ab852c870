use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The user record as served by the user service over REST.
///
/// `preferences` arrives as a JSON string (an artifact of how the user service stores it).
/// Decode it once at the boundary with [`UserRecord::into_profile`]; nothing downstream
/// should re-parse the blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub preferences: String,
}

/// Per-user opt-in flags. Missing keys in the stored blob default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub promotions: bool,
    pub order_updates: bool,
    pub recommendations: bool,
}

/// A user record with the preference blob decoded into structured flags.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub preferences: UserPreferences,
}

#[derive(Debug, Clone, Error)]
#[error("Could not decode the preferences blob for user {user_id}. {reason}")]
pub struct PreferencesError {
    pub user_id: i64,
    pub reason: String,
}

impl UserRecord {
    pub fn into_profile(self) -> Result<UserProfile, PreferencesError> {
        let preferences =
            serde_json::from_str::<UserPreferences>(&self.preferences).map_err(|e| PreferencesError {
                user_id: self.id,
                reason: e.to_string(),
            })?;
        Ok(UserProfile { id: self.id, name: self.name, email: self.email, preferences })
    }
}
