use std::future::Future;

use storefront_common::UserProfile;
use thiserror::Error;

/// Read access to the external user service.
///
/// The recommendation worker only ever needs profiles (for the preference flags); it treats any
/// failure here as "preferences absent" and silently skips the optional side effect.
pub trait UserDirectory {
    fn fetch_profile(&self, user_id: i64) -> impl Future<Output = Result<UserProfile, UserDirectoryError>> + Send;

    fn fetch_all_profiles(&self) -> impl Future<Output = Result<Vec<UserProfile>, UserDirectoryError>> + Send;
}

#[derive(Debug, Clone, Error)]
pub enum UserDirectoryError {
    #[error("User {0} not found")]
    UserNotFound(i64),
    #[error("Could not reach the user service. {0}")]
    Unreachable(String),
    #[error("The user service returned an unusable response. {0}")]
    BadResponse(String),
}
