//! User lookup trait and display-name resolution.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display value used when a user cannot be resolved.
pub const UNKNOWN_USER: &str = "Unknown";

/// A registered hotspot user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("user backend error: {0}")]
    Backend(String),

    #[error("user lookup timed out after {0} ms")]
    Timeout(u64),
}

/// Resolves user ids to profiles.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// `Ok(None)` when the user does not exist.
    async fn find_user(&self, user_id: &str) -> Result<Option<UserProfile>, LookupError>;
}

#[async_trait]
impl<T: UserLookup + ?Sized> UserLookup for Arc<T> {
    async fn find_user(&self, user_id: &str) -> Result<Option<UserProfile>, LookupError> {
        (**self).find_user(user_id).await
    }
}

/// Wraps a lookup so that no single call outlives `deadline`.
#[derive(Clone)]
pub struct DeadlineLookup<L> {
    inner: L,
    deadline: Duration,
}

impl<L> DeadlineLookup<L> {
    pub fn new(inner: L, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

#[async_trait]
impl<L: UserLookup> UserLookup for DeadlineLookup<L> {
    async fn find_user(&self, user_id: &str) -> Result<Option<UserProfile>, LookupError> {
        match tokio::time::timeout(self.deadline, self.inner.find_user(user_id)).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(self.deadline.as_millis() as u64)),
        }
    }
}

/// Name and email shown next to a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayIdentity {
    pub name: String,
    pub email: String,
}

impl DisplayIdentity {
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_USER.to_string(),
            email: UNKNOWN_USER.to_string(),
        }
    }
}

impl From<UserProfile> for DisplayIdentity {
    fn from(profile: UserProfile) -> Self {
        Self {
            name: profile.username,
            email: profile.email,
        }
    }
}

/// Outcome of resolving one user for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub identity: DisplayIdentity,
    /// True when the sentinel was substituted.
    pub degraded: bool,
}

/// Resolve a user for display, substituting the sentinel on miss or failure.
pub async fn resolve_display(users: &dyn UserLookup, user_id: &str) -> Resolved {
    match users.find_user(user_id).await {
        Ok(Some(profile)) => Resolved {
            identity: profile.into(),
            degraded: false,
        },
        Ok(None) => {
            tracing::warn!(user_id = %user_id, "User not found, using placeholder identity");
            Resolved {
                identity: DisplayIdentity::unknown(),
                degraded: true,
            }
        }
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "User lookup failed, using placeholder identity");
            Resolved {
                identity: DisplayIdentity::unknown(),
                degraded: true,
            }
        }
    }
}
