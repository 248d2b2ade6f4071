//! User-preference client.
//!
//! One remote call per operation, no retries and no caching. Refusals from
//! the service surface as [`UserError::Rejected`] with the service's message.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use govlens_core::{FollowTracker, TopicRegistry, UserArgs, UserProfile};

use crate::backend::{RemoteResult, UserBackend};
use crate::error::UserError;

#[derive(Clone)]
pub struct UserClient {
    backend: Arc<dyn UserBackend>,
    registry: TopicRegistry,
}

fn settle<T>(result: RemoteResult<T>) -> Result<T, UserError> {
    result.into_result().map_err(UserError::Rejected)
}

impl UserClient {
    pub fn new(backend: Arc<dyn UserBackend>) -> Self {
        Self {
            backend,
            registry: TopicRegistry::nns(),
        }
    }

    pub fn with_registry(mut self, registry: TopicRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub async fn get_current_user(&self) -> Result<Option<UserProfile>, UserError> {
        Ok(self.backend.get_current_user().await?)
    }

    pub async fn get_user(&self, principal: &str) -> Result<Option<UserProfile>, UserError> {
        Ok(self.backend.get_user(principal).await?)
    }

    pub async fn user_count(&self) -> Result<u64, UserError> {
        Ok(self.backend.user_count().await?)
    }

    /// Registered profiles, `limit` per page starting at page 0.
    pub async fn list_users(&self, page: u32, limit: u32) -> Result<Vec<UserProfile>, UserError> {
        if limit == 0 {
            return Err(UserError::InvalidInput("Page size must be positive".to_string()));
        }
        Ok(self.backend.list_users(page, limit).await?)
    }

    /// Returns the service's confirmation message.
    pub async fn create_user(&self, args: UserArgs) -> Result<String, UserError> {
        let message = settle(self.backend.create_user(args).await?)?;
        info!("Created user profile");
        Ok(message)
    }

    /// Full replace: a `None` field clears the stored value.
    pub async fn update_user(&self, args: UserArgs) -> Result<(), UserError> {
        settle(self.backend.update_user(args).await?)
    }

    pub async fn delete_user(&self) -> Result<(), UserError> {
        self.backend.delete_user().await?;
        info!("Deleted user profile");
        Ok(())
    }

    pub async fn add_neuron_id(&self, neuron_id: u64) -> Result<(), UserError> {
        settle(self.backend.add_neuron_id(neuron_id).await?)
    }

    pub async fn follow_topic(&self, topic_id: &str) -> Result<(), UserError> {
        self.check_topic(topic_id)?;
        settle(self.backend.follow_topic(topic_id).await?)
    }

    pub async fn unfollow_topic(&self, topic_id: &str) -> Result<(), UserError> {
        self.check_topic(topic_id)?;
        settle(self.backend.unfollow_topic(topic_id).await?)
    }

    pub async fn get_followed_topics(&self) -> Result<BTreeSet<String>, UserError> {
        Ok(self.backend.followed_topics().await?.into_iter().collect())
    }

    /// Flip a follow through the tracker: pending while the call runs, then
    /// confirmed on success or rolled back on failure.
    pub async fn set_following(
        &self,
        tracker: &mut FollowTracker,
        topic_id: &str,
        follow: bool,
    ) -> Result<bool, UserError> {
        tracker.begin(topic_id, follow)?;
        debug!(topic = %topic_id, follow, "Follow change pending");

        let result = if follow {
            self.follow_topic(topic_id).await
        } else {
            self.unfollow_topic(topic_id).await
        };

        match result {
            Ok(()) => Ok(tracker.confirm(topic_id)?),
            Err(e) => {
                warn!(topic = %topic_id, error = %e, "Follow change failed, rolling back");
                tracker.roll_back(topic_id)?;
                Err(e)
            }
        }
    }

    fn check_topic(&self, topic_id: &str) -> Result<(), UserError> {
        if self.registry.contains(topic_id) {
            Ok(())
        } else {
            Err(UserError::InvalidInput(format!("Unknown topic: {}", topic_id)))
        }
    }
}

/// Parse a neuron id typed by the user.
pub fn parse_neuron_id(input: &str) -> Result<u64, UserError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UserError::InvalidInput("Please enter a neuron ID".to_string()));
    }
    trimmed
        .parse()
        .map_err(|_| UserError::InvalidInput(format!("Invalid neuron ID: {}", trimmed)))
}

/// Raw profile form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub username: String,
    pub logo_url: String,
    pub neuron_id: String,
}

impl ProfileForm {
    /// Trim every field; blank fields become `None`.
    pub fn into_args(self) -> Result<UserArgs, UserError> {
        let neuron_id = match self.neuron_id.trim() {
            "" => None,
            raw => Some(parse_neuron_id(raw)?),
        };
        Ok(UserArgs {
            username: non_blank(self.username),
            logo_url: non_blank(self.logo_url),
            neuron_id,
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
