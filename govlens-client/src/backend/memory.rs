//! In-memory user-preference service.
//!
//! Mirrors the remote contract: one profile per principal, creation refuses
//! duplicates, mutations refuse missing profiles, deletion is idempotent and
//! following is set-like.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use govlens_core::{UserArgs, UserProfile};

use super::traits::*;
use crate::error::ClientError;
use crate::session::{Identity, UserBackendConnector};

const USER_EXISTS: &str = "User already exists";
const USER_MISSING: &str = "User does not exist";

#[derive(Debug, Clone)]
struct StoredUser {
    profile: UserProfile,
    follows: BTreeSet<String>,
}

/// Shared store; hand out per-principal views with [`InMemoryUserStore::backend_for`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, StoredUser>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend acting as `principal`.
    pub fn backend_for(&self, principal: impl Into<String>) -> InMemoryUserBackend {
        InMemoryUserBackend {
            store: self.clone(),
            principal: principal.into(),
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl UserBackendConnector for InMemoryUserStore {
    fn connect(&self, identity: &Identity) -> Result<Arc<dyn UserBackend>, ClientError> {
        Ok(Arc::new(self.backend_for(identity.principal.clone())))
    }
}

/// View of an [`InMemoryUserStore`] for one caller.
#[derive(Debug, Clone)]
pub struct InMemoryUserBackend {
    store: InMemoryUserStore,
    principal: String,
}

impl InMemoryUserBackend {
    pub fn principal(&self) -> &str {
        &self.principal
    }

    async fn with_user<T>(&self, f: impl FnOnce(&mut StoredUser) -> T) -> RemoteResult<T> {
        let mut users = self.store.users.write().await;
        match users.get_mut(&self.principal) {
            Some(user) => RemoteResult::Ok(f(user)),
            None => RemoteResult::Err(USER_MISSING.to_string()),
        }
    }
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

#[async_trait]
impl UserBackend for InMemoryUserBackend {
    async fn get_current_user(&self) -> Result<Option<UserProfile>, ClientError> {
        self.get_user(&self.principal).await
    }

    async fn get_user(&self, principal: &str) -> Result<Option<UserProfile>, ClientError> {
        let users = self.store.users.read().await;
        Ok(users.get(principal).map(|u| u.profile.clone()))
    }

    async fn user_count(&self) -> Result<u64, ClientError> {
        Ok(self.store.users.read().await.len() as u64)
    }

    async fn list_users(&self, page: u32, limit: u32) -> Result<Vec<UserProfile>, ClientError> {
        let users = self.store.users.read().await;
        let mut profiles: Vec<_> = users.values().map(|u| u.profile.clone()).collect();
        profiles.sort_by(|a, b| a.principal_id.cmp(&b.principal_id));

        let skip = page as usize * limit as usize;
        Ok(profiles.into_iter().skip(skip).take(limit as usize).collect())
    }

    async fn create_user(&self, args: UserArgs) -> Result<RemoteResult<String>, ClientError> {
        let mut users = self.store.users.write().await;
        if users.contains_key(&self.principal) {
            return Ok(RemoteResult::Err(USER_EXISTS.to_string()));
        }

        let now = now_secs();
        users.insert(
            self.principal.clone(),
            StoredUser {
                profile: UserProfile {
                    principal_id: self.principal.clone(),
                    username: args.username,
                    logo_url: args.logo_url,
                    neuron_id: args.neuron_id,
                    created_at: now,
                    updated_at: now,
                },
                follows: BTreeSet::new(),
            },
        );
        Ok(RemoteResult::Ok("User added successfully".to_string()))
    }

    async fn update_user(&self, args: UserArgs) -> Result<RemoteResult<()>, ClientError> {
        Ok(self
            .with_user(|user| {
                user.profile.username = args.username;
                user.profile.logo_url = args.logo_url;
                user.profile.neuron_id = args.neuron_id;
                user.profile.updated_at = now_secs();
            })
            .await)
    }

    async fn delete_user(&self) -> Result<(), ClientError> {
        self.store.users.write().await.remove(&self.principal);
        Ok(())
    }

    async fn add_neuron_id(&self, neuron_id: u64) -> Result<RemoteResult<()>, ClientError> {
        Ok(self
            .with_user(|user| {
                user.profile.neuron_id = Some(neuron_id);
                user.profile.updated_at = now_secs();
            })
            .await)
    }

    async fn follow_topic(&self, topic_id: &str) -> Result<RemoteResult<()>, ClientError> {
        Ok(self
            .with_user(|user| {
                user.follows.insert(topic_id.to_string());
            })
            .await)
    }

    async fn unfollow_topic(&self, topic_id: &str) -> Result<RemoteResult<()>, ClientError> {
        Ok(self
            .with_user(|user| {
                user.follows.remove(topic_id);
            })
            .await)
    }

    async fn followed_topics(&self) -> Result<Vec<String>, ClientError> {
        let users = self.store.users.read().await;
        Ok(users
            .get(&self.principal)
            .map(|u| u.follows.iter().cloned().collect())
            .unwrap_or_default())
    }
}
