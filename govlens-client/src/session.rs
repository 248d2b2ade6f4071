//! Session context.
//!
//! Built once at startup and passed by reference to whatever needs remote
//! access. Holds the anonymous governance client, the signed-in identity and
//! the account lifecycle.

use std::sync::Arc;

use tracing::info;

use govlens_core::{UserArgs, UserProfile};

use crate::backend::{HttpConfig, HttpUserBackend, UserBackend};
use crate::error::{ClientError, UserError};
use crate::governance::GovernanceClient;
use crate::users::UserClient;

/// Identity handed over by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub principal: String,
    /// Bearer token presented to the user backend
    pub token: Option<String>,
}

impl Identity {
    pub fn new(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Binds a user backend to an identity.
pub trait UserBackendConnector: Send + Sync {
    fn connect(&self, identity: &Identity) -> Result<Arc<dyn UserBackend>, ClientError>;
}

/// Connects to the user-preference service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpUserConnector {
    config: HttpConfig,
}

impl HttpUserConnector {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }
}

impl UserBackendConnector for HttpUserConnector {
    fn connect(&self, identity: &Identity) -> Result<Arc<dyn UserBackend>, ClientError> {
        let backend = HttpUserBackend::new(self.config.clone(), identity.token.clone())?;
        Ok(Arc::new(backend))
    }
}

/// Account lifecycle: signed out, signed in without a profile, signed in
/// with one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccountState {
    #[default]
    Unauthenticated,
    NoProfile,
    HasProfile(UserProfile),
}

impl AccountState {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AccountState::Unauthenticated)
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            AccountState::HasProfile(profile) => Some(profile),
            _ => None,
        }
    }
}

pub struct Session {
    governance: GovernanceClient,
    connector: Arc<dyn UserBackendConnector>,
    identity: Option<Identity>,
    users: Option<UserClient>,
    account: AccountState,
}

impl Session {
    pub fn new(governance: GovernanceClient, connector: Arc<dyn UserBackendConnector>) -> Self {
        Self {
            governance,
            connector,
            identity: None,
            users: None,
            account: AccountState::Unauthenticated,
        }
    }

    pub fn governance(&self) -> &GovernanceClient {
        &self.governance
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn account(&self) -> &AccountState {
        &self.account
    }

    pub fn is_authenticated(&self) -> bool {
        self.account.is_authenticated()
    }

    /// User client for the signed-in identity.
    pub fn users(&self) -> Result<&UserClient, UserError> {
        self.users.as_ref().ok_or(UserError::NotAuthenticated)
    }

    /// Bind to `identity`. The account is `NoProfile` until
    /// [`Session::refresh_account`] says otherwise.
    pub fn sign_in(&mut self, identity: Identity) -> Result<(), UserError> {
        let backend = self.connector.connect(&identity)?;
        info!(principal = %identity.principal, "Signed in");
        self.users = Some(UserClient::new(backend).with_registry(*self.governance.registry()));
        self.identity = Some(identity);
        self.account = AccountState::NoProfile;
        Ok(())
    }

    pub fn sign_out(&mut self) {
        if let Some(identity) = self.identity.take() {
            info!(principal = %identity.principal, "Signed out");
        }
        self.users = None;
        self.account = AccountState::Unauthenticated;
    }

    /// Ask the backend whether the caller has a profile.
    pub async fn refresh_account(&mut self) -> Result<&AccountState, UserError> {
        let profile = self.users()?.get_current_user().await?;
        self.account = match profile {
            Some(profile) => AccountState::HasProfile(profile),
            None => AccountState::NoProfile,
        };
        Ok(&self.account)
    }

    pub async fn create_account(&mut self, args: UserArgs) -> Result<&AccountState, UserError> {
        self.users()?.create_user(args).await?;
        self.refresh_account().await
    }

    pub async fn update_account(&mut self, args: UserArgs) -> Result<&AccountState, UserError> {
        self.users()?.update_user(args).await?;
        self.refresh_account().await
    }

    pub async fn add_neuron(&mut self, neuron_id: u64) -> Result<&AccountState, UserError> {
        self.users()?.add_neuron_id(neuron_id).await?;
        self.refresh_account().await
    }

    /// Delete the profile and sign out.
    pub async fn delete_account(&mut self) -> Result<(), UserError> {
        self.users()?.delete_user().await?;
        self.sign_out();
        Ok(())
    }
}
