//! Remote access for govlens
//!
//! Async clients for the governance interface and the user-preference
//! service, plus the session context that ties them to a signed-in identity.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use govlens_client::{GovernanceClient, HttpConfig, HttpGovernanceBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = HttpGovernanceBackend::new(HttpConfig::new("http://localhost:8000"))?;
//! let governance = GovernanceClient::new(Arc::new(backend));
//!
//! let page = governance.list_open_proposals(None, None).await;
//! println!("{} proposals, more: {}", page.len(), page.has_more);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod error;
pub mod governance;
pub mod session;
pub mod users;

// Re-export main types
pub use backend::{
    GovernanceBackend, HttpConfig, HttpGovernanceBackend, HttpUserBackend, InMemoryUserStore,
    MockGovernanceBackend, RemoteResult, UserBackend,
};
pub use error::{ClientError, UserError};
pub use governance::{GovernanceClient, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use session::{AccountState, HttpUserConnector, Identity, Session, UserBackendConnector};
pub use users::{parse_neuron_id, ProfileForm, UserClient};
