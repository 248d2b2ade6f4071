//! Remote backend abstraction layer.
//!
//! Trait-based access to the two remote services:
//! - Governance interface (proposal records)
//! - User-preference service (profiles, neurons, follows)
//!
//! Each has an HTTP implementation and an in-process double for tests.

pub mod http;
pub mod memory;
pub mod mock;
pub mod traits;

pub use http::{HttpConfig, HttpGovernanceBackend, HttpUserBackend};
pub use memory::{InMemoryUserBackend, InMemoryUserStore};
pub use mock::MockGovernanceBackend;
pub use traits::{
    GovernanceBackend, ListProposalsRequest, ListProposalsResponse, ProposalInfo, RemoteResult,
    UserBackend,
};
