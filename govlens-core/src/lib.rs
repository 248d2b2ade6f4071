//! Core data layer for the govlens governance explorer
//!
//! Everything in this crate is pure and synchronous: it operates on
//! proposals that have already been fetched and never performs I/O.
//!
//! # Key Components
//!
//! - [`TopicRegistry`]: Closed table mapping topic ids to governance topic codes
//! - [`ProposalQuery`]: Status, topic, search and sort composed over a fetched slice
//! - [`ProposalFeed`]: Canonical proposal sequence with "load more" continuation
//! - [`FollowingFeed`]: Per-topic slots for the followed-topics view
//! - [`FollowTracker`]: Pending / confirmed / rolled-back follow toggles
//! - [`FileTree`]: Arena-indexed source tree for the architecture explorer
//!
//! # Example
//!
//! ```ignore
//! use govlens_core::{ProposalQuery, SortOrder, StatusFilter, TopicRegistry};
//!
//! let query = ProposalQuery::new()
//!     .with_status(StatusFilter::Only(ProposalStatus::Open))
//!     .with_search("subnet")
//!     .with_sort(SortOrder::EndingSoon);
//!
//! let view = query.apply(&proposals, &TopicRegistry::nns());
//! ```

pub mod aggregator;
pub mod error;
pub mod follow;
pub mod following;
pub mod layers;
pub mod topics;
pub mod tree;
pub mod types;

// Re-export main types
pub use aggregator::{
    ending_soon, ending_within, filter_by_search, filter_by_status, filter_by_topic,
    sort_proposals, sorted, ProposalFeed, ProposalQuery, SortOrder, StatusFilter, TopicFilter,
    ENDING_SOON_WINDOW_SECS,
};
pub use error::{FollowError, ParseError};
pub use follow::{FollowState, FollowTracker};
pub use following::{FollowingFeed, FollowingFilter, TopicGroup};
pub use layers::{layer, layers_for_path, ArchitectureLayer, PathPattern, LAYERS};
pub use topics::{
    search_topics, total_open, GuideExamples, TopicDefinition, TopicGuide, TopicRegistry,
    NNS_TOPICS, REVIEW_STEPS, TOPIC_GUIDES, VOTING_PRACTICES,
};
pub use tree::{FileNode, FileTree, Highlight, NodeId, NodeKind, TreeRow};
pub use types::*;
