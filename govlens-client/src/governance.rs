//! Governance client.
//!
//! Every failure from the backend is logged and turned into an empty result
//! here; callers never see a transport error.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use govlens_core::{
    FollowingFeed, ProposalFeed, ProposalPage, ProposalSummary, Topic, TopicRegistry,
};

use crate::backend::{GovernanceBackend, ListProposalsRequest};

/// Page size when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Largest page the governance interface will serve.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Page size used for per-topic fetches.
pub const TOPIC_FETCH_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct GovernanceClient {
    backend: Arc<dyn GovernanceBackend>,
    registry: TopicRegistry,
    page_size: u32,
}

impl GovernanceClient {
    pub fn new(backend: Arc<dyn GovernanceBackend>) -> Self {
        Self {
            backend,
            registry: TopicRegistry::nns(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_registry(mut self, registry: TopicRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Default page size for feeds, clamped to `1..=100`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = clamp_limit(page_size);
        self
    }

    pub fn registry(&self) -> &TopicRegistry {
        &self.registry
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// One page of open proposals, newest first. `before` asks for the page
    /// strictly older than that id.
    pub async fn list_open_proposals(&self, before: Option<u64>, limit: Option<u32>) -> ProposalPage {
        let limit = clamp_limit(limit.unwrap_or(DEFAULT_PAGE_SIZE));
        let request = ListProposalsRequest::open(limit).with_before(before);

        match self.backend.list_proposals(request).await {
            Ok(response) => {
                let proposals = response.into_summaries();
                debug!(count = proposals.len(), limit, "Fetched open proposals");
                ProposalPage::from_fetch(proposals, limit)
            }
            Err(e) => {
                warn!(error = %e, "Failed to list open proposals");
                ProposalPage::empty()
            }
        }
    }

    /// Open proposals for one topic. Unknown topics yield an empty list.
    pub async fn list_proposals_by_topic(&self, topic_id: &str) -> Vec<ProposalSummary> {
        let Some(code) = self.registry.lookup_code(topic_id) else {
            warn!(topic = %topic_id, "Unknown topic id, returning no proposals");
            return Vec::new();
        };

        let request = ListProposalsRequest::open(TOPIC_FETCH_LIMIT);
        match self.backend.list_proposals(request).await {
            Ok(response) => response
                .into_summaries()
                .into_iter()
                .filter(|p| p.topic_code == code)
                .collect(),
            Err(e) => {
                warn!(topic = %topic_id, error = %e, "Failed to list proposals for topic");
                Vec::new()
            }
        }
    }

    pub async fn get_proposal(&self, id: u64) -> Option<ProposalSummary> {
        match self.backend.get_proposal(id).await {
            Ok(info) => info.and_then(|i| i.into_summary()),
            Err(e) => {
                warn!(id, error = %e, "Failed to fetch proposal");
                None
            }
        }
    }

    /// Every topic with its open-proposal count, from one full page.
    pub async fn open_topics(&self) -> Vec<Topic> {
        let page = self.list_open_proposals(None, Some(MAX_PAGE_SIZE)).await;
        self.registry.with_open_counts(&page.proposals)
    }

    /// First page of the "all proposals" feed.
    pub async fn load_feed(&self) -> ProposalFeed {
        let page = self.list_open_proposals(None, Some(self.page_size)).await;
        ProposalFeed::from_page(page, self.page_size).with_registry(self.registry)
    }

    /// Fetch the page after the feed's last proposal and append it.
    /// Returns how many proposals were added; 0 without a request when the
    /// feed is exhausted or empty.
    pub async fn load_more(&self, feed: &mut ProposalFeed) -> usize {
        if !feed.has_more() {
            return 0;
        }
        let Some(cursor) = feed.next_cursor() else {
            return 0;
        };
        let page = self
            .list_open_proposals(Some(cursor), Some(feed.page_size()))
            .await;
        let added = page.len();
        feed.append_page(page);
        added
    }

    /// Fetch every followed topic concurrently. Each result lands in its own
    /// slot, so completion order does not matter. Slots hold proposals of
    /// every status so the feed can show past proposals too.
    pub async fn fetch_following(&self, topic_ids: &[String]) -> FollowingFeed {
        let mut feed = FollowingFeed::new(topic_ids.iter().cloned());

        let fetches = feed.topics().iter().map(|topic| async move {
            let proposals = self.topic_history(topic).await;
            (topic.clone(), proposals)
        });
        let results = join_all(fetches).await;

        for (topic, proposals) in results {
            feed.insert(&topic, proposals);
        }
        feed
    }

    /// Proposals of any status for one topic.
    async fn topic_history(&self, topic_id: &str) -> Vec<ProposalSummary> {
        let Some(code) = self.registry.lookup_code(topic_id) else {
            warn!(topic = %topic_id, "Unknown followed topic, leaving slot empty");
            return Vec::new();
        };

        match self.backend.list_proposals(ListProposalsRequest::all(TOPIC_FETCH_LIMIT)).await {
            Ok(response) => {
                let proposals: Vec<_> = response
                    .into_summaries()
                    .into_iter()
                    .filter(|p| p.topic_code == code)
                    .collect();
                debug!(topic = %topic_id, count = proposals.len(), "Fetched topic history");
                proposals
            }
            Err(e) => {
                warn!(topic = %topic_id, error = %e, "Failed to fetch topic history");
                Vec::new()
            }
        }
    }
}

fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_PAGE_SIZE)
}
