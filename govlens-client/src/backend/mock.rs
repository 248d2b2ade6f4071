//! Mock governance backend for testing.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use govlens_core::ProposalSummary;

use super::traits::*;
use crate::error::ClientError;

/// Governance backend over a fixed proposal set.
///
/// Paging behaves like the remote interface: status filter, topic exclusion,
/// descending id, strict `before` cursor, then `limit`.
pub struct MockGovernanceBackend {
    proposals: Vec<ProposalInfo>,
    available: AtomicBool,
    call_count: AtomicU32,
}

impl MockGovernanceBackend {
    pub fn new() -> Self {
        Self {
            proposals: Vec::new(),
            available: AtomicBool::new(true),
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the proposal set.
    pub fn with_proposals(mut self, proposals: &[ProposalSummary]) -> Self {
        self.proposals = proposals.iter().map(ProposalInfo::from).collect();
        self
    }

    /// Add raw wire records, e.g. ones without an id.
    pub fn with_records(mut self, records: Vec<ProposalInfo>) -> Self {
        self.proposals.extend(records);
        self
    }

    /// Set availability.
    pub fn with_available(self, available: bool) -> Self {
        self.set_available(available);
        self
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of backend calls made so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), ClientError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if !self.available.load(Ordering::SeqCst) {
            return Err(ClientError::Unavailable(
                "Mock governance backend disabled".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MockGovernanceBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GovernanceBackend for MockGovernanceBackend {
    async fn list_proposals(
        &self,
        request: ListProposalsRequest,
    ) -> Result<ListProposalsResponse, ClientError> {
        self.enter()?;

        let mut matching: Vec<&ProposalInfo> = self
            .proposals
            .iter()
            .filter(|p| {
                request.include_status.is_empty() || request.include_status.contains(&p.status)
            })
            .filter(|p| !request.exclude_topic.contains(&p.topic))
            .filter(|p| match (request.before_proposal, p.id) {
                (Some(before), Some(id)) => id < before,
                _ => true,
            })
            .collect();
        matching.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(ListProposalsResponse {
            proposals: matching
                .into_iter()
                .take(request.limit as usize)
                .cloned()
                .collect(),
        })
    }

    async fn get_proposal(&self, id: u64) -> Result<Option<ProposalInfo>, ClientError> {
        self.enter()?;
        Ok(self.proposals.iter().find(|p| p.id == Some(id)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govlens_core::ProposalStatus;

    fn backend() -> MockGovernanceBackend {
        let proposals: Vec<_> = (1..=5)
            .map(|id| {
                let p = ProposalSummary::new(id, format!("p{id}")).with_topic(7);
                if id == 3 {
                    p.with_status(ProposalStatus::Executed)
                } else {
                    p
                }
            })
            .collect();
        MockGovernanceBackend::new().with_proposals(&proposals)
    }

    #[tokio::test]
    async fn test_paging_is_descending_with_cursor() {
        let backend = backend();

        let page = backend
            .list_proposals(ListProposalsRequest::open(2))
            .await
            .unwrap();
        let ids: Vec<_> = page.proposals.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![Some(5), Some(4)]);

        let page = backend
            .list_proposals(ListProposalsRequest::open(2).with_before(Some(4)))
            .await
            .unwrap();
        let ids: Vec<_> = page.proposals.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![Some(2), Some(1)]);
        assert_eq!(backend.call_count(), 2);
    }

    #[test]
    fn test_empty_status_filter_returns_every_status() {
        let backend = backend();
        let page = tokio_test::block_on(backend.list_proposals(ListProposalsRequest::all(10)))
            .unwrap();
        assert_eq!(page.proposals.len(), 5);
        assert!(page.proposals.iter().any(|p| p.status == ProposalStatus::Executed.code()));

        let open = tokio_test::block_on(backend.list_proposals(ListProposalsRequest::open(10)))
            .unwrap();
        assert_eq!(open.proposals.len(), 4);
    }

    #[tokio::test]
    async fn test_mock_unavailable() {
        let backend = backend().with_available(false);
        let result = backend.get_proposal(1).await;
        assert!(matches!(result, Err(ClientError::Unavailable(_))));
    }
}
