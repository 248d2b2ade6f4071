//! Core traits for remote backends.
//!
//! `GovernanceBackend` speaks to the governance interface that owns proposal
//! records. `UserBackend` speaks to the user-preference service on behalf of
//! one signed-in principal.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use govlens_core::{ProposalStatus, ProposalSummary, Tally, UserArgs, UserProfile};

use crate::error::ClientError;

/// Read access to governance proposals.
#[async_trait]
pub trait GovernanceBackend: Send + Sync {
    /// Fetch one page of proposals, newest id first.
    async fn list_proposals(
        &self,
        request: ListProposalsRequest,
    ) -> Result<ListProposalsResponse, ClientError>;

    /// Fetch a single proposal. `None` when the id is unknown.
    async fn get_proposal(&self, id: u64) -> Result<Option<ProposalInfo>, ClientError>;
}

/// Account, neuron and follow operations for the caller's principal.
///
/// Mutations that the service can refuse return a [`RemoteResult`]; the outer
/// `Result` only carries transport failures.
#[async_trait]
pub trait UserBackend: Send + Sync {
    async fn get_current_user(&self) -> Result<Option<UserProfile>, ClientError>;

    async fn get_user(&self, principal: &str) -> Result<Option<UserProfile>, ClientError>;

    async fn user_count(&self) -> Result<u64, ClientError>;

    /// One page of profiles, `limit` per page starting at page 0.
    async fn list_users(&self, page: u32, limit: u32) -> Result<Vec<UserProfile>, ClientError>;

    async fn create_user(&self, args: UserArgs) -> Result<RemoteResult<String>, ClientError>;

    /// Replace every optional field of the caller's profile.
    async fn update_user(&self, args: UserArgs) -> Result<RemoteResult<()>, ClientError>;

    /// Remove the caller's profile. Succeeds when there is none.
    async fn delete_user(&self) -> Result<(), ClientError>;

    async fn add_neuron_id(&self, neuron_id: u64) -> Result<RemoteResult<()>, ClientError>;

    async fn follow_topic(&self, topic_id: &str) -> Result<RemoteResult<()>, ClientError>;

    async fn unfollow_topic(&self, topic_id: &str) -> Result<RemoteResult<()>, ClientError>;

    async fn followed_topics(&self) -> Result<Vec<String>, ClientError>;
}

/// Application-level outcome of a remote mutation.
///
/// Serialized as `{"Ok": value}` or `{"Err": "message"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteResult<T> {
    Ok(T),
    Err(String),
}

impl<T> RemoteResult<T> {
    pub fn into_result(self) -> Result<T, String> {
        match self {
            RemoteResult::Ok(value) => Ok(value),
            RemoteResult::Err(message) => Err(message),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, RemoteResult::Ok(_))
    }
}

impl<T> From<Result<T, String>> for RemoteResult<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => RemoteResult::Ok(value),
            Err(message) => RemoteResult::Err(message),
        }
    }
}

/// Body of `POST /list_proposals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProposalsRequest {
    /// Status codes to include; empty means every status
    pub include_status: Vec<i32>,
    pub limit: u32,
    /// Only proposals with an id strictly below this one
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub before_proposal: Option<u64>,
    /// Topic codes to leave out
    #[serde(default)]
    pub exclude_topic: Vec<i32>,
}

impl ListProposalsRequest {
    /// Open proposals only.
    pub fn open(limit: u32) -> Self {
        Self {
            include_status: vec![ProposalStatus::Open.code()],
            limit,
            before_proposal: None,
            exclude_topic: Vec::new(),
        }
    }

    /// Every status, open and closed.
    pub fn all(limit: u32) -> Self {
        Self {
            include_status: Vec::new(),
            ..Self::open(limit)
        }
    }

    pub fn with_before(mut self, before: Option<u64>) -> Self {
        self.before_proposal = before;
        self
    }
}

/// Response of `POST /list_proposals`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListProposalsResponse {
    #[serde(default)]
    pub proposals: Vec<ProposalInfo>,
}

impl ListProposalsResponse {
    /// Convert to summaries, dropping records without an id.
    pub fn into_summaries(self) -> Vec<ProposalSummary> {
        self.proposals
            .into_iter()
            .filter_map(ProposalInfo::into_summary)
            .collect()
    }
}

/// Governance record as the remote interface returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalInfo {
    pub id: Option<u64>,
    pub proposal: Option<ProposalBody>,
    #[serde(default)]
    pub topic: i32,
    #[serde(default)]
    pub status: i32,
    pub proposer: Option<u64>,
    #[serde(default)]
    pub proposal_timestamp_seconds: u64,
    pub deadline_timestamp_seconds: Option<u64>,
    pub latest_tally: Option<TallyInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalBody {
    pub title: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyInfo {
    pub yes: u64,
    pub no: u64,
    pub total: u64,
    #[serde(default)]
    pub timestamp_seconds: u64,
}

impl ProposalInfo {
    /// `None` for records without an id.
    pub fn into_summary(self) -> Option<ProposalSummary> {
        let id = self.id?;
        let body = self.proposal.unwrap_or_default();

        Some(ProposalSummary {
            id,
            title: body.title.unwrap_or_default(),
            summary: body.summary,
            topic_code: self.topic,
            status: ProposalStatus::from_code(self.status),
            proposer_id: self.proposer,
            created_at: self.proposal_timestamp_seconds,
            voting_deadline: self.deadline_timestamp_seconds,
            tally: self.latest_tally.map(|t| Tally {
                yes: t.yes,
                no: t.no,
                total: t.total,
            }),
            external_url: Some(body.url).filter(|url| !url.is_empty()),
        })
    }
}

impl From<&ProposalSummary> for ProposalInfo {
    fn from(p: &ProposalSummary) -> Self {
        Self {
            id: Some(p.id),
            proposal: Some(ProposalBody {
                title: Some(p.title.clone()),
                summary: p.summary.clone(),
                url: p.external_url.clone().unwrap_or_default(),
            }),
            topic: p.topic_code,
            status: p.status.code(),
            proposer: p.proposer_id,
            proposal_timestamp_seconds: p.created_at,
            deadline_timestamp_seconds: p.voting_deadline,
            latest_tally: p.tally.map(|t| TallyInfo {
                yes: t.yes,
                no: t.no,
                total: t.total,
                timestamp_seconds: 0,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_result_wire_shape() {
        let ok: RemoteResult<()> = serde_json::from_str(r#"{"Ok":null}"#).unwrap();
        assert!(ok.is_ok());

        let err: RemoteResult<()> = serde_json::from_str(r#"{"Err":"User does not exist"}"#).unwrap();
        assert_eq!(err.into_result(), Err("User does not exist".to_string()));

        let json = serde_json::to_string(&RemoteResult::<String>::Ok("done".into())).unwrap();
        assert_eq!(json, r#"{"Ok":"done"}"#);
    }

    #[test]
    fn test_request_omits_missing_cursor() {
        let json = serde_json::to_value(ListProposalsRequest::open(50)).unwrap();
        assert_eq!(json["include_status"], serde_json::json!([1]));
        assert!(json.get("before_proposal").is_none());

        let json = serde_json::to_value(ListProposalsRequest::open(50).with_before(Some(9))).unwrap();
        assert_eq!(json["before_proposal"], 9);

        let json = serde_json::to_value(ListProposalsRequest::all(100)).unwrap();
        assert_eq!(json["include_status"], serde_json::json!([]));
        assert_eq!(json["limit"], 100);
    }

    #[test]
    fn test_proposal_info_conversion() {
        let info: ProposalInfo = serde_json::from_value(serde_json::json!({
            "id": 139205,
            "proposal": {"title": "Change Subnet Membership", "summary": "Replace a node", "url": ""},
            "topic": 7,
            "status": 1,
            "proposer": 42,
            "proposal_timestamp_seconds": 1700000000,
            "deadline_timestamp_seconds": 1700345600,
            "latest_tally": {"yes": 58, "no": 0, "total": 58, "timestamp_seconds": 1700000100}
        }))
        .unwrap();

        let summary = info.into_summary().unwrap();
        assert_eq!(summary.id, 139205);
        assert_eq!(summary.status, ProposalStatus::Open);
        assert_eq!(summary.topic_code, 7);
        assert_eq!(summary.total_votes(), 58);
        assert!(summary.external_url.is_none());
        assert_eq!(summary.link(), "https://dashboard.internetcomputer.org/proposal/139205");
    }

    #[test]
    fn test_records_without_id_are_dropped() {
        let response: ListProposalsResponse = serde_json::from_value(serde_json::json!({
            "proposals": [
                {"id": null, "topic": 4, "status": 1},
                {"id": 7, "status": 9}
            ]
        }))
        .unwrap();

        let summaries = response.into_summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].status, ProposalStatus::Unspecified);
        assert_eq!(summaries[0].display_title(), "Untitled Proposal");
    }
}
