//! Proposal and account records shared by every govlens crate.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Base URL of the public proposal dashboard, used when a proposal carries no link.
pub const DASHBOARD_PROPOSAL_URL: &str = "https://dashboard.internetcomputer.org/proposal";

const SECONDS_PER_HOUR: u64 = 60 * 60;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Lifecycle status of a proposal, numbered as the governance interface numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    #[default]
    Unspecified,
    Open,
    Rejected,
    Adopted,
    Executed,
    Failed,
}

impl ProposalStatus {
    /// All statuses in code order.
    pub const ALL: [ProposalStatus; 6] = [
        ProposalStatus::Unspecified,
        ProposalStatus::Open,
        ProposalStatus::Rejected,
        ProposalStatus::Adopted,
        ProposalStatus::Executed,
        ProposalStatus::Failed,
    ];

    /// Numeric code understood by the governance interface.
    pub fn code(self) -> i32 {
        match self {
            ProposalStatus::Unspecified => 0,
            ProposalStatus::Open => 1,
            ProposalStatus::Rejected => 2,
            ProposalStatus::Adopted => 3,
            ProposalStatus::Executed => 4,
            ProposalStatus::Failed => 5,
        }
    }

    /// Decode a numeric status. Unknown codes decode as `Unspecified`.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => ProposalStatus::Open,
            2 => ProposalStatus::Rejected,
            3 => ProposalStatus::Adopted,
            4 => ProposalStatus::Executed,
            5 => ProposalStatus::Failed,
            _ => ProposalStatus::Unspecified,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ProposalStatus::Unspecified => "Unknown",
            ProposalStatus::Open => "Open",
            ProposalStatus::Rejected => "Rejected",
            ProposalStatus::Adopted => "Adopted",
            ProposalStatus::Executed => "Executed",
            ProposalStatus::Failed => "Failed",
        }
    }

    pub fn is_open(self) -> bool {
        self == ProposalStatus::Open
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate vote counts at the time of fetch.
///
/// `total == yes + no` is assumed by callers but never checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Tally {
    pub yes: u64,
    pub no: u64,
    pub total: u64,
}

/// A governance proposal as rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    /// Unique, monotonically increasing at the source
    pub id: u64,
    pub title: String,
    /// Markdown body
    pub summary: String,
    pub topic_code: i32,
    pub status: ProposalStatus,
    pub proposer_id: Option<u64>,
    /// Seconds since epoch
    pub created_at: u64,
    /// Seconds since epoch; absent means no deadline
    pub voting_deadline: Option<u64>,
    pub tally: Option<Tally>,
    pub external_url: Option<String>,
}

impl ProposalSummary {
    /// Minimal open proposal, mostly useful for tests and fixtures.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            summary: String::new(),
            topic_code: 0,
            status: ProposalStatus::Open,
            proposer_id: None,
            created_at: 0,
            voting_deadline: None,
            tally: None,
            external_url: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_topic(mut self, topic_code: i32) -> Self {
        self.topic_code = topic_code;
        self
    }

    pub fn with_status(mut self, status: ProposalStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_created_at(mut self, created_at: u64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_deadline(mut self, deadline: u64) -> Self {
        self.voting_deadline = Some(deadline);
        self
    }

    pub fn with_tally(mut self, yes: u64, no: u64) -> Self {
        self.tally = Some(Tally {
            yes,
            no,
            total: yes + no,
        });
        self
    }

    /// Title for display; empty titles render as "Untitled Proposal".
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled Proposal"
        } else {
            &self.title
        }
    }

    /// Total votes, 0 without a tally.
    pub fn total_votes(&self) -> u64 {
        self.tally.map(|t| t.total).unwrap_or(0)
    }

    /// Share of yes votes, rounded to a whole percent. 0 when nobody voted.
    pub fn yes_percentage(&self) -> u8 {
        match self.tally {
            Some(t) if t.total > 0 => {
                let pct = (t.yes as f64 / t.total as f64 * 100.0).round();
                pct.clamp(0.0, 100.0) as u8
            }
            _ => 0,
        }
    }

    /// External link if the proposal has one, otherwise the dashboard page.
    pub fn link(&self) -> String {
        match self.external_url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("{}/{}", DASHBOARD_PROPOSAL_URL, self.id),
        }
    }

    /// Voting time left relative to `now` (seconds since epoch).
    pub fn time_remaining(&self, now: u64) -> TimeRemaining {
        let Some(deadline) = self.voting_deadline else {
            return TimeRemaining::NoDeadline;
        };
        if deadline <= now {
            return TimeRemaining::Ended;
        }
        let diff = deadline - now;
        TimeRemaining::Remaining {
            days: diff / SECONDS_PER_DAY,
            hours: (diff % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
        }
    }
}

/// Voting time left on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRemaining {
    NoDeadline,
    Ended,
    Remaining { days: u64, hours: u64 },
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRemaining::NoDeadline => f.write_str("No deadline"),
            TimeRemaining::Ended => f.write_str("Voting ended"),
            TimeRemaining::Remaining { days, hours } if *days > 0 => {
                write!(f, "{} days, {} hours remaining", days, hours)
            }
            TimeRemaining::Remaining { hours, .. } => write!(f, "{} hours remaining", hours),
        }
    }
}

/// One page of proposals from the governance interface.
///
/// `has_more` is `true` exactly when the page was full. A final page that
/// happens to be full still reports `true`; the following fetch returns an
/// empty page and settles it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalPage {
    pub proposals: Vec<ProposalSummary>,
    pub has_more: bool,
}

impl ProposalPage {
    pub fn from_fetch(proposals: Vec<ProposalSummary>, limit: u32) -> Self {
        let has_more = limit > 0 && proposals.len() == limit as usize;
        Self {
            proposals,
            has_more,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}

/// A browseable proposal category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Derived from the last fetch, never persisted
    pub open_proposals_count: u32,
}

/// Account record held by the user backend, keyed by principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct UserProfile {
    pub principal_id: String,
    pub username: Option<String>,
    pub logo_url: Option<String>,
    pub neuron_id: Option<u64>,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
}

/// Arguments for creating or replacing a profile.
///
/// On update every field is replaced, so `None` clears the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct UserArgs {
    pub username: Option<String>,
    pub logo_url: Option<String>,
    pub neuron_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_round_trip_through_labels() {
        for status in ProposalStatus::ALL {
            assert_eq!(ProposalStatus::from_code(status.code()), status);
        }
        assert_eq!(ProposalStatus::from_code(42), ProposalStatus::Unspecified);
        assert_eq!(ProposalStatus::Unspecified.label(), "Unknown");
    }

    #[test]
    fn test_time_remaining_display() {
        let p = ProposalSummary::new(1, "t").with_deadline(1_000 + 2 * SECONDS_PER_DAY + 3 * SECONDS_PER_HOUR + 59);
        assert_eq!(p.time_remaining(1_000).to_string(), "2 days, 3 hours remaining");

        let p = ProposalSummary::new(1, "t").with_deadline(1_000 + 5 * SECONDS_PER_HOUR);
        assert_eq!(p.time_remaining(1_000).to_string(), "5 hours remaining");

        assert_eq!(p.time_remaining(1_000 + 5 * SECONDS_PER_HOUR), TimeRemaining::Ended);
        assert_eq!(
            ProposalSummary::new(2, "t").time_remaining(0).to_string(),
            "No deadline"
        );
    }

    #[test]
    fn test_yes_percentage() {
        assert_eq!(ProposalSummary::new(1, "t").yes_percentage(), 0);
        assert_eq!(ProposalSummary::new(1, "t").with_tally(2, 1).yes_percentage(), 67);
        assert_eq!(ProposalSummary::new(1, "t").with_tally(0, 0).yes_percentage(), 0);
    }

    #[test]
    fn test_link_falls_back_to_dashboard() {
        let mut p = ProposalSummary::new(139205, "Change Subnet Membership");
        assert_eq!(
            p.link(),
            "https://dashboard.internetcomputer.org/proposal/139205"
        );
        p.external_url = Some("https://forum.example/t/1".into());
        assert_eq!(p.link(), "https://forum.example/t/1");
    }

    #[test]
    fn test_page_has_more_is_exact_equality() {
        let full: Vec<_> = (0..50).map(|i| ProposalSummary::new(i, "p")).collect();
        assert!(ProposalPage::from_fetch(full, 50).has_more);

        let short: Vec<_> = (0..37).map(|i| ProposalSummary::new(i, "p")).collect();
        assert!(!ProposalPage::from_fetch(short, 50).has_more);
    }

    #[test]
    fn test_display_title() {
        assert_eq!(ProposalSummary::new(1, "").display_title(), "Untitled Proposal");
        assert_eq!(ProposalSummary::new(1, "Install Code").display_title(), "Install Code");
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let p = ProposalSummary::new(5, "Motion")
            .with_topic(4)
            .with_deadline(100)
            .with_status(ProposalStatus::Adopted);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["topicCode"], 4);
        assert_eq!(json["votingDeadline"], 100);
        assert_eq!(json["status"], "adopted");

        let back: ProposalSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
