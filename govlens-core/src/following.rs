//! Proposals grouped by followed topic.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::aggregator::{is_ending_within, ENDING_SOON_WINDOW_SECS};
use crate::error::ParseError;
use crate::types::ProposalSummary;

/// View selector for the following page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowingFilter {
    All,
    /// Open proposals
    #[default]
    Active,
    /// Open proposals closing within 48 hours
    EndingSoon,
    /// Anything no longer open
    Past,
}

impl FollowingFilter {
    pub fn matches(&self, proposal: &ProposalSummary, now: u64) -> bool {
        match self {
            FollowingFilter::All => true,
            FollowingFilter::Active => proposal.status.is_open(),
            FollowingFilter::EndingSoon => is_ending_within(proposal, now, ENDING_SOON_WINDOW_SECS),
            FollowingFilter::Past => !proposal.status.is_open(),
        }
    }
}

impl FromStr for FollowingFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(FollowingFilter::All),
            "active" => Ok(FollowingFilter::Active),
            "ending-soon" => Ok(FollowingFilter::EndingSoon),
            "past" => Ok(FollowingFilter::Past),
            other => Err(ParseError::Following(other.to_string())),
        }
    }
}

impl fmt::Display for FollowingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FollowingFilter::All => "all",
            FollowingFilter::Active => "active",
            FollowingFilter::EndingSoon => "ending-soon",
            FollowingFilter::Past => "past",
        })
    }
}

/// One topic's slice of the following view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicGroup<'a> {
    pub topic_id: &'a str,
    pub proposals: Vec<&'a ProposalSummary>,
}

/// Proposals for each followed topic, one slot per topic.
///
/// Slots are written independently, so fetches may complete in any order.
/// Rendering always follows the followed-topic order.
#[derive(Debug, Clone, Default)]
pub struct FollowingFeed {
    order: Vec<String>,
    slots: HashMap<String, Vec<ProposalSummary>>,
}

impl FollowingFeed {
    pub fn new<I, S>(followed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order: Vec<String> = Vec::new();
        for topic in followed {
            let topic = topic.into();
            if !order.contains(&topic) {
                order.push(topic);
            }
        }
        Self {
            order,
            slots: HashMap::new(),
        }
    }

    /// Followed topics in display order.
    pub fn topics(&self) -> &[String] {
        &self.order
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Store a topic's proposals, replacing only that topic's slot.
    /// Results for topics no longer followed are discarded.
    pub fn insert(&mut self, topic_id: &str, proposals: Vec<ProposalSummary>) -> bool {
        if !self.order.iter().any(|t| t == topic_id) {
            return false;
        }
        self.slots.insert(topic_id.to_string(), proposals);
        true
    }

    pub fn slot(&self, topic_id: &str) -> Option<&[ProposalSummary]> {
        self.slots.get(topic_id).map(Vec::as_slice)
    }

    /// Non-empty groups for `filter`, in followed order.
    pub fn filtered(&self, filter: FollowingFilter, now: u64) -> Vec<TopicGroup<'_>> {
        self.order
            .iter()
            .filter_map(|topic| {
                let proposals: Vec<_> = self
                    .slots
                    .get(topic)?
                    .iter()
                    .filter(|p| filter.matches(p, now))
                    .collect();
                if proposals.is_empty() {
                    None
                } else {
                    Some(TopicGroup {
                        topic_id: topic.as_str(),
                        proposals,
                    })
                }
            })
            .collect()
    }

    /// Number of proposals shown for `filter`.
    pub fn total(&self, filter: FollowingFilter, now: u64) -> usize {
        self.filtered(filter, now)
            .iter()
            .map(|g| g.proposals.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProposalStatus;

    const NOW: u64 = 1_700_000_000;

    fn feed() -> FollowingFeed {
        FollowingFeed::new(["subnet-management", "kyc", "governance"])
    }

    #[test]
    fn test_slots_are_independent_of_completion_order() {
        let mut a = feed();
        a.insert("governance", vec![ProposalSummary::new(3, "g")]);
        a.insert("subnet-management", vec![ProposalSummary::new(1, "s")]);

        let mut b = feed();
        b.insert("subnet-management", vec![ProposalSummary::new(1, "s")]);
        b.insert("governance", vec![ProposalSummary::new(3, "g")]);

        let order = |f: &FollowingFeed| -> Vec<String> {
            f.filtered(FollowingFilter::All, NOW)
                .iter()
                .map(|g| g.topic_id.to_string())
                .collect()
        };
        assert_eq!(order(&a), order(&b));
        assert_eq!(order(&a), vec!["subnet-management", "governance"]);
    }

    #[test]
    fn test_filters() {
        let mut f = feed();
        f.insert(
            "kyc",
            vec![
                ProposalSummary::new(1, "soon").with_deadline(NOW + 3600),
                ProposalSummary::new(2, "later").with_deadline(NOW + 5 * 86_400),
                ProposalSummary::new(3, "done").with_status(ProposalStatus::Executed),
            ],
        );

        assert_eq!(f.total(FollowingFilter::All, NOW), 3);
        assert_eq!(f.total(FollowingFilter::Active, NOW), 2);
        assert_eq!(f.total(FollowingFilter::EndingSoon, NOW), 1);
        assert_eq!(f.total(FollowingFilter::Past, NOW), 1);
    }

    #[test]
    fn test_unfollowed_results_are_discarded() {
        let mut f = feed();
        assert!(!f.insert("subnet-rental", vec![ProposalSummary::new(1, "x")]));
        assert!(f.slot("subnet-rental").is_none());
    }
}
