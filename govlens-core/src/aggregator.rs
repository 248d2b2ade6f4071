//! Proposal aggregation.
//!
//! Pure, synchronous filtering and sorting over an already-fetched proposal
//! sequence. Every function borrows its input and returns a derived list of
//! references; the canonical sequence is never reordered or mutated.
//!
//! Composition order is status -> topic -> search -> sort. Predicate filters
//! commute; sorting always runs last.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::error::ParseError;
use crate::topics::TopicRegistry;
use crate::types::{ProposalPage, ProposalStatus, ProposalSummary, Topic};

/// Width of the "ending soon" window.
pub const ENDING_SOON_WINDOW_SECS: u64 = 48 * 60 * 60;

/// Status selection for a proposal list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProposalStatus),
}

impl StatusFilter {
    pub fn is_all(&self) -> bool {
        matches!(self, StatusFilter::All)
    }

    pub fn matches(&self, proposal: &ProposalSummary) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => proposal.status == *status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "open" => Ok(StatusFilter::Only(ProposalStatus::Open)),
            "rejected" => Ok(StatusFilter::Only(ProposalStatus::Rejected)),
            "adopted" => Ok(StatusFilter::Only(ProposalStatus::Adopted)),
            "executed" => Ok(StatusFilter::Only(ProposalStatus::Executed)),
            "failed" => Ok(StatusFilter::Only(ProposalStatus::Failed)),
            other => Err(ParseError::Status(other.to_string())),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => f.write_str(&status.label().to_lowercase()),
        }
    }
}

/// Topic selection for a proposal list, by topic slug.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TopicFilter {
    #[default]
    All,
    Topic(String),
}

impl TopicFilter {
    pub fn topic(id: impl Into<String>) -> Self {
        TopicFilter::Topic(id.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, TopicFilter::All)
    }

    /// Resolve the slug to a topic code. `Ok(None)` means "no filtering";
    /// `Err(())` means the slug is unmapped and nothing can match.
    fn resolve(&self, registry: &TopicRegistry) -> Result<Option<i32>, ()> {
        match self {
            TopicFilter::All => Ok(None),
            TopicFilter::Topic(id) => match registry.lookup_code(id) {
                Some(code) => Ok(Some(code)),
                None => {
                    warn!(topic = %id, "Unmapped topic id, filter matches no proposals");
                    Err(())
                }
            },
        }
    }
}

impl FromStr for TopicFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(TopicFilter::All)
        } else {
            Ok(TopicFilter::Topic(s.to_string()))
        }
    }
}

/// Ordering of a rendered proposal list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Descending creation time
    #[default]
    Newest,
    /// Ascending deadline, proposals without a deadline last
    EndingSoon,
    /// Descending total votes, no tally counts as zero
    MostVoted,
}

impl FromStr for SortOrder {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "ending-soon" => Ok(SortOrder::EndingSoon),
            "most-voted" => Ok(SortOrder::MostVoted),
            other => Err(ParseError::Sort(other.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Newest => "newest",
            SortOrder::EndingSoon => "ending-soon",
            SortOrder::MostVoted => "most-voted",
        })
    }
}

/// Keep proposals whose status matches.
pub fn filter_by_status<'a, I>(proposals: I, status: StatusFilter) -> Vec<&'a ProposalSummary>
where
    I: IntoIterator<Item = &'a ProposalSummary>,
{
    proposals.into_iter().filter(|p| status.matches(p)).collect()
}

/// Keep proposals whose topic code equals the code of the selected slug.
/// An unmapped slug yields an empty list.
pub fn filter_by_topic<'a, I>(
    proposals: I,
    topic: &TopicFilter,
    registry: &TopicRegistry,
) -> Vec<&'a ProposalSummary>
where
    I: IntoIterator<Item = &'a ProposalSummary>,
{
    match topic.resolve(registry) {
        Ok(None) => proposals.into_iter().collect(),
        Ok(Some(code)) => proposals
            .into_iter()
            .filter(|p| p.topic_code == code)
            .collect(),
        Err(()) => Vec::new(),
    }
}

/// Case-insensitive substring match on title or summary. An empty query
/// keeps every proposal.
pub fn filter_by_search<'a, I>(proposals: I, query: &str) -> Vec<&'a ProposalSummary>
where
    I: IntoIterator<Item = &'a ProposalSummary>,
{
    if query.is_empty() {
        return proposals.into_iter().collect();
    }
    let query = query.to_lowercase();
    proposals
        .into_iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&query) || p.summary.to_lowercase().contains(&query)
        })
        .collect()
}

/// Stable in-place sort of a derived list.
pub fn sort_proposals(proposals: &mut [&ProposalSummary], order: SortOrder) {
    match order {
        SortOrder::Newest => proposals.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::EndingSoon => proposals.sort_by_key(|p| match p.voting_deadline {
            Some(deadline) => (false, deadline),
            None => (true, 0),
        }),
        SortOrder::MostVoted => proposals.sort_by(|a, b| b.total_votes().cmp(&a.total_votes())),
    }
}

/// Collect and sort in one step.
pub fn sorted<'a, I>(proposals: I, order: SortOrder) -> Vec<&'a ProposalSummary>
where
    I: IntoIterator<Item = &'a ProposalSummary>,
{
    let mut list: Vec<_> = proposals.into_iter().collect();
    sort_proposals(&mut list, order);
    list
}

/// Open proposals whose deadline falls strictly inside `(now, now + window)`.
pub fn ending_within<'a, I>(proposals: I, now: u64, window_secs: u64) -> Vec<&'a ProposalSummary>
where
    I: IntoIterator<Item = &'a ProposalSummary>,
{
    proposals
        .into_iter()
        .filter(|p| is_ending_within(p, now, window_secs))
        .collect()
}

/// Open proposals closing within the next 48 hours.
pub fn ending_soon<'a, I>(proposals: I, now: u64) -> Vec<&'a ProposalSummary>
where
    I: IntoIterator<Item = &'a ProposalSummary>,
{
    ending_within(proposals, now, ENDING_SOON_WINDOW_SECS)
}

pub(crate) fn is_ending_within(proposal: &ProposalSummary, now: u64, window_secs: u64) -> bool {
    if !proposal.status.is_open() {
        return false;
    }
    match proposal.voting_deadline {
        Some(deadline) if deadline > now => deadline - now < window_secs,
        _ => false,
    }
}

/// Selected filters and sort for a proposal list view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProposalQuery {
    pub status: StatusFilter,
    pub topic: TopicFilter,
    pub search: String,
    pub sort: SortOrder,
}

impl ProposalQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_topic(mut self, topic: TopicFilter) -> Self {
        self.topic = topic;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Whether any predicate filter narrows the list. Sorting alone does not.
    pub fn is_filtered(&self) -> bool {
        !self.status.is_all() || !self.topic.is_all() || !self.search.is_empty()
    }

    /// Derive the rendered list: status -> topic -> search -> sort.
    pub fn apply<'a>(
        &self,
        proposals: &'a [ProposalSummary],
        registry: &TopicRegistry,
    ) -> Vec<&'a ProposalSummary> {
        let by_status = filter_by_status(proposals, self.status);
        let by_topic = filter_by_topic(by_status, &self.topic, registry);
        let by_search = filter_by_search(by_topic, &self.search);
        sorted(by_search, self.sort)
    }
}

/// Canonical fetched sequence behind the "all proposals" view, with
/// "load more" continuation.
#[derive(Debug, Clone)]
pub struct ProposalFeed {
    proposals: Vec<ProposalSummary>,
    has_more: bool,
    page_size: u32,
    registry: TopicRegistry,
}

impl ProposalFeed {
    /// Start a feed from its first page.
    pub fn from_page(page: ProposalPage, page_size: u32) -> Self {
        Self {
            proposals: page.proposals,
            has_more: page.has_more,
            page_size,
            registry: TopicRegistry::nns(),
        }
    }

    pub fn with_registry(mut self, registry: TopicRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn proposals(&self) -> &[ProposalSummary] {
        &self.proposals
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn registry(&self) -> &TopicRegistry {
        &self.registry
    }

    /// "Load more" is offered only for an unfiltered view.
    pub fn can_load_more(&self, query: &ProposalQuery) -> bool {
        self.has_more && !query.is_filtered()
    }

    /// Cursor for the next page: the id of the oldest proposal held.
    pub fn next_cursor(&self) -> Option<u64> {
        self.proposals.last().map(|p| p.id)
    }

    /// Append a freshly fetched page and take its continuation flag.
    pub fn append_page(&mut self, page: ProposalPage) {
        self.proposals.extend(page.proposals);
        self.has_more = page.has_more;
    }

    /// Rendered list for `query`.
    pub fn view(&self, query: &ProposalQuery) -> Vec<&ProposalSummary> {
        query.apply(&self.proposals, &self.registry)
    }

    /// Topics with counts recomputed over the held sequence.
    pub fn topic_counts(&self) -> Vec<Topic> {
        self.registry.with_open_counts(&self.proposals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&ProposalSummary]) -> Vec<u64> {
        list.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "Adopted".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(ProposalStatus::Adopted)
        );
        assert!("pending".parse::<StatusFilter>().is_err());
        assert_eq!("ending-soon".parse::<SortOrder>().unwrap(), SortOrder::EndingSoon);
        assert_eq!("all".parse::<TopicFilter>().unwrap(), TopicFilter::All);
        assert_eq!(
            "kyc".parse::<TopicFilter>().unwrap(),
            TopicFilter::topic("kyc")
        );
    }

    #[test]
    fn test_unmapped_topic_matches_nothing() {
        let proposals = vec![ProposalSummary::new(1, "a").with_topic(7)];
        let out = filter_by_topic(&proposals, &TopicFilter::topic("nope"), &TopicRegistry::nns());
        assert!(out.is_empty());
    }

    #[test]
    fn test_ending_soon_sort_puts_missing_deadlines_last() {
        let proposals = vec![
            ProposalSummary::new(1, "a"),
            ProposalSummary::new(2, "b").with_deadline(300),
            ProposalSummary::new(3, "c").with_deadline(100),
            ProposalSummary::new(4, "d"),
        ];
        let out = sorted(&proposals, SortOrder::EndingSoon);
        assert_eq!(ids(&out), vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_query_is_filtered() {
        assert!(!ProposalQuery::new().with_sort(SortOrder::MostVoted).is_filtered());
        assert!(ProposalQuery::new().with_search("x").is_filtered());
        assert!(ProposalQuery::new().with_topic(TopicFilter::topic("kyc")).is_filtered());
        assert!(ProposalQuery::new()
            .with_status(StatusFilter::Only(ProposalStatus::Open))
            .is_filtered());
    }

    #[test]
    fn test_feed_load_more() {
        let first: Vec<_> = (0..3).rev().map(|i| ProposalSummary::new(100 + i, "p")).collect();
        let mut feed = ProposalFeed::from_page(ProposalPage::from_fetch(first, 3), 3);
        assert!(feed.can_load_more(&ProposalQuery::new()));
        assert!(!feed.can_load_more(&ProposalQuery::new().with_search("p")));
        assert_eq!(feed.next_cursor(), Some(100));

        feed.append_page(ProposalPage::from_fetch(vec![ProposalSummary::new(99, "p")], 3));
        assert_eq!(feed.len(), 4);
        assert!(!feed.has_more());
        assert!(!feed.can_load_more(&ProposalQuery::new()));
        assert_eq!(feed.next_cursor(), Some(99));
    }
}
