//! Topic registry.
//!
//! A closed, hand-maintained table mapping the dashboard's topic slugs to the
//! numeric topic codes of the governance interface. Declaration order is the
//! default display order.

use std::collections::HashMap;

use crate::types::{ProposalSummary, Topic};

/// One row of the topic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicDefinition {
    pub id: &'static str,
    pub code: i32,
    pub name: &'static str,
    pub description: &'static str,
}

/// Topics known to the network governance system.
pub const NNS_TOPICS: &[TopicDefinition] = &[
    TopicDefinition {
        id: "governance",
        code: 4,
        name: "Governance",
        description: "Proposals related to NNS governance and voting mechanisms",
    },
    TopicDefinition {
        id: "sns-neurons-fund",
        code: 14,
        name: "SNS & Neurons' Fund",
        description: "Service Nervous System and Neurons' Fund related proposals",
    },
    TopicDefinition {
        id: "api-boundary-node",
        code: 15,
        name: "API Boundary Node Management",
        description: "Managing API boundary nodes and their configuration",
    },
    TopicDefinition {
        id: "application-canister",
        code: 8,
        name: "Application Canister Management",
        description: "Managing application canisters and their lifecycle",
    },
    TopicDefinition {
        id: "exchange-rate",
        code: 2,
        name: "Exchange Rate",
        description: "ICP exchange rate oracle proposals",
    },
    TopicDefinition {
        id: "ic-os-deployment",
        code: 12,
        name: "IC OS Version Deployment",
        description: "Deploying new versions of the Internet Computer operating system",
    },
    TopicDefinition {
        id: "ic-os-election",
        code: 13,
        name: "IC OS Version Election",
        description: "Electing new IC OS versions for deployment",
    },
    TopicDefinition {
        id: "kyc",
        code: 9,
        name: "KYC",
        description: "Know Your Customer verification proposals",
    },
    TopicDefinition {
        id: "network-economics",
        code: 3,
        name: "Network Economics",
        description: "Economic parameters and tokenomics proposals",
    },
    TopicDefinition {
        id: "neuron-management",
        code: 1,
        name: "Neuron Management",
        description: "Managing neurons and their configurations",
    },
    TopicDefinition {
        id: "node-admin",
        code: 5,
        name: "Node Admin",
        description: "Node administration and management proposals",
    },
    TopicDefinition {
        id: "node-provider-rewards",
        code: 10,
        name: "Node Provider Rewards",
        description: "Proposals for node provider reward distribution",
    },
    TopicDefinition {
        id: "participant-management",
        code: 6,
        name: "Participant Management",
        description: "Managing network participants and their roles",
    },
    TopicDefinition {
        id: "protocol-canister",
        code: 17,
        name: "Protocol Canister Management",
        description: "Managing protocol-level canisters",
    },
    TopicDefinition {
        id: "service-nervous-system",
        code: 18,
        name: "Service Nervous System Management",
        description: "Managing Service Nervous Systems",
    },
    TopicDefinition {
        id: "subnet-management",
        code: 7,
        name: "Subnet Management",
        description: "Creating, updating, and managing subnets",
    },
    TopicDefinition {
        id: "subnet-rental",
        code: 16,
        name: "Subnet Rental",
        description: "Proposals for subnet rental arrangements",
    },
];

/// Review guidance for one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicGuide {
    pub topic_id: &'static str,
    pub common_proposals: &'static [&'static str],
    pub what_to_look_for: &'static [&'static str],
    pub red_flags: &'static [&'static str],
    pub examples: GuideExamples,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuideExamples {
    pub good: &'static str,
    pub bad: &'static str,
}

/// Guides for the topics that have one. Others fall back to the general
/// review steps.
pub const TOPIC_GUIDES: &[TopicGuide] = &[
    TopicGuide {
        topic_id: "governance",
        common_proposals: &[
            "Changes to voting reward parameters",
            "Modifications to proposal submission requirements",
            "Updates to neuron management rules",
            "Changes to following mechanisms",
        ],
        what_to_look_for: &[
            "Impact on voting power distribution",
            "Effects on small vs large neuron holders",
            "Alignment with decentralization goals",
            "Clarity of the proposed changes",
        ],
        red_flags: &[
            "Proposals that concentrate power",
            "Rushed voting timelines",
            "Lack of community discussion",
            "Unclear economic implications",
        ],
        examples: GuideExamples {
            good: "Well-documented proposal with clear rationale, community discussion, and impact analysis",
            bad: "Vague proposal with unclear benefits and no community input",
        },
    },
    TopicGuide {
        topic_id: "network-economics",
        common_proposals: &[
            "ICP/XDR exchange rate updates",
            "Changes to neuron rewards",
            "Transaction fee adjustments",
            "Token burning mechanisms",
        ],
        what_to_look_for: &[
            "Economic model soundness",
            "Impact on token holders",
            "Long-term sustainability",
            "Fair distribution of benefits",
        ],
        red_flags: &[
            "Extreme parameter changes",
            "Lack of economic analysis",
            "Proposals benefiting specific groups",
            "Insufficient testing or modeling",
        ],
        examples: GuideExamples {
            good: "Proposal with detailed economic modeling and gradual parameter adjustments",
            bad: "Sudden large changes without analysis or justification",
        },
    },
    TopicGuide {
        topic_id: "subnet-management",
        common_proposals: &[
            "Creating new subnets",
            "Adding nodes to subnets",
            "Removing faulty nodes",
            "Subnet configuration changes",
        ],
        what_to_look_for: &[
            "Technical justification for changes",
            "Impact on network topology",
            "Node provider reputation",
            "Geographic distribution",
        ],
        red_flags: &[
            "Insufficient node verification",
            "Centralization risks",
            "Unclear technical specifications",
            "Rushed deployments",
        ],
        examples: GuideExamples {
            good: "Detailed technical specifications with verified node providers",
            bad: "Vague subnet changes without proper node verification",
        },
    },
];

/// General review steps as (heading, detail) pairs, in order.
pub const REVIEW_STEPS: &[(&str, &str)] = &[
    (
        "Read the Proposal Thoroughly",
        "Take time to understand what is being proposed. Read the summary, check linked forum \
         discussions, and review any technical specifications.",
    ),
    (
        "Understand the Context",
        "Consider why this proposal is needed. What problem does it solve? How does it align \
         with the Internet Computer's goals?",
    ),
    (
        "Check for Red Flags",
        "Look for incomplete information, rushed timelines, lack of community discussion, or \
         proposals that seem to benefit specific parties unfairly.",
    ),
    (
        "Verify Technical Details",
        "For technical proposals, verify that code hashes match, check that deployments are to \
         the correct subnets, and ensure security considerations are addressed.",
    ),
    (
        "Engage with the Community",
        "Participate in forum discussions, ask questions, and share your analysis. Community \
         collaboration leads to better decisions.",
    ),
];

pub const VOTING_PRACTICES: &[&str] = &[
    "Only vote if you've thoroughly reviewed the proposal",
    "Set up following for topics you're knowledgeable about",
    "Don't blindly follow other voters; do your own research",
    "When in doubt, vote \"No\" or abstain until you understand better",
    "Participate in forum discussions before voting",
    "Consider long-term implications, not just short-term benefits",
];

/// Lookup table over a fixed set of topic definitions.
#[derive(Debug, Clone, Copy)]
pub struct TopicRegistry {
    topics: &'static [TopicDefinition],
}

impl TopicRegistry {
    /// Registry over the network governance topics.
    pub fn nns() -> Self {
        Self { topics: NNS_TOPICS }
    }

    /// Registry over a custom table.
    pub fn with_table(topics: &'static [TopicDefinition]) -> Self {
        Self { topics }
    }

    /// Numeric code for a topic slug. Unknown slugs are a plain `None`.
    pub fn lookup_code(&self, topic_id: &str) -> Option<i32> {
        self.definition(topic_id).map(|t| t.code)
    }

    /// Topic slug for a numeric code.
    pub fn lookup_id(&self, code: i32) -> Option<&'static str> {
        self.topics.iter().find(|t| t.code == code).map(|t| t.id)
    }

    /// Display name for a numeric code.
    pub fn topic_name(&self, code: i32) -> &'static str {
        self.topics
            .iter()
            .find(|t| t.code == code)
            .map(|t| t.name)
            .unwrap_or("Unknown Topic")
    }

    pub fn definition(&self, topic_id: &str) -> Option<&'static TopicDefinition> {
        self.topics.iter().find(|t| t.id == topic_id)
    }

    /// Review guide for a topic in this registry, if one has been written.
    pub fn guide(&self, topic_id: &str) -> Option<&'static TopicGuide> {
        if !self.contains(topic_id) {
            return None;
        }
        TOPIC_GUIDES.iter().find(|g| g.topic_id == topic_id)
    }

    pub fn contains(&self, topic_id: &str) -> bool {
        self.definition(topic_id).is_some()
    }

    pub fn get(&self, topic_id: &str) -> Option<Topic> {
        self.definition(topic_id).map(|d| to_topic(d, 0))
    }

    /// All topics in declaration order, with zero counts.
    pub fn all_topics(&self) -> Vec<Topic> {
        self.topics.iter().map(|d| to_topic(d, 0)).collect()
    }

    /// All topics in declaration order with `open_proposals_count` recomputed
    /// from `proposals`. Proposals with unmapped codes are not counted.
    pub fn with_open_counts(&self, proposals: &[ProposalSummary]) -> Vec<Topic> {
        let mut counts: HashMap<i32, u32> = HashMap::new();
        for proposal in proposals {
            *counts.entry(proposal.topic_code).or_default() += 1;
        }

        self.topics
            .iter()
            .map(|d| to_topic(d, counts.get(&d.code).copied().unwrap_or(0)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::nns()
    }
}

fn to_topic(def: &TopicDefinition, count: u32) -> Topic {
    Topic {
        id: def.id.to_string(),
        name: def.name.to_string(),
        description: def.description.to_string(),
        open_proposals_count: count,
    }
}

/// Case-insensitive search over topic name and description.
pub fn search_topics<'a>(topics: &'a [Topic], query: &str) -> Vec<&'a Topic> {
    if query.is_empty() {
        return topics.iter().collect();
    }
    let query = query.to_lowercase();
    topics
        .iter()
        .filter(|t| {
            t.name.to_lowercase().contains(&query) || t.description.to_lowercase().contains(&query)
        })
        .collect()
}

/// Sum of open-proposal counts.
pub fn total_open(topics: &[Topic]) -> u32 {
    topics.iter().map(|t| t.open_proposals_count).sum()
}
