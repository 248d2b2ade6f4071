//! Plain-text rendering for terminal output

use govlens_core::{
    layers_for_path, ArchitectureLayer, FileTree, Highlight, PathPattern, ProposalSummary, Topic,
    TopicDefinition, TopicGroup, TopicGuide, TopicRegistry, TreeRow, UserProfile, REVIEW_STEPS,
    VOTING_PRACTICES,
};

pub fn topics(topics: &[&Topic]) -> String {
    let mut out = String::new();
    for topic in topics {
        out.push_str(&format!(
            "{:<26} {:>4} open  {}\n",
            topic.id, topic.open_proposals_count, topic.name
        ));
    }
    let total: u32 = topics.iter().map(|t| t.open_proposals_count).sum();
    out.push_str(&format!("{} topics, {} open proposals\n", topics.len(), total));
    out
}

/// One line per proposal.
pub fn proposal_line(p: &ProposalSummary, registry: &TopicRegistry, now: u64) -> String {
    format!(
        "#{:<8} {:<9} {:>3}% yes  {:<28} {}  [{}]",
        p.id,
        p.status.label(),
        p.yes_percentage(),
        p.time_remaining(now).to_string(),
        p.display_title(),
        registry.topic_name(p.topic_code),
    )
}

pub fn proposals(list: &[&ProposalSummary], registry: &TopicRegistry, now: u64) -> String {
    if list.is_empty() {
        return "No proposals found\n".to_string();
    }
    let mut out = String::new();
    for p in list {
        out.push_str(&proposal_line(p, registry, now));
        out.push('\n');
    }
    out
}

pub fn proposal_detail(p: &ProposalSummary, registry: &TopicRegistry, now: u64) -> String {
    let mut out = String::new();
    out.push_str(&format!("Proposal #{}: {}\n", p.id, p.display_title()));
    out.push_str(&format!("Topic:    {}\n", registry.topic_name(p.topic_code)));
    out.push_str(&format!("Status:   {}\n", p.status));
    if let Some(proposer) = p.proposer_id {
        out.push_str(&format!("Proposer: {}\n", proposer));
    }
    out.push_str(&format!("Voting:   {}\n", p.time_remaining(now)));
    if let Some(tally) = p.tally {
        out.push_str(&format!(
            "Tally:    {} yes / {} no ({}% yes)\n",
            tally.yes,
            tally.no,
            p.yes_percentage()
        ));
    }
    out.push_str(&format!("Link:     {}\n", p.link()));
    if !p.summary.is_empty() {
        out.push_str(&format!("\n{}\n", p.summary));
    }
    out
}

pub fn following(groups: &[TopicGroup<'_>], registry: &TopicRegistry, now: u64) -> String {
    if groups.is_empty() {
        return "No proposals for followed topics\n".to_string();
    }
    let mut out = String::new();
    for group in groups {
        let name = registry
            .definition(group.topic_id)
            .map(|d| d.name)
            .unwrap_or(group.topic_id);
        out.push_str(&format!("{} ({})\n", name, group.proposals.len()));
        for p in &group.proposals {
            out.push_str(&format!("  {}\n", proposal_line(p, registry, now)));
        }
    }
    out
}

pub fn profile(profile: &UserProfile) -> String {
    let mut out = String::new();
    out.push_str(&format!("Principal: {}\n", profile.principal_id));
    out.push_str(&format!(
        "Username:  {}\n",
        profile.username.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "Logo:      {}\n",
        profile.logo_url.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "Neuron:    {}\n",
        profile
            .neuron_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    out
}

/// One line per profile: principal, username, neuron.
pub fn users(profiles: &[UserProfile], page: u32) -> String {
    if profiles.is_empty() {
        return format!("No users on page {}\n", page);
    }
    let mut out = String::new();
    for profile in profiles {
        out.push_str(&format!(
            "{:<64} {:<20} {}\n",
            profile.principal_id,
            profile.username.as_deref().unwrap_or("-"),
            profile
                .neuron_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
    }
    out
}

/// General review steps, voting practices and the topic index.
pub fn learn_overview(registry: &TopicRegistry) -> String {
    let mut out = String::new();
    out.push_str("How to Review Proposals\n");
    out.push_str("=======================\n\n");
    for (i, (heading, detail)) in REVIEW_STEPS.iter().enumerate() {
        out.push_str(&format!("{}. {}\n   {}\n", i + 1, heading, detail));
    }

    out.push_str("\nVoting Best Practices\n");
    out.push_str("=====================\n\n");
    for practice in VOTING_PRACTICES {
        out.push_str(&format!("  - {}\n", practice));
    }

    out.push_str("\nLearn by Topic (govlens learn <topic>)\n\n");
    for topic in registry.all_topics() {
        let marker = if registry.guide(&topic.id).is_some() { '*' } else { ' ' };
        out.push_str(&format!("{} {:<26} {}\n", marker, topic.id, topic.name));
    }
    out
}

/// One topic's page; topics without a guide point back to the overview.
pub fn topic_guide(topic: &TopicDefinition, guide: Option<&TopicGuide>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n{}\n", topic.name, topic.description));

    let Some(guide) = guide else {
        out.push_str("\nNo detailed guide for this topic yet; see `govlens learn` for the general review steps.\n");
        return out;
    };

    let sections = [
        ("Common Proposal Types", "-", guide.common_proposals),
        ("What to Look For", "+", guide.what_to_look_for),
        ("Red Flags", "!", guide.red_flags),
    ];
    for (heading, bullet, items) in sections {
        out.push_str(&format!("\n{}\n", heading));
        for item in items {
            out.push_str(&format!("  {} {}\n", bullet, item));
        }
    }

    out.push_str(&format!("\nGood example: {}\n", guide.examples.good));
    out.push_str(&format!("Bad example:  {}\n", guide.examples.bad));
    out.push_str(&format!(
        "\nReview open proposals with `govlens proposals --topic {}`\n",
        topic.id
    ));
    out
}

pub fn layers(layers: &[ArchitectureLayer]) -> String {
    let mut out = String::new();
    for layer in layers {
        out.push_str(&format!(
            "{:<13} {:<20} {}\n",
            layer.id, layer.name, layer.description
        ));
        for path in layer.paths {
            out.push_str(&format!("              {}\n", path));
        }
    }
    out
}

pub fn path_layers(path: &str) -> String {
    let found = layers_for_path(path);
    if found.is_empty() {
        return format!("{}: no layer\n", path);
    }
    let names: Vec<_> = found.iter().map(|l| l.name).collect();
    format!("{}: {}\n", path, names.join(", "))
}

/// Indented tree; `*` marks direct matches, `+` directories holding one.
pub fn tree(tree: &FileTree, rows: &[TreeRow], patterns: &[PathPattern]) -> String {
    let mut out = String::new();
    for row in rows {
        let Some(node) = tree.node(row.id) else {
            continue;
        };
        let marker = match tree.highlight(row.id, patterns) {
            Highlight::Direct => '*',
            Highlight::Ancestor => '+',
            Highlight::None => ' ',
        };
        let suffix = if node.is_dir() { "/" } else { "" };
        out.push_str(&format!(
            "{} {}{}{}\n",
            marker,
            "  ".repeat(row.depth),
            node.name,
            suffix
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use govlens_core::{ProposalStatus, LAYERS};

    #[test]
    fn test_proposal_line() {
        let registry = TopicRegistry::nns();
        let p = ProposalSummary::new(139205, "Change Subnet Membership")
            .with_topic(7)
            .with_deadline(1_000 + 5 * 3600)
            .with_tally(58, 0);
        let line = proposal_line(&p, &registry, 1_000);
        assert!(line.starts_with("#139205"));
        assert!(line.contains("100% yes"));
        assert!(line.contains("5 hours remaining"));
        assert!(line.contains("[Subnet Management]"));
    }

    #[test]
    fn test_detail_falls_back_to_dashboard_link() {
        let registry = TopicRegistry::nns();
        let p = ProposalSummary::new(7, "")
            .with_status(ProposalStatus::Executed)
            .with_summary("Body");
        let text = proposal_detail(&p, &registry, 0);
        assert!(text.contains("Untitled Proposal"));
        assert!(text.contains("Status:   Executed"));
        assert!(text.contains("Voting:   No deadline"));
        assert!(text.contains("https://dashboard.internetcomputer.org/proposal/7"));
        assert!(text.ends_with("Body\n"));
    }

    #[test]
    fn test_tree_markers() {
        let mut t = FileTree::from_paths(["rs/consensus/src/lib.rs", "rs/p2p/lib.rs"]);
        t.expand_all();
        let patterns = LAYERS[0].patterns().unwrap();
        let text = tree(&t, &t.visible_rows(), &patterns);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "  rs/");
        assert_eq!(lines[1], "+   consensus/");
        assert_eq!(lines[2], "*     src/");
    }

    #[test]
    fn test_empty_lists() {
        let registry = TopicRegistry::nns();
        assert_eq!(proposals(&[], &registry, 0), "No proposals found\n");
        assert_eq!(path_layers("README.md"), "README.md: no layer\n");
        assert_eq!(users(&[], 3), "No users on page 3\n");
    }

    #[test]
    fn test_profile_placeholders() {
        let text = profile(&UserProfile {
            principal_id: "aaaaa-aa".into(),
            username: Some("alice".into()),
            logo_url: None,
            neuron_id: None,
            created_at: 0,
            updated_at: 0,
        });
        assert_eq!(
            text,
            "Principal: aaaaa-aa\nUsername:  alice\nLogo:      -\nNeuron:    -\n"
        );
    }

    #[test]
    fn test_topic_guide_sections() {
        let registry = TopicRegistry::nns();
        let topic = registry.definition("network-economics").unwrap();
        let text = topic_guide(topic, registry.guide(topic.id));
        assert!(text.starts_with("Network Economics\n"));
        assert!(text.contains("Red Flags\n  ! Extreme parameter changes\n"));
        assert!(text.contains("Bad example:  Sudden large changes"));
        assert!(text.ends_with("--topic network-economics`\n"));

        let kyc = registry.definition("kyc").unwrap();
        assert!(topic_guide(kyc, registry.guide("kyc")).contains("No detailed guide"));
    }

    #[test]
    fn test_learn_overview_marks_guided_topics() {
        let text = learn_overview(&TopicRegistry::nns());
        assert!(text.starts_with("How to Review Proposals\n"));
        assert!(text.contains("5. Engage with the Community\n"));
        assert!(text.contains("* subnet-management"));
        assert!(text.contains("  kyc"));
    }
}
