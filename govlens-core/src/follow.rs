//! Follow toggle state machine.
//!
//! A follow button flips immediately, but the flip is held as `Pending` until
//! the remote call settles. `confirm` commits it, `roll_back` restores the
//! state the user saw before the click.

use std::collections::{BTreeSet, HashMap};

use crate::error::FollowError;

/// Follow state of a single topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowState {
    #[default]
    NotFollowing,
    Following,
    Pending { target: bool, previous: bool },
}

impl FollowState {
    fn from_bool(following: bool) -> Self {
        if following {
            FollowState::Following
        } else {
            FollowState::NotFollowing
        }
    }

    /// Value shown to the user: the target while a change is pending.
    pub fn displayed(&self) -> bool {
        match self {
            FollowState::NotFollowing => false,
            FollowState::Following => true,
            FollowState::Pending { target, .. } => *target,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FollowState::Pending { .. })
    }
}

/// Follow state for every topic the user has touched this session.
#[derive(Debug, Clone, Default)]
pub struct FollowTracker {
    states: HashMap<String, FollowState>,
}

impl FollowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed confirmed state from the backend's followed-topic set.
    /// Pending changes are left alone.
    pub fn load(&mut self, followed: &BTreeSet<String>) {
        self.states.retain(|_, state| state.is_pending());
        for topic in followed {
            self.states
                .entry(topic.clone())
                .or_insert(FollowState::Following);
        }
    }

    pub fn state(&self, topic: &str) -> FollowState {
        self.states.get(topic).copied().unwrap_or_default()
    }

    pub fn is_following(&self, topic: &str) -> bool {
        self.state(topic).displayed()
    }

    pub fn is_pending(&self, topic: &str) -> bool {
        self.state(topic).is_pending()
    }

    /// Start a change towards `target`. Fails if one is already in flight.
    pub fn begin(&mut self, topic: &str, target: bool) -> Result<(), FollowError> {
        let current = self.state(topic);
        if current.is_pending() {
            return Err(FollowError::AlreadyPending(topic.to_string()));
        }
        self.states.insert(
            topic.to_string(),
            FollowState::Pending {
                target,
                previous: current.displayed(),
            },
        );
        Ok(())
    }

    /// The remote call succeeded.
    pub fn confirm(&mut self, topic: &str) -> Result<bool, FollowError> {
        match self.state(topic) {
            FollowState::Pending { target, .. } => {
                self.states
                    .insert(topic.to_string(), FollowState::from_bool(target));
                Ok(target)
            }
            _ => Err(FollowError::NotPending(topic.to_string())),
        }
    }

    /// The remote call failed.
    pub fn roll_back(&mut self, topic: &str) -> Result<bool, FollowError> {
        match self.state(topic) {
            FollowState::Pending { previous, .. } => {
                self.states
                    .insert(topic.to_string(), FollowState::from_bool(previous));
                Ok(previous)
            }
            _ => Err(FollowError::NotPending(topic.to_string())),
        }
    }

    /// Topics currently shown as followed, sorted.
    pub fn followed(&self) -> BTreeSet<String> {
        self.states
            .iter()
            .filter(|(_, state)| state.displayed())
            .map(|(topic, _)| topic.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_commits_target() {
        let mut tracker = FollowTracker::new();
        tracker.begin("kyc", true).unwrap();
        assert!(tracker.is_following("kyc"));
        assert!(tracker.is_pending("kyc"));

        assert_eq!(tracker.confirm("kyc"), Ok(true));
        assert_eq!(tracker.state("kyc"), FollowState::Following);
    }

    #[test]
    fn test_roll_back_restores_previous() {
        let mut tracker = FollowTracker::new();
        tracker.load(&BTreeSet::from(["governance".to_string()]));

        tracker.begin("governance", false).unwrap();
        assert!(!tracker.is_following("governance"));

        assert_eq!(tracker.roll_back("governance"), Ok(true));
        assert_eq!(tracker.state("governance"), FollowState::Following);
    }

    #[test]
    fn test_double_begin_is_rejected() {
        let mut tracker = FollowTracker::new();
        tracker.begin("kyc", true).unwrap();
        assert_eq!(
            tracker.begin("kyc", false),
            Err(FollowError::AlreadyPending("kyc".into()))
        );
        assert_eq!(
            tracker.confirm("governance"),
            Err(FollowError::NotPending("governance".into()))
        );
    }

    #[test]
    fn test_load_keeps_pending() {
        let mut tracker = FollowTracker::new();
        tracker.begin("kyc", true).unwrap();
        tracker.load(&BTreeSet::from(["subnet-rental".to_string()]));
        assert!(tracker.is_pending("kyc"));
        assert_eq!(
            tracker.followed(),
            BTreeSet::from(["kyc".to_string(), "subnet-rental".to_string()])
        );
    }
}
