//! Match classification.
//!
//! Splits raw match history into ranked games, scrims and team matches:
//! - ranked: mode is one of the configured ranked modes (case-insensitive)
//! - scrim: mode contains "custom" and at least `scrim_min_rounds` rounds
//!   were played in total, so aborted lobbies are ignored
//! - team match: at least `team_min_members` distinct roster members took
//!   part, whatever the mode
//!
//! Ranked and scrim are mutually exclusive; team match is independent of
//! both. Every category is deduplicated by match id across the whole input,
//! so the same game fetched through several roster members counts once.

use std::collections::HashSet;

use crate::config::ClassifierConfig;
use crate::models::{ClassifiedMatchSet, MatchRecord, Player};

/// Normalized classification rules.
#[derive(Debug, Clone)]
pub struct ClassifierPolicy {
    ranked_modes: HashSet<String>,
    scrim_min_rounds: u32,
    team_min_members: usize,
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self::from(&ClassifierConfig::default())
    }
}

impl From<&ClassifierConfig> for ClassifierPolicy {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            ranked_modes: config
                .ranked_modes
                .iter()
                .map(|m| m.trim().to_lowercase())
                .collect(),
            scrim_min_rounds: config.scrim_min_rounds,
            team_min_members: config.team_min_members,
        }
    }
}

impl ClassifierPolicy {
    pub fn is_ranked(&self, record: &MatchRecord) -> bool {
        self.ranked_modes.contains(&record.normalized_mode())
    }

    /// Custom lobbies without team scores are treated as aborted.
    pub fn is_scrim(&self, record: &MatchRecord) -> bool {
        record.normalized_mode().contains("custom")
            && record
                .scores
                .is_some_and(|s| s.total() >= self.scrim_min_rounds)
    }

    pub fn is_team_match(&self, record: &MatchRecord, roster: &[Player]) -> bool {
        roster_members(record, roster).len() >= self.team_min_members
    }
}

/// Names of the distinct roster members present in a match, in roster order.
/// Matching is on name only, ignoring case.
pub fn roster_members(record: &MatchRecord, roster: &[Player]) -> Vec<String> {
    let present: HashSet<String> = record
        .participants
        .iter()
        .map(|p| p.name.to_lowercase())
        .collect();

    let mut seen = HashSet::new();
    roster
        .iter()
        .filter(|member| {
            let key = member.name.to_lowercase();
            present.contains(&key) && seen.insert(key)
        })
        .map(|member| member.name.clone())
        .collect()
}

/// Partition `raw` into the three categories. Invalid records are dropped
/// before any rule is applied. Pure: same input, same output.
pub fn classify(
    raw: &[MatchRecord],
    roster: &[Player],
    policy: &ClassifierPolicy,
) -> ClassifiedMatchSet {
    let mut set = ClassifiedMatchSet::default();
    let mut seen_mode: HashSet<&str> = HashSet::new();
    let mut seen_team: HashSet<&str> = HashSet::new();

    for record in raw.iter().filter(|r| r.is_valid()) {
        let id = record.id.as_str();

        if seen_mode.insert(id) {
            if policy.is_ranked(record) {
                set.ranked.push(record.clone());
            } else if policy.is_scrim(record) {
                set.scrim.push(record.clone());
            }
        }

        if !seen_team.contains(id) && policy.is_team_match(record, roster) {
            seen_team.insert(id);
            set.team_match.push(record.clone());
        }
    }

    set
}
