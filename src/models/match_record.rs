//! Normalized match history records.

use serde::{Deserialize, Serialize};

/// Side a participant played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Blue,
    Red,
}

impl TeamSide {
    /// Parse the provider's team label ("Blue"/"Red", any case).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "blue" => Some(TeamSide::Blue),
            "red" => Some(TeamSide::Red),
            _ => None,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Blue => TeamSide::Red,
            TeamSide::Red => TeamSide::Blue,
        }
    }
}

/// Rounds won by each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScores {
    pub blue: u32,
    pub red: u32,
}

impl TeamScores {
    pub fn new(blue: u32, red: u32) -> Self {
        Self { blue, red }
    }

    /// Rounds played; saturates on nonsense upstream counts.
    pub fn total(&self) -> u32 {
        self.blue.saturating_add(self.red)
    }

    pub fn for_side(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Blue => self.blue,
            TeamSide::Red => self.red,
        }
    }

    /// True only on a strict round lead; a draw is not a win.
    pub fn is_win_for(&self, side: TeamSide) -> bool {
        self.for_side(side) > self.for_side(side.opponent())
    }
}

/// One player's line in a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub tag: String,
    pub team: Option<TeamSide>,
    pub kills: u32,
    pub deaths: u32,
    /// Agent played
    pub agent: Option<String>,
    /// Competitive tier at the time of the match, e.g. "Gold 2"
    #[serde(default)]
    pub rank_tier: Option<String>,
}

impl Participant {
    pub fn is(&self, name: &str, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) && self.tag.eq_ignore_ascii_case(tag)
    }
}

/// One played game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unique across all sources
    pub id: String,
    /// Raw mode label, e.g. "Competitive", "Custom Game"
    pub mode: String,
    pub map: Option<String>,
    pub participants: Vec<Participant>,
    pub scores: Option<TeamScores>,
    /// Start time as epoch seconds, when known
    #[serde(default)]
    pub started_at: Option<i64>,
}

impl MatchRecord {
    /// Records without an id or any participants cannot be classified.
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && !self.participants.is_empty()
    }

    pub fn participant(&self, name: &str, tag: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is(name, tag))
    }

    pub fn normalized_mode(&self) -> String {
        self.mode.trim().to_lowercase()
    }
}

/// Disjoint categories produced by the classifier.
///
/// `ranked` and `scrim` never share a record; `team_match` is orthogonal to
/// both and may repeat records found there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedMatchSet {
    pub ranked: Vec<MatchRecord>,
    pub scrim: Vec<MatchRecord>,
    pub team_match: Vec<MatchRecord>,
}
