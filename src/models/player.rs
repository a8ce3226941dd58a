//! Roster members and their per-refresh summaries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared in-game role of a roster member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlayerRole {
    Duelist,
    Initiator,
    Controller,
    Sentinel,
    Flex,
    Other(String),
}

impl From<String> for PlayerRole {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "duelist" => PlayerRole::Duelist,
            "initiator" => PlayerRole::Initiator,
            // "Smoker" is what most teams call it
            "controller" | "smoker" => PlayerRole::Controller,
            "sentinel" => PlayerRole::Sentinel,
            "flex" => PlayerRole::Flex,
            _ => PlayerRole::Other(s),
        }
    }
}

impl From<PlayerRole> for String {
    fn from(role: PlayerRole) -> Self {
        role.to_string()
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerRole::Duelist => write!(f, "Duelist"),
            PlayerRole::Initiator => write!(f, "Initiator"),
            PlayerRole::Controller => write!(f, "Controller"),
            PlayerRole::Sentinel => write!(f, "Sentinel"),
            PlayerRole::Flex => write!(f, "Flex"),
            PlayerRole::Other(s) => write!(f, "{}", s),
        }
    }
}

impl PlayerRole {
    /// Agent shown for a player with no recent games: Jett for duelists,
    /// Omen for everyone else.
    pub fn default_agent(&self) -> &'static str {
        match self {
            PlayerRole::Duelist => "Jett",
            _ => "Omen",
        }
    }
}

/// A tracked roster member. Static configuration, never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub tag: String,
    pub role: PlayerRole,

    /// Fixed agent assignment, overrides the most-played agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl Player {
    pub fn new(name: impl Into<String>, tag: impl Into<String>, role: PlayerRole) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            role,
            agent: None,
        }
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// Cache key for the per-player scope: `name#tag`.
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.name, self.tag)
    }

    /// Case-insensitive identity check against a name and tag.
    pub fn is(&self, name: &str, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) && self.tag.eq_ignore_ascii_case(tag)
    }
}

/// Rank as reported by the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "tier", rename_all = "lowercase")]
pub enum RankInfo {
    Ranked(String),
    Unranked,
}

impl RankInfo {
    pub fn tier(&self) -> Option<&str> {
        match self {
            RankInfo::Ranked(tier) => Some(tier),
            RankInfo::Unranked => None,
        }
    }
}

/// Roster entry as served in the team summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    #[serde(flatten)]
    pub player: Player,
    pub rank: String,
    pub main_agent: String,
}
