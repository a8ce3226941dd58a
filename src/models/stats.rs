//! Derived statistics and response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MatchRecord, PlayerSummary, TeamScores};

/// Sentinel used for `best_map` when no game qualified.
pub const NO_MAP: &str = "N/A";

/// Per-agent breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStat {
    pub name: String,
    pub games: u32,
    pub wins: u32,
    /// Integer percent, 0..=100
    pub win_rate: u32,
    pub kills: u32,
    pub deaths: u32,
    pub kd: f64,
}

/// Per-map breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStat {
    pub name: String,
    pub games: u32,
    pub wins: u32,
    /// Integer percent, 0..=100
    pub win_rate: u32,
    pub kd: f64,
}

/// 0-100 scores per role archetype plus a derived aggression axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRadar {
    pub duelist: u32,
    pub initiator: u32,
    pub controller: u32,
    pub sentinel: u32,
    pub aggression: u32,
}

/// Summary statistics over a list of matches, from one player's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub games: u32,
    pub wins: u32,
    pub kills: u32,
    pub deaths: u32,
    pub win_rate: u32,
    pub kd: f64,
    /// Sorted by games descending, then name
    pub agents: Vec<AgentStat>,
    /// Sorted by games descending, then name
    pub maps: Vec<MapStat>,
    pub best_map: String,
    pub radar: RoleRadar,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self {
            games: 0,
            wins: 0,
            kills: 0,
            deaths: 0,
            win_rate: 0,
            kd: 0.0,
            agents: Vec::new(),
            maps: Vec::new(),
            best_map: NO_MAP.to_string(),
            radar: RoleRadar::default(),
        }
    }
}

/// Response for a single player's detail view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerDetail {
    pub ranked: AggregateStats,
    pub scrims: AggregateStats,
}

/// A match where enough roster members played together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMatchSummary {
    pub id: String,
    pub mode: String,
    pub map: Option<String>,
    pub scores: Option<TeamScores>,
    pub started_at: Option<i64>,
    /// Roster members found among the participants, roster order
    pub members: Vec<String>,
}

impl TeamMatchSummary {
    pub fn from_record(record: &MatchRecord, members: Vec<String>) -> Self {
        Self {
            id: record.id.clone(),
            mode: record.mode.clone(),
            map: record.map.clone(),
            scores: record.scores,
            started_at: record.started_at,
            members,
        }
    }
}

/// Whole-roster summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    /// When this summary was computed; `None` if no refresh has succeeded yet
    pub last_updated: Option<DateTime<Utc>>,
    pub roster: Vec<PlayerSummary>,
    pub team_matches: Vec<TeamMatchSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aggregate_is_zeroed() {
        let stats = AggregateStats::default();

        assert_eq!(stats.games, 0);
        assert_eq!(stats.kd, 0.0);
        assert_eq!(stats.best_map, NO_MAP);
        assert!(stats.agents.is_empty());
        assert_eq!(stats.radar, RoleRadar::default());
    }

    #[test]
    fn test_player_detail_serialization() {
        let detail = PlayerDetail::default();
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["ranked"]["best_map"], "N/A");
        assert_eq!(json["scrims"]["games"], 0);
    }
}
