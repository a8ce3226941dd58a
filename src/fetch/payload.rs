//! Upstream JSON payloads and their normalization into [`MatchRecord`]s.
//!
//! Every field is optional on the wire. A record is kept only if it has a
//! match id and at least one identifiable participant; everything else
//! degrades to `None`/zero and is dealt with downstream.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::{MatchRecord, Participant, RankInfo, TeamScores, TeamSide};

#[derive(Debug, Default, Deserialize)]
struct RawMatch {
    #[serde(default)]
    metadata: Option<RawMetadata>,
    #[serde(default)]
    players: Option<RawPlayers>,
    #[serde(default)]
    teams: Option<RawTeams>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    matchid: Option<String>,
    #[serde(default)]
    map: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    game_start: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPlayers {
    #[serde(default)]
    all_players: Vec<RawPlayer>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPlayer {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    character: Option<String>,
    #[serde(default)]
    currenttier_patched: Option<String>,
    #[serde(default)]
    stats: Option<RawPlayerStats>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPlayerStats {
    #[serde(default)]
    kills: u32,
    #[serde(default)]
    deaths: u32,
}

#[derive(Debug, Default, Deserialize)]
struct RawTeams {
    #[serde(default)]
    blue: Option<RawTeam>,
    #[serde(default)]
    red: Option<RawTeam>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTeam {
    #[serde(default)]
    rounds_won: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawMmr {
    #[serde(default)]
    current_data: Option<RawMmrData>,
    // v1 responses put the tier at the top level
    #[serde(default)]
    currenttierpatched: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMmrData {
    #[serde(default)]
    currenttierpatched: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn normalize_participant(raw: RawPlayer) -> Option<Participant> {
    let stats = raw.stats.unwrap_or_default();
    Some(Participant {
        name: non_empty(raw.name)?,
        tag: non_empty(raw.tag)?,
        team: raw.team.as_deref().and_then(TeamSide::parse),
        kills: stats.kills,
        deaths: stats.deaths,
        agent: non_empty(raw.character),
        rank_tier: non_empty(raw.currenttier_patched),
    })
}

fn normalize_match(raw: RawMatch) -> Option<MatchRecord> {
    let metadata = raw.metadata?;
    let id = non_empty(metadata.matchid)?;

    let participants: Vec<Participant> = raw
        .players
        .map(|p| p.all_players)
        .unwrap_or_default()
        .into_iter()
        .filter_map(normalize_participant)
        .collect();

    let scores = raw.teams.and_then(|teams| {
        let blue = teams.blue?.rounds_won?;
        let red = teams.red?.rounds_won?;
        Some(TeamScores::new(blue, red))
    });

    let record = MatchRecord {
        id,
        mode: metadata.mode.unwrap_or_default(),
        map: non_empty(metadata.map),
        participants,
        scores,
        started_at: metadata.game_start,
    };

    record.is_valid().then_some(record)
}

/// Parse a match history response body. Unparseable entries are dropped
/// one by one; only a body without a `data` array is an error.
pub fn parse_match_list(body: &Value) -> Option<Vec<MatchRecord>> {
    let data = body.get("data")?.as_array()?;
    let total = data.len();

    let records: Vec<MatchRecord> = data
        .iter()
        .filter_map(|entry| serde_json::from_value::<RawMatch>(entry.clone()).ok())
        .filter_map(normalize_match)
        .collect();

    if records.len() < total {
        debug!("Dropped {} malformed match records", total - records.len());
    }

    Some(records)
}

/// Parse a rank response body.
pub fn parse_rank(body: &Value) -> Option<RankInfo> {
    let data = body.get("data")?;
    let mmr: RawMmr = serde_json::from_value(data.clone()).ok()?;

    let tier = non_empty(mmr.current_data.and_then(|d| d.currenttierpatched))
        .or_else(|| non_empty(mmr.currenttierpatched));

    Some(match tier {
        Some(t) if !t.eq_ignore_ascii_case("unrated") && !t.eq_ignore_ascii_case("unranked") => {
            RankInfo::Ranked(t)
        }
        _ => RankInfo::Unranked,
    })
}
