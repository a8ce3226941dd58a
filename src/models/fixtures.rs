//! Builders shared by unit tests.

use super::{MatchRecord, Participant, Player, PlayerRole, TeamScores, TeamSide};

/// Five-player roster: Alpha#A1, Bravo#B2, Charlie#C3, Delta#D4, Echo#E5.
pub fn roster() -> Vec<Player> {
    vec![
        Player::new("Alpha", "A1", PlayerRole::Duelist),
        Player::new("Bravo", "B2", PlayerRole::Initiator),
        Player::new("Charlie", "C3", PlayerRole::Controller),
        Player::new("Delta", "D4", PlayerRole::Sentinel),
        Player::new("Echo", "E5", PlayerRole::Flex),
    ]
}

pub fn participant(
    name: &str,
    tag: &str,
    team: TeamSide,
    agent: &str,
    kills: u32,
    deaths: u32,
) -> Participant {
    Participant {
        name: name.to_string(),
        tag: tag.to_string(),
        team: Some(team),
        kills,
        deaths,
        agent: Some(agent.to_string()),
        rank_tier: None,
    }
}

pub fn record(
    id: &str,
    mode: &str,
    map: Option<&str>,
    participants: Vec<Participant>,
    scores: Option<(u32, u32)>,
) -> MatchRecord {
    MatchRecord {
        id: id.to_string(),
        mode: mode.to_string(),
        map: map.map(str::to_string),
        participants,
        scores: scores.map(|(blue, red)| TeamScores::new(blue, red)),
        started_at: None,
    }
}
