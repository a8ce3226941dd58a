//! Statistics calculation engine.
//!
//! Reduces a list of matches to summary statistics from one player's
//! perspective:
//! - overall games, wins, kills, deaths, win rate and K/D
//! - per-agent and per-map breakdowns
//! - best map
//! - role radar (win rate per role archetype plus an aggression axis)
//!
//! Everything is recomputed from scratch on each call and nothing here can
//! fail; an empty or unusable input yields zeroed stats.

mod roles;

pub use roles::{role_for_agent, RoleArchetype};

use std::collections::BTreeMap;

use crate::models::{
    AgentStat, AggregateStats, MapStat, MatchRecord, Player, RoleRadar, NO_MAP,
};

/// Calculate win rate as an integer percent, truncating.
pub fn calculate_win_rate(wins: u32, games: u32) -> u32 {
    if games == 0 {
        0
    } else {
        (u64::from(wins) * 100 / u64::from(games)) as u32
    }
}

/// Calculate K/D, rounded to two decimals. With no deaths the kill count
/// itself is the ratio.
pub fn calculate_kd(kills: u32, deaths: u32) -> f64 {
    if deaths == 0 {
        f64::from(kills)
    } else {
        (f64::from(kills) / f64::from(deaths) * 100.0).round() / 100.0
    }
}

/// Aggression axis for one role: 0 at K/D 0.5, 100 at roughly 2.0.
pub fn calculate_aggression(kd: f64) -> f64 {
    ((kd - 0.5) * 66.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    games: u32,
    wins: u32,
    kills: u32,
    deaths: u32,
}

impl Tally {
    fn record(&mut self, won: bool, kills: u32, deaths: u32) {
        self.games = self.games.saturating_add(1);
        if won {
            self.wins = self.wins.saturating_add(1);
        }
        self.kills = self.kills.saturating_add(kills);
        self.deaths = self.deaths.saturating_add(deaths);
    }

    fn win_rate(&self) -> u32 {
        calculate_win_rate(self.wins, self.games)
    }

    fn kd(&self) -> f64 {
        calculate_kd(self.kills, self.deaths)
    }
}

/// Descending by games; BTreeMap iteration already gives name order for ties.
fn by_games<T>(mut items: Vec<T>, games: impl Fn(&T) -> u32) -> Vec<T> {
    items.sort_by_key(|item| std::cmp::Reverse(games(item)));
    items
}

fn radar(roles: &BTreeMap<RoleArchetype, Tally>) -> RoleRadar {
    let score = |role: RoleArchetype| roles.get(&role).map(Tally::win_rate).unwrap_or(0);

    let played: Vec<f64> = roles
        .values()
        .filter(|t| t.games > 0)
        .map(|t| calculate_aggression(t.kd()))
        .collect();
    let aggression = if played.is_empty() {
        0
    } else {
        (played.iter().sum::<f64>() / played.len() as f64).round() as u32
    };

    RoleRadar {
        duelist: score(RoleArchetype::Duelist),
        initiator: score(RoleArchetype::Initiator),
        controller: score(RoleArchetype::Controller),
        sentinel: score(RoleArchetype::Sentinel),
        aggression,
    }
}

/// Aggregate `matches` for `subject`.
///
/// A match is skipped entirely when the subject is not in it, or when the
/// map, the subject's agent or the subject's side is unknown. A match
/// without team scores, or with level scores, counts as a game but not a win.
pub fn aggregate(matches: &[MatchRecord], subject: &Player) -> AggregateStats {
    let mut total = Tally::default();
    let mut agents: BTreeMap<String, Tally> = BTreeMap::new();
    let mut maps: BTreeMap<String, Tally> = BTreeMap::new();
    let mut roles: BTreeMap<RoleArchetype, Tally> = BTreeMap::new();

    for record in matches {
        let Some(me) = record.participant(&subject.name, &subject.tag) else {
            continue;
        };
        let (Some(agent), Some(map), Some(side)) = (&me.agent, &record.map, me.team) else {
            continue;
        };

        let won = record.scores.is_some_and(|s| s.is_win_for(side));

        total.record(won, me.kills, me.deaths);
        agents
            .entry(agent.clone())
            .or_default()
            .record(won, me.kills, me.deaths);
        maps.entry(map.clone())
            .or_default()
            .record(won, me.kills, me.deaths);
        if let Some(role) = role_for_agent(agent) {
            roles.entry(role).or_default().record(won, me.kills, me.deaths);
        }
    }

    if total.games == 0 {
        return AggregateStats::default();
    }

    let agents = by_games(
        agents
            .into_iter()
            .map(|(name, t)| AgentStat {
                name,
                games: t.games,
                wins: t.wins,
                win_rate: t.win_rate(),
                kills: t.kills,
                deaths: t.deaths,
                kd: t.kd(),
            })
            .collect(),
        |a| a.games,
    );

    let maps = by_games(
        maps.into_iter()
            .map(|(name, t)| MapStat {
                name,
                games: t.games,
                wins: t.wins,
                win_rate: t.win_rate(),
                kd: t.kd(),
            })
            .collect(),
        |m| m.games,
    );

    let best_map = maps
        .first()
        .map(|m| m.name.clone())
        .unwrap_or_else(|| NO_MAP.to_string());

    AggregateStats {
        games: total.games,
        wins: total.wins,
        kills: total.kills,
        deaths: total.deaths,
        win_rate: total.win_rate(),
        kd: total.kd(),
        agents,
        maps,
        best_map,
        radar: radar(&roles),
    }
}

/// Most played agent for `subject` across `matches`; ties go to the
/// alphabetically first agent.
pub fn most_played_agent(matches: &[MatchRecord], subject: &Player) -> Option<String> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for record in matches {
        if let Some(agent) = record
            .participant(&subject.name, &subject.tag)
            .and_then(|p| p.agent.as_deref())
        {
            *counts.entry(agent).or_insert(0) += 1;
        }
    }

    // max_by_key keeps the last maximum, so walk names in reverse
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(agent, _)| agent.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{participant, record, roster};
    use crate::models::{Participant, TeamSide};
    use pretty_assertions::assert_eq;

    fn alpha() -> Player {
        roster().remove(0)
    }

    fn alpha_game(
        id: &str,
        map: &str,
        agent: &str,
        k: u32,
        d: u32,
        score: (u32, u32),
    ) -> MatchRecord {
        record(
            id,
            "Competitive",
            Some(map),
            vec![
                participant("Alpha", "A1", TeamSide::Blue, agent, k, d),
                participant("Foe", "0000", TeamSide::Red, "Sage", 5, 5),
            ],
            Some(score),
        )
    }

    #[test]
    fn test_calculate_win_rate() {
        assert_eq!(calculate_win_rate(0, 0), 0);
        assert_eq!(calculate_win_rate(1, 3), 33);
        assert_eq!(calculate_win_rate(2, 3), 66);
        assert_eq!(calculate_win_rate(3, 3), 100);
    }

    #[test]
    fn test_calculate_kd() {
        assert_eq!(calculate_kd(10, 5), 2.0);
        assert_eq!(calculate_kd(5, 0), 5.0);
        assert_eq!(calculate_kd(0, 0), 0.0);
        assert_eq!(calculate_kd(10, 3), 3.33);
    }

    #[test]
    fn test_calculate_aggression_clamped() {
        assert_eq!(calculate_aggression(0.2), 0.0);
        assert_eq!(calculate_aggression(0.5), 0.0);
        assert!((calculate_aggression(1.0) - 33.0).abs() < 1e-9);
        assert_eq!(calculate_aggression(5.0), 100.0);
    }

    #[test]
    fn test_aggregate_empty() {
        let stats = aggregate(&[], &alpha());

        assert_eq!(stats, AggregateStats::default());
        assert_eq!(stats.best_map, "N/A");
    }

    #[test]
    fn test_single_competitive_win() {
        let game = alpha_game("m1", "Ascent", "Jett", 10, 5, (13, 9));
        let stats = aggregate(&[game], &alpha());

        assert_eq!(stats.games, 1);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.kd, 2.0);
        assert_eq!(stats.win_rate, 100);
        assert_eq!(stats.agents.len(), 1);
        assert_eq!(stats.agents[0].name, "Jett");
        assert_eq!(stats.agents[0].games, 1);
        assert_eq!(stats.maps.len(), 1);
        assert_eq!(stats.maps[0].games, 1);
        assert_eq!(stats.maps[0].kd, 2.0);
        assert_eq!(stats.best_map, "Ascent");
    }

    #[test]
    fn test_huge_kill_counts_saturate() {
        let games = vec![
            alpha_game("m1", "Ascent", "Jett", u32::MAX, 1, (13, 2)),
            alpha_game("m2", "Ascent", "Jett", 5, u32::MAX, (2, 13)),
        ];
        let stats = aggregate(&games, &alpha());

        assert_eq!(stats.games, 2);
        assert_eq!(stats.kills, u32::MAX);
        assert_eq!(stats.deaths, u32::MAX);
        assert_eq!(stats.kd, 1.0);
    }

    #[test]
    fn test_draw_is_not_a_win() {
        let game = alpha_game("m1", "Bind", "Jett", 20, 20, (12, 12));
        let stats = aggregate(&[game], &alpha());

        assert_eq!(stats.games, 1);
        assert_eq!(stats.wins, 0);
        assert_eq!(stats.win_rate, 0);
    }

    #[test]
    fn test_red_side_win() {
        let game = record(
            "m1",
            "Competitive",
            Some("Split"),
            vec![participant("alpha", "a1", TeamSide::Red, "Omen", 8, 12)],
            Some((4, 13)),
        );

        let stats = aggregate(&[game], &alpha());

        assert_eq!(stats.wins, 1);
        assert_eq!(stats.kd, 0.67);
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let mut no_map = alpha_game("a", "Ascent", "Jett", 1, 1, (13, 0));
        no_map.map = None;

        let mut no_agent = alpha_game("b", "Ascent", "Jett", 1, 1, (13, 0));
        no_agent.participants[0].agent = None;

        let mut no_side = alpha_game("c", "Ascent", "Jett", 1, 1, (13, 0));
        no_side.participants[0].team = None;

        let not_present = record(
            "d",
            "Competitive",
            Some("Ascent"),
            vec![participant("Bravo", "B2", TeamSide::Blue, "Sova", 1, 1)],
            Some((13, 0)),
        );

        let mut no_scores = alpha_game("e", "Ascent", "Jett", 3, 0, (0, 0));
        no_scores.scores = None;

        let games = [no_map, no_agent, no_side, not_present, no_scores];
        let stats = aggregate(&games, &alpha());

        assert_eq!(stats.games, 1);
        assert_eq!(stats.wins, 0);
        assert_eq!(stats.kd, 3.0);
    }

    #[test]
    fn test_totals_match_breakdowns() {
        let games = vec![
            alpha_game("1", "Ascent", "Jett", 20, 10, (13, 7)),
            alpha_game("2", "Ascent", "Raze", 15, 15, (10, 13)),
            alpha_game("3", "Bind", "Jett", 9, 18, (5, 13)),
            alpha_game("4", "Haven", "Omen", 12, 12, (13, 11)),
            alpha_game("5", "Bind", "Sova", 30, 3, (13, 1)),
        ];

        let stats = aggregate(&games, &alpha());

        assert_eq!(stats.games, 5);
        assert_eq!(stats.agents.iter().map(|a| a.games).sum::<u32>(), stats.games);
        assert_eq!(stats.maps.iter().map(|m| m.games).sum::<u32>(), stats.games);
        assert_eq!(stats.kills, 86);
        assert_eq!(stats.deaths, 58);
        assert_eq!(stats.wins, 3);
        assert_eq!(stats.win_rate, 60);
        for rate in stats
            .agents
            .iter()
            .map(|a| a.win_rate)
            .chain(stats.maps.iter().map(|m| m.win_rate))
        {
            assert!(rate <= 100);
        }
    }

    #[test]
    fn test_breakdowns_sorted_and_best_map_tiebreak() {
        let games = vec![
            alpha_game("1", "Lotus", "Raze", 1, 1, (13, 0)),
            alpha_game("2", "Bind", "Jett", 1, 1, (13, 0)),
            alpha_game("3", "Lotus", "Jett", 1, 1, (13, 0)),
            alpha_game("4", "Bind", "Jett", 1, 1, (0, 13)),
            alpha_game("5", "Abyss", "Omen", 1, 1, (0, 13)),
        ];

        let stats = aggregate(&games, &alpha());

        let agent_names: Vec<&str> = stats.agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(agent_names, vec!["Jett", "Omen", "Raze"]);

        let map_names: Vec<&str> = stats.maps.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(map_names, vec!["Bind", "Lotus", "Abyss"]);
        assert_eq!(stats.best_map, "Bind");
        assert_eq!(stats.maps[0].win_rate, 50);
    }

    #[test]
    fn test_role_radar() {
        let games = vec![
            // Duelist: 1 win of 2, K/D 2.0
            alpha_game("1", "Ascent", "Jett", 20, 10, (13, 5)),
            alpha_game("2", "Ascent", "Reyna", 20, 10, (5, 13)),
            // Sentinel: 1 win of 1, K/D 0.5
            alpha_game("3", "Bind", "Killjoy", 5, 10, (13, 5)),
            // Unknown agent counts in totals but not in the radar
            alpha_game("4", "Bind", "Tracer", 1, 1, (13, 5)),
        ];

        let stats = aggregate(&games, &alpha());

        assert_eq!(stats.radar.duelist, 50);
        assert_eq!(stats.radar.sentinel, 100);
        assert_eq!(stats.radar.initiator, 0);
        assert_eq!(stats.radar.controller, 0);
        // (99 + 0) / 2
        assert_eq!(stats.radar.aggression, 50);
        assert_eq!(stats.games, 4);
    }

    #[test]
    fn test_radar_aggression_uses_kills_when_no_deaths() {
        let game = alpha_game("1", "Ascent", "Sova", 2, 0, (13, 0));
        let stats = aggregate(&[game], &alpha());

        // K/D 2.0 -> 99
        assert_eq!(stats.radar.aggression, 99);
        assert_eq!(stats.radar.initiator, 100);
    }

    #[test]
    fn test_most_played_agent() {
        let games = vec![
            alpha_game("1", "Ascent", "Raze", 1, 1, (13, 0)),
            alpha_game("2", "Ascent", "Jett", 1, 1, (13, 0)),
            alpha_game("3", "Ascent", "Raze", 1, 1, (13, 0)),
        ];
        assert_eq!(most_played_agent(&games, &alpha()).as_deref(), Some("Raze"));

        let tied = vec![
            alpha_game("1", "Ascent", "Raze", 1, 1, (13, 0)),
            alpha_game("2", "Ascent", "Jett", 1, 1, (13, 0)),
        ];
        assert_eq!(most_played_agent(&tied, &alpha()).as_deref(), Some("Jett"));

        assert_eq!(most_played_agent(&[], &alpha()), None);
    }

    #[test]
    fn test_most_played_agent_ignores_unknown_agent() {
        let mut game = alpha_game("1", "Ascent", "Raze", 1, 1, (13, 0));
        game.participants[0] = Participant {
            agent: None,
            ..game.participants[0].clone()
        };

        assert_eq!(most_played_agent(&[game], &alpha()), None);
    }
}
