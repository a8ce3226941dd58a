//! Roster refresh controller.
//!
//! Serves the team summary and per-player details out of their TTL caches
//! and refreshes them from the upstream source when stale:
//! 1. Fetch rank and match history per player, pacing between players
//! 2. Classify the combined history (ranked, scrim, team match)
//! 3. Aggregate and write the result back to the cache
//!
//! Concurrent callers that find the same entry stale share one refresh.
//! Upstream failures degrade the affected player only; a refresh that gets
//! nothing from any player leaves the previous cache entry in place and
//! serves it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{Clock, SingleFlight, TtlCache};
use crate::calculate::{aggregate, most_played_agent};
use crate::classify::{classify, roster_members, ClassifierPolicy};
use crate::config::AppConfig;
use crate::fetch::{FetchError, MatchSource};
use crate::models::{
    MatchRecord, Player, PlayerDetail, PlayerSummary, RankInfo, TeamMatchSummary, TeamSummary,
};

/// Errors surfaced to callers of the controller.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),
}

// ── Report ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RefreshStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStage {
    Rank,
    Matches,
}

/// One upstream call that failed during a roster refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerFailure {
    pub player: String,
    pub stage: FetchStage,
    pub error: String,
}

/// Outcome of the most recent roster refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshReport {
    pub status: RefreshStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Players for which at least one upstream call succeeded
    pub players_ok: u32,
    pub failures: Vec<PlayerFailure>,
}

// ── Settings ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub page_size: u32,
    /// Delay between consecutive players
    pub pacing: Duration,
    /// Upper bound on any single upstream call
    pub call_timeout: Duration,
    pub roster_ttl: Duration,
    pub player_ttl: Duration,
    pub policy: ClassifierPolicy,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl RefreshSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.upstream.page_size,
            pacing: config.upstream.pacing(),
            call_timeout: Duration::from_secs(config.upstream.timeout_seconds),
            roster_ttl: config.cache.roster_ttl(),
            player_ttl: config.cache.player_ttl(),
            policy: ClassifierPolicy::from(&config.classifier),
        }
    }
}

// ── Controller ───────────────────────────────────────────────────

struct PlayerFetch {
    rank: Result<RankInfo, FetchError>,
    matches: Result<Vec<MatchRecord>, FetchError>,
}

impl PlayerFetch {
    fn any_ok(&self) -> bool {
        self.rank.is_ok() || self.matches.is_ok()
    }
}

pub struct RosterController {
    roster: Vec<Player>,
    source: Arc<dyn MatchSource>,
    clock: Arc<dyn Clock>,
    settings: RefreshSettings,
    roster_cache: TtlCache<(), TeamSummary>,
    player_cache: TtlCache<String, PlayerDetail>,
    roster_flight: SingleFlight<(), TeamSummary>,
    player_flight: SingleFlight<String, PlayerDetail>,
    report: RwLock<RefreshReport>,
}

impl RosterController {
    pub fn new(
        roster: Vec<Player>,
        source: Arc<dyn MatchSource>,
        clock: Arc<dyn Clock>,
        settings: RefreshSettings,
    ) -> Self {
        Self {
            roster_cache: TtlCache::new(settings.roster_ttl),
            player_cache: TtlCache::new(settings.player_ttl),
            roster_flight: SingleFlight::new(),
            player_flight: SingleFlight::new(),
            report: RwLock::new(RefreshReport::default()),
            roster,
            source,
            clock,
            settings,
        }
    }

    pub fn find_player(&self, name: &str, tag: &str) -> Option<&Player> {
        self.roster.iter().find(|p| p.is(name, tag))
    }

    pub async fn last_report(&self) -> RefreshReport {
        self.report.read().await.clone()
    }

    /// Whole-roster summary, refreshed first if the cached one is stale.
    pub async fn team_summary(&self) -> TeamSummary {
        if let Some(summary) = self.roster_cache.get_fresh(&(), self.clock.now()).await {
            return summary;
        }
        self.roster_flight.run((), || self.refresh_roster(false)).await
    }

    /// Refetch the whole roster even if the cached summary is still fresh.
    /// Joins a refresh that is already running instead of starting another.
    pub async fn refresh_now(&self) -> TeamSummary {
        self.roster_flight.run((), || self.refresh_roster(true)).await
    }

    /// Ranked and scrim stats for one roster member.
    pub async fn player_detail(&self, name: &str, tag: &str) -> Result<PlayerDetail, RefreshError> {
        let player = self
            .find_player(name, tag)
            .ok_or_else(|| RefreshError::UnknownPlayer(format!("{}#{}", name, tag)))?
            .clone();
        let key = player.riot_id();

        if let Some(detail) = self.player_cache.get_fresh(&key, self.clock.now()).await {
            return Ok(detail);
        }
        Ok(self
            .player_flight
            .run(key.clone(), || self.refresh_player(player, key))
            .await)
    }

    /// Refetch the roster on a fixed interval, starting immediately.
    pub fn spawn_refresher(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let summary = controller.refresh_now().await;
                debug!(
                    "Background refresh tick: {} team matches, updated {:?}",
                    summary.team_matches.len(),
                    summary.last_updated
                );
            }
        })
    }

    async fn timed<T, F>(&self, call: F) -> Result<T, FetchError>
    where
        F: std::future::Future<Output = Result<T, FetchError>>,
    {
        match tokio::time::timeout(self.settings.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.settings.call_timeout)),
        }
    }

    async fn fetch_player(&self, player: &Player) -> PlayerFetch {
        let rank = self.timed(self.source.fetch_rank(player)).await;
        let matches = self
            .timed(self.source.fetch_matches(player, self.settings.page_size))
            .await;
        PlayerFetch { rank, matches }
    }

    async fn refresh_roster(&self, force: bool) -> TeamSummary {
        let started = self.clock.now();
        // Another flight may have filled the cache since our caller looked
        if !force {
            if let Some(summary) = self.roster_cache.get_fresh(&(), started).await {
                return summary;
            }
        }

        info!(
            "Refreshing {} roster players from {}",
            self.roster.len(),
            self.source.name()
        );
        {
            let mut report = self.report.write().await;
            *report = RefreshReport {
                status: RefreshStatus::Running,
                started_at: Some(started),
                ..RefreshReport::default()
            };
        }

        let mut failures = Vec::new();
        let mut players_ok = 0u32;
        let mut fetched: Vec<(Player, PlayerFetch)> = Vec::with_capacity(self.roster.len());

        for (i, player) in self.roster.iter().enumerate() {
            if i > 0 && !self.settings.pacing.is_zero() {
                tokio::time::sleep(self.settings.pacing).await;
            }

            let fetch = self.fetch_player(player).await;
            if fetch.any_ok() {
                players_ok += 1;
            }
            for (stage, err) in [
                (FetchStage::Rank, fetch.rank.as_ref().err()),
                (FetchStage::Matches, fetch.matches.as_ref().err()),
            ] {
                if let Some(err) = err {
                    warn!("Error fetching {:?} for {}: {}", stage, player.riot_id(), err);
                    failures.push(PlayerFailure {
                        player: player.riot_id(),
                        stage,
                        error: err.to_string(),
                    });
                }
            }
            fetched.push((player.clone(), fetch));
        }

        let completed = self.clock.now();
        let summary = if players_ok > 0 {
            let summary = self.summarize(&fetched, completed);
            self.roster_cache.put((), summary.clone(), completed).await;
            info!(
                "Roster refresh done: {}/{} players, {} team matches",
                players_ok,
                self.roster.len(),
                summary.team_matches.len()
            );
            summary
        } else {
            warn!("Roster refresh got nothing from upstream, keeping previous summary");
            match self.roster_cache.get(&()).await {
                Some(entry) => entry.value,
                None => TeamSummary {
                    last_updated: None,
                    ..self.summarize(&fetched, completed)
                },
            }
        };

        let mut report = self.report.write().await;
        report.status = if players_ok > 0 {
            RefreshStatus::Completed
        } else {
            RefreshStatus::Failed
        };
        report.completed_at = Some(completed);
        report.players_ok = players_ok;
        report.failures = failures;

        summary
    }

    fn summarize(&self, fetched: &[(Player, PlayerFetch)], now: DateTime<Utc>) -> TeamSummary {
        let roster = fetched
            .iter()
            .map(|(player, fetch)| {
                let matches = fetch.matches.as_deref().unwrap_or(&[]);
                PlayerSummary {
                    rank: resolve_rank(player, fetch.rank.as_ref().ok(), matches),
                    main_agent: resolve_main_agent(player, matches),
                    player: player.clone(),
                }
            })
            .collect();

        let combined: Vec<MatchRecord> = fetched
            .iter()
            .filter_map(|(_, fetch)| fetch.matches.as_ref().ok())
            .flatten()
            .cloned()
            .collect();
        let classified = classify(&combined, &self.roster, &self.settings.policy);
        let team_matches = classified
            .team_match
            .iter()
            .map(|record| {
                TeamMatchSummary::from_record(record, roster_members(record, &self.roster))
            })
            .collect();

        TeamSummary {
            last_updated: Some(now),
            roster,
            team_matches,
        }
    }

    async fn refresh_player(&self, player: Player, key: String) -> PlayerDetail {
        let now = self.clock.now();
        if let Some(detail) = self.player_cache.get_fresh(&key, now).await {
            return detail;
        }

        debug!("Refreshing detail for {}", key);
        match self
            .timed(self.source.fetch_matches(&player, self.settings.page_size))
            .await
        {
            Ok(matches) => {
                let classified = classify(&matches, &self.roster, &self.settings.policy);
                let detail = PlayerDetail {
                    ranked: aggregate(&classified.ranked, &player),
                    scrims: aggregate(&classified.scrim, &player),
                };
                self.player_cache
                    .put(key, detail.clone(), self.clock.now())
                    .await;
                detail
            }
            Err(err) => {
                warn!("Error fetching matches for {}: {}", key, err);
                self.player_cache
                    .get(&key)
                    .await
                    .map(|entry| entry.value)
                    .unwrap_or_default()
            }
        }
    }
}

/// Provider rank, else the tier shown in the player's latest match, else
/// "Unranked".
fn resolve_rank(player: &Player, rank: Option<&RankInfo>, matches: &[MatchRecord]) -> String {
    if let Some(tier) = rank.and_then(RankInfo::tier) {
        return tier.to_string();
    }
    matches
        .iter()
        .filter_map(|m| m.participant(&player.name, &player.tag))
        .find_map(|p| p.rank_tier.clone())
        .unwrap_or_else(|| "Unranked".to_string())
}

/// Fixed assignment, else most played, else the role's default agent.
fn resolve_main_agent(player: &Player, matches: &[MatchRecord]) -> String {
    player
        .agent
        .clone()
        .or_else(|| most_played_agent(matches, player))
        .unwrap_or_else(|| player.role.default_agent().to_string())
}
