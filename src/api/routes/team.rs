use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;
use crate::models::{PlayerSummary, TeamMatchSummary};

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub last_updated: Option<DateTime<Utc>>,
    pub roster: Vec<PlayerSummary>,
}

#[derive(Debug, Serialize)]
pub struct TeamHistoryResponse {
    pub last_updated: Option<DateTime<Utc>>,
    pub matches: Vec<TeamMatchSummary>,
}

/// GET /api/team
pub async fn get_team(State(state): State<AppState>) -> Json<TeamResponse> {
    let summary = state.controller.team_summary().await;
    Json(TeamResponse {
        last_updated: summary.last_updated,
        roster: summary.roster,
    })
}

/// GET /api/team-history
pub async fn get_team_history(State(state): State<AppState>) -> Json<TeamHistoryResponse> {
    let summary = state.controller.team_summary().await;
    Json(TeamHistoryResponse {
        last_updated: summary.last_updated,
        matches: summary.team_matches,
    })
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::test_support::{get_json, state_with};
    use crate::fetch::MockSource;
    use crate::models::fixtures::{participant, record, roster};
    use crate::models::TeamSide;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_get_team() {
        let team = roster();
        let app = build_router(state_with(MockSource::new().with_rank(&team[0], "Ascendant 1")));

        let (status, json) = get_json(app, "/api/team").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["last_updated"], "2026-03-01T18:00:00Z");
        let roster = json["roster"].as_array().unwrap();
        assert_eq!(roster.len(), 5);
        assert_eq!(roster[0]["name"], "Alpha");
        assert_eq!(roster[0]["tag"], "A1");
        assert_eq!(roster[0]["rank"], "Ascendant 1");
        assert_eq!(roster[0]["main_agent"], "Jett");
        assert_eq!(roster[1]["rank"], "Unranked");
    }

    #[tokio::test]
    async fn test_get_team_history() {
        let team = roster();
        let game = record(
            "team-1",
            "Competitive",
            Some("Split"),
            vec![
                participant("Alpha", "A1", TeamSide::Red, "Jett", 1, 1),
                participant("Delta", "D4", TeamSide::Red, "Killjoy", 1, 1),
                participant("Echo", "E5", TeamSide::Red, "Breach", 1, 1),
            ],
            Some((10, 13)),
        );
        let source = MockSource::new()
            .with_matches(&team[0], vec![game.clone()])
            .with_matches(&team[3], vec![game]);
        let app = build_router(state_with(source));

        let (status, json) = get_json(app, "/api/team-history").await;

        assert_eq!(status, StatusCode::OK);
        let matches = json["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["id"], "team-1");
        assert_eq!(matches[0]["map"], "Split");
        assert_eq!(
            matches[0]["members"],
            serde_json::json!(["Alpha", "Delta", "Echo"])
        );
    }

    #[tokio::test]
    async fn test_team_served_when_upstream_down() {
        let source = MockSource::new();
        source.go_offline();
        let app = build_router(state_with(source));

        let (status, json) = get_json(app, "/api/team").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["last_updated"].is_null());
        assert_eq!(json["roster"].as_array().unwrap().len(), 5);
    }
}
