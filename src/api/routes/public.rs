use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::views::{CoParticipantRow, HistoryRow, MatchRow};
use crate::api::ApiError;
use crate::calculate::{category_label, club_label, resolve_club_filter, sorted_by_matches};
use crate::models::{ClubId, League, LeagueId, PlayerId, RankRow};

/// Partners shown on the public player page.
const TOP_PARTNERS: usize = 5;

async fn require_league(state: &AppState, id: &LeagueId) -> Result<League, ApiError> {
    state
        .league
        .league(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("League {}", id)))
}

pub async fn list_leagues(State(state): State<AppState>) -> Result<Json<Vec<League>>, ApiError> {
    Ok(Json(state.league.active_leagues().await?))
}

pub async fn get_league(
    State(state): State<AppState>,
    Path(id): Path<LeagueId>,
) -> Result<Json<League>, ApiError> {
    Ok(Json(require_league(&state, &id).await?))
}

/// League matches, newest first.
pub async fn league_matches(
    State(state): State<AppState>,
    Path(id): Path<LeagueId>,
) -> Result<Json<Vec<MatchRow>>, ApiError> {
    require_league(&state, &id).await?;
    let snapshot = state.league.snapshot(Some(&id)).await?;

    let rows = snapshot
        .matches
        .iter()
        .map(|m| MatchRow::new(m, &snapshot.players))
        .collect();
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct RankingParams {
    /// Club ID to filter by; overrides the configured ranking club
    pub club: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClubSummary {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub league: League,
    /// The club the table is restricted to, if any
    pub club: Option<ClubSummary>,
    pub rows: Vec<RankRow>,
}

pub async fn league_ranking(
    State(state): State<AppState>,
    Path(id): Path<LeagueId>,
    Query(params): Query<RankingParams>,
) -> Result<Json<RankingResponse>, ApiError> {
    let league = require_league(&state, &id).await?;
    let snapshot = state.league.snapshot(Some(&id)).await?;

    let club_filter: Option<ClubId> = match params.club.filter(|c| !c.trim().is_empty()) {
        Some(club) => Some(ClubId::from(club)),
        None => state
            .config
            .league
            .ranking_club
            .as_deref()
            .and_then(|name| resolve_club_filter(&snapshot.clubs, name)),
    };

    let rows = snapshot.ranking(club_filter.as_ref());
    let club = club_filter.map(|id| ClubSummary {
        name: snapshot.clubs.get(&id).map(|c| c.name.clone()),
        id: id.to_string(),
    });

    Ok(Json(RankingResponse { league, club, rows }))
}

#[derive(Debug, Serialize)]
pub struct PlayerDetail {
    pub player_id: String,
    pub name: String,
    pub club: String,
    pub category: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub effectiveness: f64,
    pub effectiveness_display: String,
    pub top_partners: Vec<CoParticipantRow>,
    pub history: Vec<HistoryRow>,
}

/// One player's record within a league.
pub async fn player_detail(
    State(state): State<AppState>,
    Path((league_id, player_id)): Path<(LeagueId, PlayerId)>,
) -> Result<Json<PlayerDetail>, ApiError> {
    require_league(&state, &league_id).await?;
    let snapshot = state.league.snapshot(Some(&league_id)).await?;
    let player = snapshot
        .player(&player_id)
        .ok_or_else(|| ApiError::NotFound(format!("Player {}", player_id)))?;

    let stats = snapshot.player_stats(&player_id);
    let top_partners = sorted_by_matches(&stats.partners)
        .into_iter()
        .take(TOP_PARTNERS)
        .map(|p| CoParticipantRow::new(p, &snapshot.players))
        .collect();

    Ok(Json(PlayerDetail {
        player_id: player_id.to_string(),
        name: stats.name.clone(),
        club: club_label(&snapshot.clubs, player),
        category: category_label(player),
        matches: stats.matches,
        wins: stats.wins,
        losses: stats.losses,
        effectiveness: stats.effectiveness,
        effectiveness_display: format!("{:.1}", stats.effectiveness),
        top_partners,
        history: stats.history.iter().map(HistoryRow::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::models::{Club, League, LeagueId, Match, Player, PlayerId, SetScore, Team};
    use axum::http::StatusCode;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    struct Seeded {
        league: LeagueId,
        players: Vec<PlayerId>,
        club: Club,
    }

    /// One league, four players (first two in a club), one match A+B beat C+D.
    async fn seed(state: &AppState) -> Seeded {
        let ctl = &state.league;
        let league = ctl.add_league(League::new("Spring", true)).await.unwrap().id;
        ctl.add_league(League::new("Old", false)).await.unwrap();
        let club = ctl.add_club(Club::new("Club Táchira")).await.unwrap();

        let mut players = Vec::new();
        for (i, (first, last)) in [("Ana", "Alvarez"), ("Beto", "Bravo"), ("Carla", "Castro"), ("Dario", "Duarte")]
            .into_iter()
            .enumerate()
        {
            let mut p = Player::new(first, last).with_league(league.clone());
            if i < 2 {
                p = p.with_club(club.id.clone());
            }
            players.push(ctl.add_player(p).await.unwrap().id);
        }

        let m = Match::new(
            Utc.with_ymd_and_hms(2025, 3, 8, 12, 0, 0).unwrap(),
            Team::new(players[0].clone(), players[1].clone()),
            Team::new(players[2].clone(), players[3].clone()),
            vec![SetScore::new(6, 4), SetScore::new(3, 6), SetScore::new(6, 2)],
            None,
        )
        .with_league(league.clone());
        ctl.add_match(m).await.unwrap();

        Seeded {
            league,
            players,
            club,
        }
    }

    #[tokio::test]
    async fn test_health() {
        let tmp = TempDir::new().unwrap();
        let (status, json) = get_json(build_router(setup_test_state(&tmp)), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_active_leagues() {
        let tmp = TempDir::new().unwrap();
        let state = setup_test_state(&tmp);
        seed(&state).await;

        let (status, json) = get_json(build_router(state), "/api/leagues").await;
        assert_eq!(status, StatusCode::OK);
        let leagues = json.as_array().unwrap();
        assert_eq!(leagues.len(), 1);
        assert_eq!(leagues[0]["name"], "Spring");
    }

    #[tokio::test]
    async fn test_unknown_league_is_404() {
        let tmp = TempDir::new().unwrap();
        let state = setup_test_state(&tmp);
        let (status, json) = get_json(build_router(state), "/api/leagues/nope/ranking").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_league_matches() {
        let tmp = TempDir::new().unwrap();
        let state = setup_test_state(&tmp);
        let seeded = seed(&state).await;

        let uri = format!("/api/leagues/{}/matches", seeded.league);
        let (status, json) = get_json(build_router(state), &uri).await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["team1"], "Ana Alvarez / Beto Bravo");
        assert_eq!(rows[0]["score"], "6-4 3-6 6-2");
        assert_eq!(rows[0]["winner"], "team1");
        assert_eq!(rows[0]["date_display"], "08 Mar 2025 12:00");
    }

    #[tokio::test]
    async fn test_ranking_without_filter() {
        let tmp = TempDir::new().unwrap();
        let state = setup_test_state(&tmp);
        let seeded = seed(&state).await;

        let uri = format!("/api/leagues/{}/ranking", seeded.league);
        let (status, json) = get_json(build_router(state), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["club"].is_null());
        let rows = json["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["position"], 1);
        assert_eq!(rows[0]["effectiveness_display"], "100.0");
        assert_eq!(rows[3]["effectiveness_display"], "0.0");
    }

    #[tokio::test]
    async fn test_ranking_with_configured_club() {
        let tmp = TempDir::new().unwrap();
        let mut state = setup_test_state(&tmp);
        let mut config = (*state.config).clone();
        config.league.ranking_club = Some("Club Táchira".to_string());
        state.config = std::sync::Arc::new(config);
        let seeded = seed(&state).await;

        let uri = format!("/api/leagues/{}/ranking", seeded.league);
        let (_, json) = get_json(build_router(state), &uri).await;
        assert_eq!(json["club"]["name"], "Club Táchira");
        let rows = json["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r["wins"] == 1));
    }

    #[tokio::test]
    async fn test_ranking_for_deleted_club_is_empty() {
        let tmp = TempDir::new().unwrap();
        let state = setup_test_state(&tmp);
        let seeded = seed(&state).await;
        state.league.delete_club(&seeded.club.id).await.unwrap();

        let uri = format!("/api/leagues/{}/ranking?club={}", seeded.league, seeded.club.id);
        let (status, json) = get_json(build_router(state), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["club"]["name"].is_null());
        assert_eq!(json["rows"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_player_detail() {
        let tmp = TempDir::new().unwrap();
        let state = setup_test_state(&tmp);
        let seeded = seed(&state).await;

        let uri = format!(
            "/api/leagues/{}/players/{}/stats",
            seeded.league, seeded.players[2]
        );
        let (status, json) = get_json(build_router(state), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "Carla Castro");
        assert_eq!(json["club"], "No Club");
        assert_eq!(json["matches"], 1);
        assert_eq!(json["wins"], 0);
        assert_eq!(json["effectiveness"], 0.0);
        assert_eq!(json["top_partners"][0]["name"], "Dario Duarte");
        assert_eq!(json["history"][0]["opponents"], "Ana Alvarez / Beto Bravo");
        assert_eq!(json["history"][0]["won"], false);
    }

    #[tokio::test]
    async fn test_player_detail_unknown_player() {
        let tmp = TempDir::new().unwrap();
        let state = setup_test_state(&tmp);
        let seeded = seed(&state).await;

        let uri = format!("/api/leagues/{}/players/ghost/stats", seeded.league);
        let (status, _) = get_json(build_router(state), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
