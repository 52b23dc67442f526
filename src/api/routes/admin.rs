use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::views::{CoParticipantRow, HistoryRow, MatchRow, PlayerRow};
use crate::api::{AdminSession, ApiError, ApiJson};
use crate::calculate::{sort_clubs, sort_players_by_club, sorted_by_matches, PlayerTable};
use crate::forms::{ClubForm, MatchForm, PlayerForm};
use crate::models::{
    Club, ClubId, CoParticipantStats, LeagueId, Match, MatchId, Player, PlayerId, TeamSide,
};

/// Opponents listed in the admin breakdown.
const TOP_OPPONENTS: usize = 10;

// ── Players ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PlayerListParams {
    pub league: Option<LeagueId>,
}

/// Players grouped by club, unaffiliated last.
pub async fn list_players(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<PlayerListParams>,
) -> Result<Json<Vec<PlayerRow>>, ApiError> {
    let snapshot = state.league.snapshot(params.league.as_ref()).await?;

    let mut players: Vec<Player> = snapshot.players.values().cloned().collect();
    sort_players_by_club(&mut players, &snapshot.clubs);

    Ok(Json(
        players
            .iter()
            .map(|p| PlayerRow::new(p, &snapshot.clubs))
            .collect(),
    ))
}

pub async fn create_player(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
    ApiJson(form): ApiJson<PlayerForm>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let player = state.league.add_player(form.build()?).await?;
    info!("{} added player {}", session.email, player.display_name());
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn update_player(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
    ApiJson(form): ApiJson<PlayerForm>,
) -> Result<Json<Player>, ApiError> {
    state.league.update_player(&id, form.changes()?).await?;
    let player = state
        .league
        .player(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Player {}", id)))?;
    Ok(Json(player))
}

pub async fn delete_player(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
) -> Result<StatusCode, ApiError> {
    state.league.delete_player(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct PlayerBreakdown {
    pub player_id: String,
    pub name: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub effectiveness: f64,
    pub partners: Vec<CoParticipantRow>,
    pub opponents: Vec<CoParticipantRow>,
    pub history: Vec<HistoryRow>,
}

fn co_participant_rows(list: &[CoParticipantStats], players: &PlayerTable) -> Vec<CoParticipantRow> {
    sorted_by_matches(list)
        .into_iter()
        .map(|c| CoParticipantRow::new(c, players))
        .collect()
}

/// Full statistics for a player across every league.
pub async fn player_breakdown(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
) -> Result<Json<PlayerBreakdown>, ApiError> {
    let snapshot = state.league.snapshot(None).await?;
    if snapshot.player(&id).is_none() {
        return Err(ApiError::NotFound(format!("Player {}", id)));
    }

    let stats = snapshot.player_stats(&id);
    let mut opponents = co_participant_rows(&stats.opponents, &snapshot.players);
    opponents.truncate(TOP_OPPONENTS);

    Ok(Json(PlayerBreakdown {
        player_id: id.to_string(),
        name: stats.name.clone(),
        matches: stats.matches,
        wins: stats.wins,
        losses: stats.losses,
        effectiveness: stats.effectiveness,
        partners: co_participant_rows(&stats.partners, &snapshot.players),
        opponents,
        history: stats.history.iter().map(HistoryRow::from).collect(),
    }))
}

// ── Clubs ───────────────────────────────────────────────────────

pub async fn list_clubs(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<Club>>, ApiError> {
    let mut clubs = state.league.clubs().await?;
    sort_clubs(&mut clubs);
    Ok(Json(clubs))
}

pub async fn create_club(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ClubForm>,
) -> Result<(StatusCode, Json<Club>), ApiError> {
    let club = state.league.add_club(form.build()?).await?;
    info!("{} added club {}", session.email, club.name);
    Ok((StatusCode::CREATED, Json(club)))
}

/// Delete a club; its players are left untouched.
pub async fn delete_club(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<ClubId>,
) -> Result<StatusCode, ApiError> {
    state.league.delete_club(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Matches ─────────────────────────────────────────────────────

/// Most recent matches, newest first.
pub async fn list_matches(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchRow>>, ApiError> {
    let limit = state.config.league.recent_matches_limit;
    let matches = state.league.recent_matches(limit).await?;
    let players = state.league.snapshot(None).await?.players;

    Ok(Json(
        matches.iter().map(|m| MatchRow::new(m, &players)).collect(),
    ))
}

pub async fn create_match(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
    ApiJson(form): ApiJson<MatchForm>,
) -> Result<(StatusCode, Json<Match>), ApiError> {
    let m = state.league.add_match(form.build(Utc::now())?).await?;
    info!("{} recorded match {}", session.email, m.id);
    Ok((StatusCode::CREATED, Json(m)))
}

/// A stored match with the form prefilled for editing.
#[derive(Debug, Serialize)]
pub struct MatchEdit {
    pub id: String,
    pub winner: TeamSide,
    pub form: MatchForm,
}

pub async fn get_match(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<MatchEdit>, ApiError> {
    let m = state
        .league
        .get_match(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Match {}", id)))?;

    Ok(Json(MatchEdit {
        id: m.id.to_string(),
        winner: m.winner(),
        form: MatchForm::from_match(&m),
    }))
}

/// Overwrite a match from the form; the winner is recomputed.
pub async fn update_match(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
    ApiJson(form): ApiJson<MatchForm>,
) -> Result<Json<Match>, ApiError> {
    let m = form.build(Utc::now())?;
    let m = state.league.replace_match(&id, m).await?;
    Ok(Json(m))
}

pub async fn delete_match(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<StatusCode, ApiError> {
    state.league.delete_match(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
