//! League controller: the only component that talks to the document store.
//!
//! Reads come back as an immutable [`LeagueSnapshot`] built per call; the
//! statistics and ranking code only ever sees snapshots.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::calculate::{
    build_ranking, club_table, compute_all_player_stats, compute_player_stats, player_table,
    ClubTable, PlayerTable,
};
use crate::models::{
    Club, ClubId, EntityId, League, LeagueId, Match, MatchId, Player, PlayerId, PlayerStats,
    RankRow,
};
use crate::storage::{Collection, DocumentStore, Query, SortDirection, StorageError};

/// Players, clubs and matches as they were when loaded.
#[derive(Debug, Clone, Default)]
pub struct LeagueSnapshot {
    pub players: PlayerTable,
    pub clubs: ClubTable,
    /// Newest first
    pub matches: Vec<Match>,
}

impl LeagueSnapshot {
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Detailed statistics for one player over this snapshot's matches.
    pub fn player_stats(&self, id: &PlayerId) -> PlayerStats {
        compute_player_stats(id, &self.matches, &self.players)
    }

    /// Ranking table, optionally restricted to one club. A club that is no
    /// longer in the snapshot ranks nobody.
    pub fn ranking(&self, club_filter: Option<&ClubId>) -> Vec<RankRow> {
        let stats = compute_all_player_stats(&self.matches, &self.players);
        build_ranking(&stats, &self.players, &self.clubs, club_filter)
    }
}

fn to_document<T: Serialize>(record: &T) -> Result<Value, StorageError> {
    Ok(serde_json::to_value(record)?)
}

fn league_filter(query: Query, league: Option<&LeagueId>) -> Query {
    match league {
        Some(id) => query.where_eq("league_id", id.as_str()),
        None => query,
    }
}

pub struct LeagueController {
    store: Arc<dyn DocumentStore>,
}

impl LeagueController {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Fetch and decode a collection. Documents that do not decode are
    /// logged and skipped.
    async fn fetch<T: DeserializeOwned>(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<T>, StorageError> {
        let docs = self.store.fetch_all(collection, query).await?;
        let total = docs.len();

        let records: Vec<T> = docs
            .into_iter()
            .filter_map(|doc| match serde_json::from_value(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed {} document: {}", collection, e);
                    None
                }
            })
            .collect();

        debug!("Loaded {}/{} {}", records.len(), total, collection);
        Ok(records)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &EntityId,
    ) -> Result<Option<T>, StorageError> {
        match self.store.get(collection, id).await? {
            Some(doc) => match serde_json::from_value(doc) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    warn!("Malformed {} document {}: {}", collection, id, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    // Leagues

    /// Leagues offered in the league selector.
    pub async fn active_leagues(&self) -> Result<Vec<League>, StorageError> {
        self.fetch(Collection::Leagues, &Query::all().where_eq("active", true))
            .await
    }

    pub async fn league(&self, id: &LeagueId) -> Result<Option<League>, StorageError> {
        self.get(Collection::Leagues, id).await
    }

    pub async fn add_league(&self, league: League) -> Result<League, StorageError> {
        let id = self
            .store
            .add(Collection::Leagues, to_document(&league)?)
            .await?;
        info!("Created league {} ({})", league.name, id);
        Ok(league.with_id(id))
    }

    // Snapshots

    /// Players and matches of one league (all of them when `league` is
    /// `None`), plus every club.
    pub async fn snapshot(&self, league: Option<&LeagueId>) -> Result<LeagueSnapshot, StorageError> {
        let players = self.players(league).await?;
        let clubs = self.clubs().await?;
        let matches = self
            .fetch(
                Collection::Matches,
                &league_filter(Query::all(), league).order_by("date", SortDirection::Desc),
            )
            .await?;

        Ok(LeagueSnapshot {
            players: player_table(players),
            clubs: club_table(clubs),
            matches,
        })
    }

    // Players

    pub async fn players(&self, league: Option<&LeagueId>) -> Result<Vec<Player>, StorageError> {
        self.fetch(Collection::Players, &league_filter(Query::all(), league))
            .await
    }

    pub async fn player(&self, id: &PlayerId) -> Result<Option<Player>, StorageError> {
        self.get(Collection::Players, id).await
    }

    pub async fn add_player(&self, player: Player) -> Result<Player, StorageError> {
        let id = self
            .store
            .add(Collection::Players, to_document(&player)?)
            .await?;
        Ok(player.with_id(id))
    }

    /// Apply edited fields to an existing player.
    pub async fn update_player(&self, id: &PlayerId, changes: Value) -> Result<(), StorageError> {
        self.store.update(Collection::Players, id, changes).await
    }

    /// Remove a player. Matches referencing them are left as they are.
    pub async fn delete_player(&self, id: &PlayerId) -> Result<(), StorageError> {
        self.store.delete(Collection::Players, id).await
    }

    /// Every match a player took part in, newest first.
    pub async fn player_matches(
        &self,
        id: &PlayerId,
        league: Option<&LeagueId>,
    ) -> Result<Vec<Match>, StorageError> {
        let query = league_filter(Query::all(), league).order_by("date", SortDirection::Desc);
        let matches: Vec<Match> = self.fetch(Collection::Matches, &query).await?;
        Ok(matches.into_iter().filter(|m| m.involves(id)).collect())
    }

    // Clubs

    pub async fn clubs(&self) -> Result<Vec<Club>, StorageError> {
        self.fetch(Collection::Clubs, &Query::all()).await
    }

    pub async fn add_club(&self, club: Club) -> Result<Club, StorageError> {
        let id = self
            .store
            .add(Collection::Clubs, to_document(&club)?)
            .await?;
        Ok(club.with_id(id))
    }

    /// Remove a club. Its players keep their (now dangling) club reference.
    pub async fn delete_club(&self, id: &ClubId) -> Result<(), StorageError> {
        self.store.delete(Collection::Clubs, id).await
    }

    // Matches

    /// The most recent matches across all leagues, newest first.
    pub async fn recent_matches(&self, limit: usize) -> Result<Vec<Match>, StorageError> {
        let query = Query::all()
            .order_by("date", SortDirection::Desc)
            .limit(limit);
        self.fetch(Collection::Matches, &query).await
    }

    pub async fn get_match(&self, id: &MatchId) -> Result<Option<Match>, StorageError> {
        self.get(Collection::Matches, id).await
    }

    pub async fn add_match(&self, m: Match) -> Result<Match, StorageError> {
        let id = self
            .store
            .add(Collection::Matches, to_document(&m)?)
            .await?;
        info!("Recorded match {} (winner {})", id, m.winner());
        Ok(m.with_id(id))
    }

    /// Overwrite every field of a stored match, winner included.
    pub async fn replace_match(&self, id: &MatchId, m: Match) -> Result<Match, StorageError> {
        let m = m.with_id(id.clone());
        self.store
            .update(Collection::Matches, id, to_document(&m)?)
            .await?;
        Ok(m)
    }

    pub async fn delete_match(&self, id: &MatchId) -> Result<(), StorageError> {
        self.store.delete(Collection::Matches, id).await
    }
}
