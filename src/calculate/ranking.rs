//! Ranking table built from league-wide player statistics.

use std::collections::BTreeMap;

use super::{ClubTable, PlayerTable};
use crate::models::{ClubId, PlayerId, PlayerStats, RankRow};

/// Resolve the ranking club by exact name.
///
/// Returns `None` when no club has that name; the ranking then shows everyone.
pub fn resolve_club_filter(clubs: &ClubTable, name: &str) -> Option<ClubId> {
    clubs
        .values()
        .find(|c| c.name == name)
        .map(|c| c.id.clone())
}

/// Sort league-wide stats into ranking rows.
///
/// With a club filter only that club's players are kept. A filter naming a
/// club that is not in `clubs` yields an empty table, even when players still
/// carry its id. Rows are ordered by effectiveness, highest first; ties keep
/// player-table order.
pub fn build_ranking(
    stats: &BTreeMap<PlayerId, PlayerStats>,
    players: &PlayerTable,
    clubs: &ClubTable,
    club_filter: Option<&ClubId>,
) -> Vec<RankRow> {
    if club_filter.is_some_and(|club| !clubs.contains_key(club)) {
        return Vec::new();
    }

    let mut ranked: Vec<&PlayerStats> = stats
        .values()
        .filter(|s| match club_filter {
            Some(club) => players
                .get(&s.player_id)
                .and_then(|p| p.club())
                .is_some_and(|c| c == club),
            None => true,
        })
        .collect();

    ranked.sort_by(|a, b| b.effectiveness.total_cmp(&a.effectiveness));

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, s)| RankRow {
            position: i as u32 + 1,
            player_id: s.player_id.clone(),
            name: s.name.clone(),
            matches: s.matches,
            wins: s.wins,
            losses: s.losses,
            effectiveness: s.effectiveness,
            effectiveness_display: format!("{:.1}", s.effectiveness),
        })
        .collect()
}
