//! Statistics calculation engine.
//!
//! Pure functions over an in-memory list of matches and a player table:
//! - Winner determination from set scores
//! - Per-player aggregates with partner/opponent breakdowns and history
//! - League-wide aggregates feeding the ranking table
//!
//! Nothing here touches the store; callers pass snapshots in.

pub mod display;
pub mod ranking;

use std::collections::BTreeMap;

use crate::models::{
    Club, ClubId, CoParticipantStats, HistoryEntry, Match, Player, PlayerId, PlayerStats,
    SetScore, TeamSide,
};

pub use display::*;
pub use ranking::*;

/// Known players keyed by ID. Ordered so that derived listings are reproducible.
pub type PlayerTable = BTreeMap<PlayerId, Player>;

/// Known clubs keyed by ID.
pub type ClubTable = BTreeMap<ClubId, Club>;

/// Build a player table from a list of players.
pub fn player_table(players: impl IntoIterator<Item = Player>) -> PlayerTable {
    players.into_iter().map(|p| (p.id.clone(), p)).collect()
}

/// Build a club table from a list of clubs.
pub fn club_table(clubs: impl IntoIterator<Item = Club>) -> ClubTable {
    clubs.into_iter().map(|c| (c.id.clone(), c)).collect()
}

/// Win percentage (0–100). Zero when no matches were played.
pub fn effectiveness(wins: u32, matches: u32) -> f64 {
    if matches == 0 {
        0.0
    } else {
        wins as f64 / matches as f64 * 100.0
    }
}

/// Decide a match winner from its set scores.
///
/// Each set goes to the side with strictly more games; drawn sets count for
/// nobody. Team 1 wins only with strictly more sets, so a level count
/// (including no sets at all) goes to team 2. Stored matches rely on this.
pub fn determine_winner(sets: &[SetScore]) -> TeamSide {
    let mut team1_sets = 0u32;
    let mut team2_sets = 0u32;

    for set in sets {
        match set.set_winner() {
            Some(TeamSide::Team1) => team1_sets += 1,
            Some(TeamSide::Team2) => team2_sets += 1,
            None => {}
        }
    }

    if team1_sets > team2_sets {
        TeamSide::Team1
    } else {
        TeamSide::Team2
    }
}

fn tally(list: &mut Vec<CoParticipantStats>, player_id: &PlayerId, won: bool) {
    let entry = match list.iter().position(|c| &c.player_id == player_id) {
        Some(i) => &mut list[i],
        None => {
            list.push(CoParticipantStats::new(player_id.clone()));
            let last = list.len() - 1;
            &mut list[last]
        }
    };
    entry.matches += 1;
    if won {
        entry.wins += 1;
    }
}

/// Detailed statistics for one player.
///
/// Matches the player did not take part in are skipped, so either the
/// player's own matches or a whole league's can be passed. Names of
/// co-participants missing from `players` fall back to the unknown label.
pub fn compute_player_stats(
    player_id: &PlayerId,
    matches: &[Match],
    players: &PlayerTable,
) -> PlayerStats {
    let mut stats = PlayerStats::new(player_id.clone(), player_label(players, player_id));

    for m in matches {
        let Some(side) = m.side_of(player_id) else {
            continue;
        };
        let won = side == m.winner();
        stats.record_result(won);

        let partner = m.partner_of(player_id).filter(|id| !id.is_blank());
        if let Some(partner) = partner {
            tally(&mut stats.partners, partner, won);
        }

        let opponents = m.team(side.opponent()).players();
        for opponent in opponents.iter().filter(|id| !id.is_blank()) {
            tally(&mut stats.opponents, opponent, won);
        }

        stats.history.push(HistoryEntry {
            date: m.date,
            partner_name: partner
                .map(|id| player_label(players, id))
                .unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
            opponents_names: opponents
                .iter()
                .map(|id| player_label(players, id))
                .collect::<Vec<_>>()
                .join(" / "),
            won,
            sets: m.sets.clone(),
            super_tiebreak: m.super_tiebreak,
        });
    }

    stats.finalize();
    stats
}

/// Totals for every known player, used by the ranking table.
///
/// Every player in the table gets a record, even with no matches. Match
/// slots referencing players outside the table are skipped.
pub fn compute_all_player_stats(
    matches: &[Match],
    players: &PlayerTable,
) -> BTreeMap<PlayerId, PlayerStats> {
    let mut all: BTreeMap<PlayerId, PlayerStats> = players
        .values()
        .map(|p| {
            (
                p.id.clone(),
                PlayerStats::new(p.id.clone(), p.display_name()),
            )
        })
        .collect();

    for m in matches {
        let winner = m.winner();
        for (side, id) in m.slots() {
            if let Some(stats) = all.get_mut(id) {
                stats.record_result(side == winner);
            }
        }
    }

    for stats in all.values_mut() {
        stats.finalize();
    }

    all
}

/// Co-participants ordered by matches played, most first.
/// Ties keep first-encounter order.
pub fn sorted_by_matches(list: &[CoParticipantStats]) -> Vec<&CoParticipantStats> {
    let mut sorted: Vec<_> = list.iter().collect();
    sorted.sort_by(|a, b| b.matches.cmp(&a.matches));
    sorted
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::Team;

    pub fn player(id: &str, first: &str, last: &str) -> Player {
        Player::new(first, last).with_id(id)
    }

    pub fn doubles(
        day: u32,
        team1: (&str, &str),
        team2: (&str, &str),
        sets: &[(u32, u32)],
    ) -> Match {
        Match::new(
            Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
            Team::new(team1.0, team1.1),
            Team::new(team2.0, team2.1),
            sets.iter().map(|&(a, b)| SetScore::new(a, b)).collect(),
            None,
        )
        .with_id(format!("m{}", day))
    }

    pub fn roster() -> PlayerTable {
        player_table(vec![
            player("a", "Ana", "Alvarez"),
            player("b", "Beto", "Bravo"),
            player("c", "Carla", "Castro"),
            player("d", "Dario", "Duarte"),
        ])
    }
}
