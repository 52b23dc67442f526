//! Labels, fallbacks and name ordering for presenting league data.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::{ClubTable, PlayerTable};
use crate::models::{Club, Match, Player, PlayerId, SetScore, Team};

pub const UNKNOWN_PLAYER: &str = "Unknown player";
pub const UNKNOWN_PLAYERS: &str = "Unknown players";
pub const NO_CLUB: &str = "No Club";
pub const NO_CATEGORY: &str = "No category";
pub const UNKNOWN_DATE: &str = "Unknown date";
pub const NO_RESULT: &str = "No result";

/// Display name of a player, or the unknown label if the ID is not in the table.
pub fn player_label(players: &PlayerTable, id: &PlayerId) -> String {
    players
        .get(id)
        .map(Player::display_name)
        .unwrap_or_else(|| UNKNOWN_PLAYER.to_string())
}

/// "A B / C D", or the unknown label if either player is missing.
pub fn team_label(players: &PlayerTable, team: &Team) -> String {
    match (players.get(&team.player1_id), players.get(&team.player2_id)) {
        (Some(p1), Some(p2)) => format!("{} / {}", p1.display_name(), p2.display_name()),
        _ => UNKNOWN_PLAYERS.to_string(),
    }
}

/// Club name of a player, falling back for unaffiliated players and deleted clubs.
pub fn club_label(clubs: &ClubTable, player: &Player) -> String {
    player
        .club()
        .and_then(|id| clubs.get(id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| NO_CLUB.to_string())
}

pub fn category_label(player: &Player) -> String {
    player.category().unwrap_or(NO_CATEGORY).to_string()
}

/// "6-4 3-6 6-2 STB: 10-8", or the no-result label.
pub fn score_line(m: &Match) -> String {
    format_score(&m.sets, m.super_tiebreak.as_ref())
}

pub fn format_score(sets: &[SetScore], super_tiebreak: Option<&SetScore>) -> String {
    let mut line = sets
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    if let Some(stb) = super_tiebreak {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&format!("STB: {}", stb));
    }

    if line.is_empty() {
        NO_RESULT.to_string()
    } else {
        line
    }
}

pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    match date {
        Some(d) => d.format("%d %b %Y %H:%M").to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// Case- and accent-insensitive sort key for Latin names.
pub fn collation_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            'ý' | 'ÿ' => 'y',
            other => other,
        })
        .collect()
}

/// Locale-style comparison: folded key first, raw text as tie-break.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Clubs A–Z.
pub fn sort_clubs(clubs: &mut [Club]) {
    clubs.sort_by(|a, b| locale_cmp(&a.name, &b.name));
}

/// Players grouped by club name, then by "first last".
/// Unaffiliated players (and players whose club no longer exists) go last.
pub fn sort_players_by_club(players: &mut [Player], clubs: &ClubTable) {
    let club_name = |p: &Player| -> Option<String> {
        p.club().and_then(|id| clubs.get(id)).map(|c| c.name.clone())
    };

    players.sort_by(|a, b| {
        let by_club = match (club_name(a), club_name(b)) {
            (Some(x), Some(y)) => locale_cmp(&x, &y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_club.then_with(|| locale_cmp(&a.display_name(), &b.display_name()))
    });
}

/// Pick-list order for the match form and stats selector.
pub fn sort_players_by_last_name(players: &mut [Player]) {
    players.sort_by(|a, b| locale_cmp(&a.last_name, &b.last_name));
}
