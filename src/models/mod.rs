//! Core data models for the league.

mod club;
mod ids;
mod league;
mod match_record;
mod player;
mod stats;

pub use club::*;
pub use ids::*;
pub use league::*;
pub use match_record::*;
pub use player::*;
pub use stats::*;
