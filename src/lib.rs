//! # League Stats
//!
//! Dashboard and admin backend for a doubles tennis league.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, clubs, leagues, matches, stats)
//! - **calculate**: Winner determination, player statistics and rankings
//! - **storage**: Document store trait and its JSONL backend
//! - **league**: Snapshot loading and admin writes over the store
//! - **forms**: Validation of admin form input
//! - **auth**: Admin sign-in and session state
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod auth;
pub mod calculate;
pub mod config;
pub mod forms;
pub mod league;
pub mod models;
pub mod storage;

pub use models::*;
