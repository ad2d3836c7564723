//! Tabletop judge - a turn-based card game rules engine
//!
//! Cards and players are entities composed of typed parts. Actions, costs
//! and effects are looked up by kind in handler registries and run by the
//! execution manager; the round judge drives the phase/turn state machine
//! and asks pluggable strategies for every decision.

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod handlers;
pub mod loader;
pub mod tournament;
pub mod zones;

pub use error::{Result, TabletopError};
