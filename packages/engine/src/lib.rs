//! Orchestration engine for live two-player, clock-driven board matches.
//!
//! The engine owns matchmaking queues, the match lifecycle, turn and clock
//! accounting, and notification fan-out. Storage and delivery transports
//! stay behind the repository traits in [`repositories`], with in-memory
//! implementations provided for embedding and tests.

pub mod models;
pub mod repositories;
pub mod services;
