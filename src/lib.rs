//! # Backgammon
//!
//! Backgammon rules engine with an expectiminimax bot.
//!
//! ## Modules
//!
//! - [`backgammon`]: Board, dice, moves, rules and the move enumerator
//! - [`engine`]: Expectiminimax search over dice rolls
//! - [`game`]: Shared game state machine with change notifications
//! - [`strategy`]: Board heuristics used as evaluators
//! - [`bot`]: Search driven player running on its own thread
//! - [`judge`]: Bot against bot matches
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types
//! - [`misc`]: Small containers

pub mod backgammon;
pub mod bot;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod judge;
pub mod misc;
pub mod strategy;
