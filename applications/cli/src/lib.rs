//! Tunebox terminal player
//!
//! Library half of the `tunebox` binary: configuration, a simulated media
//! engine, command parsing, rendering, and the interactive loop.

pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod render;
pub mod repl;

pub use config::CliConfig;
pub use engine::{EngineEvents, SimulatedEngine};
pub use error::{CliError, Result};
