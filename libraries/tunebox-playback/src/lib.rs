//! Tunebox - Playback Session
//!
//! Platform-agnostic playback control for Tunebox.
//!
//! This crate provides:
//! - Transport state machine (Stopped / Playing / Paused)
//! - Catalog navigation with wrap-around and restart-on-previous
//! - Shuffle (uniform, never repeats the current track) with history
//! - Repeat modes (Off, All, One)
//! - Seek with clamping to the known duration
//! - Stale-completion handling for asynchronous `play`
//! - Case-insensitive search view over the catalog
//!
//! # Architecture
//!
//! `tunebox-playback` never touches audio itself. The session drives a
//! [`MediaEngine`] (browser element, native decoder, simulated clock) and
//! reacts to the [`EngineEvent`]s the engine reports. Everything runs on the
//! owner's event loop, one event at a time.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use tunebox_core::{Track, TrackId};
//! use tunebox_playback::{
//!     MediaEngine, PlayStart, PlayTicket, Player, PlayerCommand, SessionConfig, TransportState,
//! };
//!
//! struct Silent;
//!
//! impl MediaEngine for Silent {
//!     fn bind(&mut self, _audio_url: &str) {}
//!     fn play(&mut self, _ticket: PlayTicket) -> PlayStart {
//!         PlayStart::Started
//!     }
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _seconds: f64) {}
//! }
//!
//! let mut player = Player::new(Silent, SessionConfig::default());
//! player
//!     .load_catalog(Ok(vec![
//!         Track::new(TrackId::new("1"), "Intro", "Band", "/uploads/1.mp3"),
//!         Track::new(TrackId::new("2"), "Outro", "Band", "/uploads/2.mp3"),
//!     ]))
//!     .unwrap();
//!
//! player.apply(PlayerCommand::Select(1)).unwrap();
//! assert_eq!(player.session().transport(), TransportState::Playing);
//!
//! player.apply(PlayerCommand::Next).unwrap();
//! assert_eq!(player.session().current_index(), Some(0));
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! # use tunebox_playback::{MediaEngine, PlayStart, PlayTicket};
//! # struct Silent;
//! # impl MediaEngine for Silent {
//! #     fn bind(&mut self, _: &str) {}
//! #     fn play(&mut self, _: PlayTicket) -> PlayStart { PlayStart::Started }
//! #     fn pause(&mut self) {}
//! #     fn seek(&mut self, _: f64) {}
//! # }
//! use tunebox_playback::{PlaybackSession, RepeatMode, SessionConfig};
//!
//! let mut session = PlaybackSession::new(Silent, SessionConfig::default());
//! session.set_shuffle(true);
//! assert_eq!(session.cycle_repeat(), RepeatMode::All);
//! ```

pub mod advance;
mod engine;
mod error;
mod events;
mod history;
mod player;
pub mod search;
mod session;
pub mod types;

// Public exports
pub use engine::{EngineEvent, MediaEngine, PlayOutcome, PlayStart, PlayTicket};
pub use error::{PlaybackError, Result};
pub use events::SessionEvent;
pub use history::History;
pub use player::{Player, PlayerCommand};
pub use search::{filter, SearchEntry, SearchView};
pub use session::PlaybackSession;
pub use types::{format_time, RepeatMode, SessionConfig, TransportState};
