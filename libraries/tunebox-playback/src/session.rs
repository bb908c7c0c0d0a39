//! Playback session - transport state machine
//!
//! Owns the selected catalog index, the transport state, shuffle/repeat
//! flags, and position/duration. Every mutation comes from one of two
//! places: a user command (`select`, `toggle_play`, `next`, ...) or an
//! engine event (`handle_engine_event`). Both run on the owner's event loop,
//! so the session needs no locking.

use crate::{
    advance::{self, Advance, AdvanceContext},
    engine::{EngineEvent, MediaEngine, PlayOutcome, PlayStart, PlayTicket},
    error::{PlaybackError, Result},
    events::SessionEvent,
    history::History,
    types::{RepeatMode, SessionConfig, TransportState},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};
use tunebox_core::{Catalog, Track, TrackId};

/// Transport state machine for one player instance
///
/// States are `Stopped`, `Playing`, and `Paused`; none is terminal.
/// - `select` → Playing (Paused if the engine rejects the start)
/// - `toggle_play` → Playing ↔ Paused
/// - `next` / track end → Playing, or Stopped at the end of the queue
///
/// Invariants:
/// - `current_index` is `None` exactly when the catalog is empty, and
///   `None` implies `Stopped`
/// - `Playing` implies the engine is bound to the current track and the
///   latest `play` is not known to have failed
pub struct PlaybackSession<E: MediaEngine> {
    // Catalog handle and position within it
    catalog: Catalog,
    current_index: Option<usize>,

    // Transport
    transport: TransportState,
    position: f64,
    duration: f64,

    // Modes
    shuffle: bool,
    repeat: RepeatMode,

    // Engine binding
    engine: E,
    bound: Option<TrackId>,
    next_ticket: PlayTicket,
    pending_play: Option<PlayTicket>,
    fault_streak: usize,

    // Navigation
    history: History,
    rng: StdRng,
    restart_threshold: f64,

    // Event queue for UI synchronization
    pending_events: Vec<SessionEvent>,
}

impl<E: MediaEngine> PlaybackSession<E> {
    /// Create a session with an empty catalog
    pub fn new(engine: E, config: SessionConfig) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            catalog: Catalog::empty(),
            current_index: None,
            transport: TransportState::Stopped,
            position: 0.0,
            duration: 0.0,
            shuffle: config.shuffle,
            repeat: config.repeat,
            engine,
            bound: None,
            next_ticket: PlayTicket::new(1),
            pending_play: None,
            fault_streak: 0,
            history: History::new(config.history_size),
            rng,
            restart_threshold: config.restart_threshold_secs,
            pending_events: Vec::new(),
        }
    }

    /// Create a session over an existing catalog
    pub fn with_catalog(engine: E, config: SessionConfig, catalog: Catalog) -> Self {
        let mut session = Self::new(engine, config);
        session.replace_catalog(catalog);
        session.pending_events.clear();
        session
    }

    // ===== State Queries =====

    /// Catalog the session addresses
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current catalog index
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Currently selected track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|index| self.catalog.get(index))
    }

    /// Transport state
    pub fn transport(&self) -> TransportState {
        self.transport
    }

    /// Shuffle flag
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Position in seconds
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Duration in seconds, 0 when unknown
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether a `play` is still waiting for its outcome
    pub fn is_play_pending(&self) -> bool {
        self.pending_play.is_some()
    }

    /// Ticket of the outstanding `play`, if any
    pub fn pending_ticket(&self) -> Option<PlayTicket> {
        self.pending_play
    }

    /// The driven engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The driven engine, mutably
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    // ===== Catalog =====

    /// Swap in a new catalog value
    ///
    /// The current index is re-derived by track id. If the current track is
    /// gone, the session stops on the first track of the new catalog.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        let current_id = self.current_track().map(|track| track.id.clone());
        self.catalog = catalog;
        let catalog = &self.catalog;
        self.history.retain(|id| catalog.contains(id));

        match current_id {
            Some(id) => {
                if let Some(index) = self.catalog.position_of(&id) {
                    if Some(index) != self.current_index {
                        debug!(track_id = %id, from = ?self.current_index, to = index, "Current track moved");
                    }
                    self.current_index = Some(index);
                } else {
                    warn!(track_id = %id, "Current track left the catalog, stopping");
                    self.reset_to_first(Some(id));
                }
            }
            None => self.reset_to_first(None),
        }

        self.emit(SessionEvent::CatalogChanged {
            len: self.catalog.len(),
            current_index: self.current_index,
        });
    }

    fn reset_to_first(&mut self, previous_track_id: Option<TrackId>) {
        if self.transport == TransportState::Playing {
            self.engine.pause();
        }
        self.pending_play = None;
        self.bound = None;
        self.position = 0.0;
        self.duration = 0.0;
        self.set_transport(TransportState::Stopped);

        self.current_index = if self.catalog.is_empty() {
            None
        } else {
            Some(0)
        };

        if let Some(track) = self.current_track() {
            let track_id = track.id.clone();
            self.emit(SessionEvent::TrackChanged {
                index: 0,
                track_id,
                previous_track_id,
            });
        }
    }

    // ===== Transport Commands =====

    /// Select a catalog index and start playing it
    ///
    /// # Errors
    /// `PlaybackError::InvalidIndex` when `index` is out of bounds; the
    /// session is left untouched.
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.fault_streak = 0;
        self.play_index(index, true)
    }

    /// Pause when playing, otherwise (re)start the current track
    ///
    /// From `Stopped` the engine is rebound so playback starts at the top of
    /// the track.
    pub fn toggle_play(&mut self) -> Result<()> {
        self.fault_streak = 0;
        match self.transport {
            TransportState::Playing => {
                self.pending_play = None;
                self.engine.pause();
                self.set_transport(TransportState::Paused);
                Ok(())
            }
            TransportState::Paused => {
                let track = self.current_track().cloned().ok_or(PlaybackError::NoTrackSelected)?;
                if self.bound.as_ref() != Some(&track.id) {
                    self.bind(&track);
                }
                self.issue_play();
                Ok(())
            }
            TransportState::Stopped => {
                let track = self.current_track().cloned().ok_or(PlaybackError::NoTrackSelected)?;
                self.bind(&track);
                self.position = 0.0;
                self.emit_position();
                self.issue_play();
                Ok(())
            }
        }
    }

    /// Seek within the current track
    ///
    /// The target is clamped to `[0, duration]` and applied to `position`
    /// immediately, without waiting for the engine.
    pub fn seek(&mut self, target_secs: f64) -> Result<()> {
        if self.current_index.is_none() {
            return Err(PlaybackError::NoTrackSelected);
        }

        let clamped = if target_secs.is_finite() {
            target_secs.clamp(0.0, self.duration)
        } else {
            0.0
        };

        self.engine.seek(clamped);
        self.position = clamped;
        self.emit_position();
        Ok(())
    }

    /// Skip to the next track
    ///
    /// Always wraps at the end of the catalog; repeat-one does not pin an
    /// explicit skip.
    pub fn next(&mut self) -> Result<()> {
        self.fault_streak = 0;
        self.advance(false)
    }

    /// Restart the current track, or go to the previous one
    ///
    /// Past the restart threshold (3 seconds by default) this seeks back to
    /// 0 on the same track. Otherwise it moves back one catalog position,
    /// wrapping to the last track. With shuffle on, the history of played
    /// tracks is walked first.
    pub fn previous(&mut self) -> Result<()> {
        let Some(current) = self.current_index else {
            return Ok(());
        };
        self.fault_streak = 0;

        if self.position > self.restart_threshold {
            debug!(position = self.position, "Restarting current track");
            self.engine.seek(0.0);
            self.position = 0.0;
            self.emit_position();
            return Ok(());
        }

        if self.shuffle {
            while let Some(id) = self.history.pop() {
                match self.catalog.position_of(&id) {
                    Some(index) if index != current => return self.play_index(index, false),
                    _ => continue,
                }
            }
        }

        match advance::previous_target(Some(current), self.catalog.len()) {
            Some(index) => self.play_index(index, false),
            None => Ok(()),
        }
    }

    /// Set the shuffle flag; no transport side effect
    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.shuffle != enabled {
            self.shuffle = enabled;
            self.emit_mode();
        }
    }

    /// Set the repeat mode; no transport side effect
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        if self.repeat != mode {
            self.repeat = mode;
            self.emit_mode();
        }
    }

    /// Advance Off → All → One → Off and return the new mode
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.set_repeat(self.repeat.cycle());
        self.repeat
    }

    // ===== Engine Events =====

    /// Apply one engine event
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::TimeUpdate { position, duration } => {
                self.on_engine_progress(position, duration);
            }
            EngineEvent::LoadedMetadata { duration } => self.on_loaded_metadata(duration),
            EngineEvent::Ended => self.on_engine_ended(),
            EngineEvent::Error { reason } => self.on_engine_error(reason),
            EngineEvent::PlayResolved { ticket, outcome } => self.on_play_resolved(ticket, outcome),
        }
    }

    /// Position/duration report; no transition
    pub fn on_engine_progress(&mut self, current_secs: f64, total_secs: f64) {
        if self.current_index.is_none() {
            return;
        }
        self.fault_streak = 0;

        self.duration = sanitize_duration(total_secs);
        self.position = clamp_position(current_secs, self.duration);
        self.emit_position();
    }

    /// Duration became known
    pub fn on_loaded_metadata(&mut self, duration_secs: f64) {
        if self.current_index.is_none() {
            return;
        }
        self.fault_streak = 0;

        self.duration = sanitize_duration(duration_secs);
        self.position = clamp_position(self.position, self.duration);
        self.emit_position();
    }

    /// Bound track reached its end
    pub fn on_engine_ended(&mut self) {
        if self.current_index.is_none() || self.transport == TransportState::Stopped {
            debug!("Ignoring end-of-track while stopped");
            return;
        }
        self.fault_streak = 0;

        // Ended events always come from the engine, never from user input
        if let Err(err) = self.advance(true) {
            warn!(error = %err, "Auto-advance failed");
        }
    }

    /// Bound track failed to decode or load
    ///
    /// Handled like a natural end, with two exceptions where advancing
    /// would retry broken sources forever; there the session stops:
    /// - repeat-one, which would replay the same source
    /// - a run of faults as long as the catalog with no progress report or
    ///   user command in between, meaning no track can play
    pub fn on_engine_error(&mut self, reason: String) {
        if self.current_index.is_none() {
            return;
        }

        warn!(reason = %reason, track_id = ?self.current_track().map(|t| t.id.as_str()), "Engine fault");
        self.emit(SessionEvent::EngineFault {
            reason: reason.clone(),
        });
        self.fault_streak += 1;

        if self.repeat == RepeatMode::One {
            self.halt();
            return;
        }

        if self.transport == TransportState::Stopped {
            return;
        }

        if self.fault_streak >= self.catalog.len() {
            warn!(faults = self.fault_streak, "No playable track left, stopping");
            self.halt();
            return;
        }

        if let Err(err) = self.advance(true) {
            warn!(error = %err, "Advance after engine fault failed");
        }
    }

    /// Deferred `play` outcome
    ///
    /// Only the outstanding ticket is honoured; anything else was superseded
    /// by a later `select`, `toggle_play`, or advance and is dropped.
    pub fn on_play_resolved(&mut self, ticket: PlayTicket, outcome: PlayOutcome) {
        if self.pending_play != Some(ticket) {
            debug!(ticket = %ticket, outstanding = ?self.pending_play, "Dropping stale play completion");
            return;
        }

        self.pending_play = None;
        match outcome {
            PlayOutcome::Started => debug!(ticket = %ticket, "Play confirmed"),
            PlayOutcome::Rejected(reason) => self.reject_play(reason),
        }
    }

    // ===== Events =====

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Whether events are waiting to be drained
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    fn advance(&mut self, auto: bool) -> Result<()> {
        let ctx = AdvanceContext {
            current: self.current_index,
            len: self.catalog.len(),
            shuffle: self.shuffle,
            repeat: self.repeat,
            auto,
        };

        match advance::next_target(ctx, &mut self.rng) {
            Advance::Idle => {
                debug!("Advance on empty catalog");
                Ok(())
            }
            Advance::Stop => {
                self.stop_at_end();
                Ok(())
            }
            Advance::Play(index) => self.play_index(index, true),
        }
    }

    fn play_index(&mut self, index: usize, record_history: bool) -> Result<()> {
        let track = self
            .catalog
            .get(index)
            .cloned()
            .ok_or(PlaybackError::InvalidIndex {
                index,
                len: self.catalog.len(),
            })?;

        let previous_track_id = self.current_track().map(|t| t.id.clone());
        if record_history {
            if let Some(id) = previous_track_id.as_ref().filter(|id| **id != track.id) {
                self.history.push(id.clone());
            }
        }

        self.current_index = Some(index);
        self.position = 0.0;
        self.duration = 0.0;

        if previous_track_id.as_ref() != Some(&track.id) {
            debug!(index, track_id = %track.id, title = %track.title, "Track selected");
            self.emit(SessionEvent::TrackChanged {
                index,
                track_id: track.id.clone(),
                previous_track_id,
            });
        }

        self.bind(&track);
        self.emit_position();
        self.issue_play();
        Ok(())
    }

    fn bind(&mut self, track: &Track) {
        self.engine.bind(&track.audio_url);
        self.bound = Some(track.id.clone());
    }

    fn issue_play(&mut self) {
        let ticket = self.next_ticket;
        self.next_ticket = ticket.next();
        self.pending_play = Some(ticket);
        self.set_transport(TransportState::Playing);

        match self.engine.play(ticket) {
            PlayStart::Started => self.pending_play = None,
            PlayStart::Pending => debug!(ticket = %ticket, "Play pending"),
            PlayStart::Rejected(reason) => {
                self.pending_play = None;
                self.reject_play(reason);
            }
        }
    }

    fn reject_play(&mut self, reason: String) {
        warn!(reason = %reason, index = ?self.current_index, "Playback rejected");
        self.set_transport(TransportState::Paused);
        self.emit(SessionEvent::PlaybackRejected { reason });
    }

    fn halt(&mut self) {
        self.pending_play = None;
        self.position = 0.0;
        self.set_transport(TransportState::Stopped);
        self.emit_position();
    }

    fn stop_at_end(&mut self) {
        debug!(index = ?self.current_index, "End of queue");
        self.pending_play = None;
        self.position = 0.0;
        self.set_transport(TransportState::Stopped);
        self.emit_position();
        self.emit(SessionEvent::QueueEnded);
    }

    fn set_transport(&mut self, state: TransportState) {
        if self.transport != state {
            debug!(from = ?self.transport, to = ?state, "Transport changed");
            self.transport = state;
            self.emit(SessionEvent::StateChanged { state });
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        self.pending_events.push(event);
    }

    fn emit_position(&mut self) {
        self.emit(SessionEvent::PositionChanged {
            position: self.position,
            duration: self.duration,
        });
    }

    fn emit_mode(&mut self) {
        self.emit(SessionEvent::ModeChanged {
            shuffle: self.shuffle,
            repeat: self.repeat,
        });
    }
}

fn sanitize_duration(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}

fn clamp_position(secs: f64, duration: f64) -> f64 {
    if !secs.is_finite() || secs < 0.0 {
        return 0.0;
    }
    if duration > 0.0 {
        secs.min(duration)
    } else {
        secs
    }
}
