//! Simulated media engine
//!
//! Stands in for an audio element: it keeps a playhead that the event loop
//! advances with [`SimulatedEngine::tick`], and reports back through an
//! unbounded channel exactly like a real engine's callbacks would. `play`
//! always answers `Pending`; the outcome follows on the channel.
//!
//! Every `bind` starts a new generation. Events still queued from an earlier
//! generation are dropped by [`EngineEvents`] instead of reaching the session.

use crate::config::EngineSettings;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};
use tunebox_playback::{EngineEvent, MediaEngine, PlayOutcome, PlayStart, PlayTicket};

const PLAYABLE_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "aac", "flac", "opus"];

/// Receiving half of a simulated engine's event stream
pub struct EngineEvents {
    rx: mpsc::UnboundedReceiver<(u64, EngineEvent)>,
    generation: Arc<AtomicU64>,
}

impl EngineEvents {
    /// Next event for the currently bound source
    ///
    /// Cancel safe: an event is either returned or was stale and dropped.
    pub async fn recv(&mut self) -> Option<EngineEvent> {
        loop {
            let (generation, event) = self.rx.recv().await?;
            if let Some(event) = self.current(generation, event) {
                return Some(event);
            }
        }
    }

    /// Next queued event, without waiting
    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        loop {
            let (generation, event) = self.rx.try_recv().ok()?;
            if let Some(event) = self.current(generation, event) {
                return Some(event);
            }
        }
    }

    fn current(&self, generation: u64, event: EngineEvent) -> Option<EngineEvent> {
        if generation == self.generation.load(Ordering::Acquire) {
            Some(event)
        } else {
            trace!(generation, ?event, "Dropping event from replaced source");
            None
        }
    }
}

/// Clock-driven engine with a fixed track length
pub struct SimulatedEngine {
    events: mpsc::UnboundedSender<(u64, EngineEvent)>,
    generation: Arc<AtomicU64>,
    track_secs: f64,
    allow_play: bool,

    source: Option<String>,
    playing: bool,
    position: f64,
    metadata_sent: bool,
}

impl SimulatedEngine {
    /// Create an engine and the receiver its events arrive on
    pub fn new(settings: &EngineSettings) -> (Self, EngineEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));
        let engine = Self {
            events: tx,
            generation: Arc::clone(&generation),
            track_secs: settings.track_secs,
            allow_play: settings.allow_play,
            source: None,
            playing: false,
            position: 0.0,
            metadata_sent: false,
        };
        (engine, EngineEvents { rx, generation })
    }

    /// Whether the playhead is moving
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Currently bound source
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Advance the playhead by `elapsed_secs`
    pub fn tick(&mut self, elapsed_secs: f64) {
        if !self.playing {
            return;
        }

        if !self.metadata_sent {
            self.metadata_sent = true;
            self.send(EngineEvent::LoadedMetadata {
                duration: self.track_secs,
            });
        }

        self.position = (self.position + elapsed_secs).min(self.track_secs);
        self.send(EngineEvent::TimeUpdate {
            position: self.position,
            duration: self.track_secs,
        });

        if self.position >= self.track_secs {
            trace!(source = ?self.source, "Simulated track ended");
            self.playing = false;
            self.send(EngineEvent::Ended);
        }
    }

    fn send(&self, event: EngineEvent) {
        let generation = self.generation.load(Ordering::Acquire);
        // The receiver only goes away when the event loop is shutting down
        let _ = self.events.send((generation, event));
    }
}

impl MediaEngine for SimulatedEngine {
    fn bind(&mut self, audio_url: &str) {
        debug!(url = %audio_url, "Binding source");
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.source = Some(audio_url.to_string());
        self.playing = false;
        self.position = 0.0;
        self.metadata_sent = false;
    }

    fn play(&mut self, ticket: PlayTicket) -> PlayStart {
        let Some(source) = self.source.as_deref() else {
            return PlayStart::Rejected("no source bound".to_string());
        };

        if !is_playable(source) {
            let reason = format!("unsupported source: {source}");
            self.send(EngineEvent::PlayResolved {
                ticket,
                outcome: PlayOutcome::Started,
            });
            self.send(EngineEvent::Error { reason });
            return PlayStart::Pending;
        }

        let outcome = if self.allow_play {
            self.playing = true;
            PlayOutcome::Started
        } else {
            PlayOutcome::Rejected("play() blocked by autoplay policy".to_string())
        };

        self.send(EngineEvent::PlayResolved { ticket, outcome });
        PlayStart::Pending
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds.clamp(0.0, self.track_secs);
    }
}

fn is_playable(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| PLAYABLE_EXTENSIONS.contains(&ext.as_str()))
}
