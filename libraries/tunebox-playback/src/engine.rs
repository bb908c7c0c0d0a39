//! Media engine contract
//!
//! The session drives an opaque transport primitive (a browser audio
//! element, a native decoder, a simulated clock) through this trait and
//! observes it through `EngineEvent`s.
//!
//! `play` is the one asynchronous operation. Each call carries a
//! `PlayTicket`; when the engine cannot answer on the spot it returns
//! `PlayStart::Pending` and later reports `EngineEvent::PlayResolved` with the
//! same ticket. The session compares that ticket against the one it is still
//! waiting on and drops completions that a newer command has superseded.

use std::fmt;

/// Sequence number of a `play` request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayTicket(u64);

impl PlayTicket {
    /// Wrap a raw sequence number
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Raw sequence number
    pub fn seq(self) -> u64 {
        self.0
    }

    /// The ticket after this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for PlayTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immediate answer to a `play` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayStart {
    /// Audio started before `play` returned
    Started,

    /// Outcome arrives later as `EngineEvent::PlayResolved`
    Pending,

    /// Engine refused before `play` returned (e.g. autoplay policy)
    Rejected(String),
}

/// Deferred answer to a `play` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Audio started
    Started,

    /// Engine refused to start audio
    Rejected(String),
}

/// Signals raised by the media engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Periodic position report (seconds)
    TimeUpdate {
        /// Current position
        position: f64,
        /// Total duration, 0 or non-finite when unknown
        duration: f64,
    },

    /// Duration became known for the bound source
    LoadedMetadata {
        /// Total duration in seconds
        duration: f64,
    },

    /// The bound track played to its end
    Ended,

    /// Decode or network failure on the bound track
    Error {
        /// Engine-provided description
        reason: String,
    },

    /// Completion of a `play` that returned `PlayStart::Pending`
    PlayResolved {
        /// Ticket passed to the matching `play` call
        ticket: PlayTicket,
        /// Whether audio started
        outcome: PlayOutcome,
    },
}

/// Transport primitive driven by the playback session
///
/// Implementations must not call back into the session from inside these
/// methods; completions and progress are delivered as `EngineEvent`s on the
/// owner's event loop.
///
/// `TimeUpdate`, `LoadedMetadata`, `Ended` and `Error` carry no binding
/// token, so the session attributes them to whatever is bound now. Once
/// `bind` replaces a source, no further event for the old source may be
/// delivered, including ones already queued. A late `Ended` would otherwise
/// skip the newly selected track.
pub trait MediaEngine {
    /// Load an audio source, replacing whatever was bound before
    fn bind(&mut self, audio_url: &str);

    /// Start or resume audio on the bound source
    fn play(&mut self, ticket: PlayTicket) -> PlayStart;

    /// Pause audio; fire-and-forget
    fn pause(&mut self);

    /// Move the playhead; fire-and-forget
    fn seek(&mut self, seconds: f64);
}

impl<E: MediaEngine + ?Sized> MediaEngine for Box<E> {
    fn bind(&mut self, audio_url: &str) {
        (**self).bind(audio_url);
    }

    fn play(&mut self, ticket: PlayTicket) -> PlayStart {
        (**self).play(ticket)
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn seek(&mut self, seconds: f64) {
        (**self).seek(seconds);
    }
}

/// Engine that records every command, for unit tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingEngine {
    pub calls: Vec<EngineCall>,
    pub next_start: Option<PlayStart>,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EngineCall {
    Bind(String),
    Play(PlayTicket),
    Pause,
    Seek(f64),
}

#[cfg(test)]
impl RecordingEngine {
    pub fn plays(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, EngineCall::Play(_)))
            .count()
    }

    pub fn last_bound(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            EngineCall::Bind(url) => Some(url.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
impl MediaEngine for RecordingEngine {
    fn bind(&mut self, audio_url: &str) {
        self.calls.push(EngineCall::Bind(audio_url.to_string()));
    }

    fn play(&mut self, ticket: PlayTicket) -> PlayStart {
        self.calls.push(EngineCall::Play(ticket));
        self.next_start.take().unwrap_or(PlayStart::Started)
    }

    fn pause(&mut self) {
        self.calls.push(EngineCall::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.calls.push(EngineCall::Seek(seconds));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_are_ordered() {
        let first = PlayTicket::new(1);
        assert!(first.next() > first);
        assert_eq!(first.next().seq(), 2);
        assert_eq!(first.to_string(), "#1");
    }

    #[test]
    fn boxed_engine_forwards_calls() {
        let mut engine: Box<RecordingEngine> = Box::default();
        engine.bind("/a.mp3");
        assert_eq!(engine.play(PlayTicket::new(1)), PlayStart::Started);
        engine.seek(3.0);
        engine.pause();

        assert_eq!(
            engine.calls,
            vec![
                EngineCall::Bind("/a.mp3".to_string()),
                EngineCall::Play(PlayTicket::new(1)),
                EngineCall::Seek(3.0),
                EngineCall::Pause,
            ]
        );
    }
}
