//! Session events
//!
//! Event-based communication for UI synchronization. The session queues
//! events as it mutates and the UI drains them once per loop iteration:
//! - Transport changes (play/pause/stop)
//! - Track changes (new catalog index)
//! - Position updates from the engine
//! - Mode changes (shuffle/repeat)
//! - Failures that were recovered into a transport state

use crate::types::{RepeatMode, TransportState};
use serde::{Deserialize, Serialize};
use tunebox_core::TrackId;

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Transport state changed
    StateChanged {
        /// The new transport state
        state: TransportState,
    },

    /// A different track became current
    TrackChanged {
        /// Catalog index of the new track
        index: usize,
        /// ID of the new track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Position or duration update
    PositionChanged {
        /// Current position in seconds
        position: f64,
        /// Duration in seconds, 0 when unknown
        duration: f64,
    },

    /// Shuffle or repeat changed
    ModeChanged {
        /// Shuffle flag
        shuffle: bool,
        /// Repeat mode
        repeat: RepeatMode,
    },

    /// Engine refused to start; transport reverted to Paused
    PlaybackRejected {
        /// Engine-provided reason
        reason: String,
    },

    /// Engine reported a fault on the bound track
    EngineFault {
        /// Engine-provided reason
        reason: String,
    },

    /// Last track ended with repeat off
    QueueEnded,

    /// Catalog replaced or grown
    CatalogChanged {
        /// New catalog length
        len: usize,
        /// Current index after re-derivation
        current_index: Option<usize>,
    },
}
