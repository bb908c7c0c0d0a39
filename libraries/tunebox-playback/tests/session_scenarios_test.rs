//! Scenario tests for the playback session
//!
//! Each test walks a real listening workflow against a scripted engine and
//! checks the state the UI would render afterwards.

use tunebox_core::{Catalog, Track, TrackId};
use tunebox_playback::{
    EngineEvent, MediaEngine, PlayOutcome, PlayStart, PlayTicket, PlaybackSession, RepeatMode,
    SessionConfig, SessionEvent, TransportState,
};

// ===== Test Helpers =====

/// Engine whose `play` answers are scripted per call
#[derive(Debug, Default)]
struct ScriptedEngine {
    bound: Vec<String>,
    tickets: Vec<PlayTicket>,
    seeks: Vec<f64>,
    pauses: usize,
    /// Answer for every `play`; `Started` when unset
    answer: Option<PlayStart>,
}

impl ScriptedEngine {
    fn deferred() -> Self {
        Self {
            answer: Some(PlayStart::Pending),
            ..Default::default()
        }
    }

    fn last_ticket(&self) -> PlayTicket {
        *self.tickets.last().expect("no play issued")
    }
}

impl MediaEngine for ScriptedEngine {
    fn bind(&mut self, audio_url: &str) {
        self.bound.push(audio_url.to_string());
    }

    fn play(&mut self, ticket: PlayTicket) -> PlayStart {
        self.tickets.push(ticket);
        self.answer.clone().unwrap_or(PlayStart::Started)
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn seek(&mut self, seconds: f64) {
        self.seeks.push(seconds);
    }
}

fn abc() -> Catalog {
    Catalog::new(
        ["A", "B", "C"]
            .iter()
            .map(|id| {
                Track::new(
                    TrackId::new(*id),
                    format!("Track {id}"),
                    "Band",
                    format!("/uploads/{id}.mp3"),
                )
            })
            .collect(),
    )
    .unwrap()
}

fn session_with(engine: ScriptedEngine, repeat: RepeatMode) -> PlaybackSession<ScriptedEngine> {
    let config = SessionConfig {
        repeat,
        shuffle_seed: Some(1234),
        ..Default::default()
    };
    PlaybackSession::with_catalog(engine, config, abc())
}

// ===== End of Track =====

#[test]
fn last_track_ending_with_repeat_off_stops_in_place() {
    let mut session = session_with(ScriptedEngine::default(), RepeatMode::Off);
    session.select(2).unwrap();
    session.on_engine_progress(200.0, 200.0);
    let plays = session.engine().tickets.len();

    session.handle_engine_event(EngineEvent::Ended);

    assert_eq!(session.transport(), TransportState::Stopped);
    assert_eq!(session.current_index(), Some(2));
    assert_eq!(session.position(), 0.0);
    assert_eq!(session.engine().tickets.len(), plays, "no play after queue end");
    assert!(session.drain_events().contains(&SessionEvent::QueueEnded));
}

#[test]
fn last_track_ending_with_repeat_all_wraps_to_first() {
    let mut session = session_with(ScriptedEngine::default(), RepeatMode::All);
    session.select(2).unwrap();

    session.handle_engine_event(EngineEvent::Ended);

    assert_eq!(session.current_index(), Some(0));
    assert_eq!(session.transport(), TransportState::Playing);
    assert_eq!(session.engine().bound.last().unwrap(), "/uploads/A.mp3");
}

#[test]
fn repeat_one_replays_same_track_on_end() {
    let mut session = session_with(ScriptedEngine::default(), RepeatMode::One);
    session.select(1).unwrap();
    let plays = session.engine().tickets.len();

    session.handle_engine_event(EngineEvent::Ended);

    assert_eq!(session.current_index(), Some(1));
    assert_eq!(session.transport(), TransportState::Playing);
    assert_eq!(session.engine().tickets.len(), plays + 1);
    assert_eq!(session.engine().bound.last().unwrap(), "/uploads/B.mp3");
}

#[test]
fn repeat_one_ignores_shuffle_on_natural_end() {
    let mut session = session_with(ScriptedEngine::default(), RepeatMode::One);
    session.set_shuffle(true);
    session.select(0).unwrap();

    for _ in 0..10 {
        session.on_engine_ended();
        assert_eq!(session.current_index(), Some(0));
    }
}

#[test]
fn manual_next_under_repeat_one_still_advances() {
    let mut session = session_with(ScriptedEngine::default(), RepeatMode::One);
    session.select(1).unwrap();

    session.next().unwrap();

    assert_eq!(session.current_index(), Some(2));
}

#[test]
fn manual_next_wraps_with_repeat_off() {
    let mut session = session_with(ScriptedEngine::default(), RepeatMode::Off);
    session.select(2).unwrap();

    session.next().unwrap();

    assert_eq!(session.current_index(), Some(0));
    assert_eq!(session.transport(), TransportState::Playing);
}

#[test]
fn stopped_session_restarts_from_toggle() {
    let mut session = session_with(ScriptedEngine::default(), RepeatMode::Off);
    session.select(2).unwrap();
    session.on_engine_ended();
    assert_eq!(session.transport(), TransportState::Stopped);

    session.toggle_play().unwrap();

    assert_eq!(session.transport(), TransportState::Playing);
    assert_eq!(session.current_index(), Some(2));
    assert_eq!(session.engine().bound.last().unwrap(), "/uploads/C.mp3");
}

// ===== Play Rejection =====

#[test]
fn immediate_rejection_on_select_ends_paused() {
    let engine = ScriptedEngine {
        answer: Some(PlayStart::Rejected("NotAllowedError".into())),
        ..Default::default()
    };
    let mut session = session_with(engine, RepeatMode::Off);

    session.select(1).unwrap();

    assert_eq!(session.current_index(), Some(1));
    assert_eq!(session.transport(), TransportState::Paused);
}

#[test]
fn deferred_rejection_reverts_to_paused_keeping_position() {
    let mut session = session_with(ScriptedEngine::deferred(), RepeatMode::Off);
    session.select(1).unwrap();
    assert_eq!(session.transport(), TransportState::Playing);
    assert!(session.is_play_pending());

    session.on_engine_progress(1.5, 90.0);
    let ticket = session.engine().last_ticket();
    session.handle_engine_event(EngineEvent::PlayResolved {
        ticket,
        outcome: PlayOutcome::Rejected("autoplay".into()),
    });

    assert_eq!(session.transport(), TransportState::Paused);
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(session.position(), 1.5);
    assert!(!session.is_play_pending());
}

#[test]
fn superseded_rejection_is_ignored() {
    let mut session = session_with(ScriptedEngine::deferred(), RepeatMode::Off);
    session.select(0).unwrap();
    let stale = session.engine().last_ticket();

    session.select(2).unwrap();
    session.on_play_resolved(stale, PlayOutcome::Rejected("late".into()));

    assert_eq!(session.current_index(), Some(2));
    assert_eq!(session.transport(), TransportState::Playing);
    assert!(session.is_play_pending());
}

#[test]
fn completion_after_pause_does_not_resume() {
    let mut session = session_with(ScriptedEngine::deferred(), RepeatMode::Off);
    session.select(0).unwrap();
    let ticket = session.engine().last_ticket();

    session.toggle_play().unwrap();
    session.on_play_resolved(ticket, PlayOutcome::Rejected("aborted".into()));
    assert_eq!(session.transport(), TransportState::Paused);

    session.on_play_resolved(ticket, PlayOutcome::Started);
    assert_eq!(session.transport(), TransportState::Paused);
}

#[test]
fn successful_completion_clears_pending() {
    let mut session = session_with(ScriptedEngine::deferred(), RepeatMode::Off);
    session.select(0).unwrap();
    let ticket = session.engine().last_ticket();

    session.on_play_resolved(ticket, PlayOutcome::Started);

    assert!(!session.is_play_pending());
    assert_eq!(session.transport(), TransportState::Playing);
}

// ===== Previous =====

#[test]
fn previous_restart_threshold_is_exclusive() {
    let mut session = session_with(ScriptedEngine::default(), RepeatMode::Off);
    session.select(1).unwrap();

    session.on_engine_progress(3.01, 120.0);
    session.previous().unwrap();
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(session.position(), 0.0);
    assert_eq!(session.engine().seeks.last(), Some(&0.0));

    session.on_engine_progress(3.0, 120.0);
    session.previous().unwrap();
    assert_eq!(session.current_index(), Some(0));
}

#[test]
fn previous_on_empty_session_is_a_no_op() {
    let mut session = PlaybackSession::new(ScriptedEngine::default(), SessionConfig::default());
    session.previous().unwrap();
    session.next().unwrap();
    assert_eq!(session.current_index(), None);
    assert!(session.engine().tickets.is_empty());
}

// ===== Engine Faults =====

#[test]
fn fault_on_last_track_with_repeat_off_stops() {
    let mut session = session_with(ScriptedEngine::default(), RepeatMode::Off);
    session.select(2).unwrap();

    session.handle_engine_event(EngineEvent::Error {
        reason: "MEDIA_ERR_SRC_NOT_SUPPORTED".into(),
    });

    assert_eq!(session.transport(), TransportState::Stopped);
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::EngineFault {
        reason: "MEDIA_ERR_SRC_NOT_SUPPORTED".into()
    }));
}

#[test]
fn fault_under_repeat_one_does_not_retry() {
    let mut session = session_with(ScriptedEngine::default(), RepeatMode::One);
    session.select(0).unwrap();
    let plays = session.engine().tickets.len();

    session.on_engine_error("network".into());
    session.on_engine_error("network".into());

    assert_eq!(session.transport(), TransportState::Stopped);
    assert_eq!(session.engine().tickets.len(), plays);
}

// ===== Catalog Growth =====

#[test]
fn upload_during_playback_keeps_playing_same_track() {
    let mut session = session_with(ScriptedEngine::default(), RepeatMode::Off);
    session.select(2).unwrap();
    session.on_engine_progress(40.0, 180.0);

    let grown = session
        .catalog()
        .with_prepended(Track::new(TrackId::new("D"), "New", "Me", "/uploads/D.mp3"))
        .unwrap();
    session.replace_catalog(grown);

    assert_eq!(session.current_index(), Some(3));
    assert_eq!(session.current_track().unwrap().id.as_str(), "C");
    assert_eq!(session.position(), 40.0);
    assert_eq!(session.transport(), TransportState::Playing);

    // C is now last, so its natural end stops the queue
    session.on_engine_ended();
    assert_eq!(session.transport(), TransportState::Stopped);
    assert_eq!(session.current_index(), Some(3));
}

#[test]
fn events_describe_a_track_change() {
    let mut session = session_with(ScriptedEngine::default(), RepeatMode::Off);
    session.drain_events();

    session.select(1).unwrap();

    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::TrackChanged {
        index: 1,
        track_id: TrackId::new("B"),
        previous_track_id: Some(TrackId::new("A")),
    }));
    assert!(events.contains(&SessionEvent::StateChanged {
        state: TransportState::Playing
    }));
    assert!(!session.has_pending_events());
}
