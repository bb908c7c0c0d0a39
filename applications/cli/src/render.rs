//! Text rendering for the terminal player

use tunebox_core::Catalog;
use tunebox_playback::{
    format_time, MediaEngine, Player, RepeatMode, SearchView, SessionEvent, TransportState,
};

/// Numbered listing of a view, marking the current track
pub fn track_list(view: &SearchView<'_>, current: Option<usize>) -> String {
    if view.is_empty() {
        return "  (no tracks)".to_string();
    }

    view.iter()
        .enumerate()
        .map(|(position, entry)| {
            let marker = if Some(entry.original_index) == current {
                '>'
            } else {
                ' '
            };
            format!(
                "{marker} {:>3}. {} - {}",
                position + 1,
                entry.track.title,
                entry.track.artist
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line transport summary
pub fn status<E: MediaEngine>(player: &Player<E>) -> String {
    let session = player.session();
    let track = session
        .current_track()
        .map_or_else(|| "nothing selected".to_string(), |t| format!("{} - {}", t.title, t.artist));

    format!(
        "[{}] {}  {} / {}  shuffle:{} repeat:{}",
        transport_label(session.transport()),
        track,
        format_time(session.position()),
        format_time(session.duration()),
        if session.shuffle() { "on" } else { "off" },
        repeat_label(session.repeat()),
    )
}

/// Message for a session event, if it deserves one
///
/// Position updates are too chatty for a line-oriented terminal and are
/// left to `status`.
pub fn event(event: &SessionEvent, catalog: &Catalog) -> Option<String> {
    match event {
        SessionEvent::StateChanged { state } => Some(format!("-- {}", transport_label(*state))),
        SessionEvent::TrackChanged { index, .. } => catalog
            .get(*index)
            .map(|track| format!("-- now: {} - {}", track.title, track.artist)),
        SessionEvent::ModeChanged { shuffle, repeat } => Some(format!(
            "-- shuffle:{} repeat:{}",
            if *shuffle { "on" } else { "off" },
            repeat_label(*repeat)
        )),
        SessionEvent::PlaybackRejected { reason } => {
            Some(format!("-- playback blocked ({reason}); `toggle` to retry"))
        }
        SessionEvent::EngineFault { reason } => Some(format!("-- cannot play track: {reason}")),
        SessionEvent::QueueEnded => Some("-- end of queue".to_string()),
        SessionEvent::CatalogChanged { len, .. } => Some(format!("-- catalog: {len} tracks")),
        SessionEvent::PositionChanged { .. } => None,
    }
}

fn transport_label(state: TransportState) -> &'static str {
    match state {
        TransportState::Stopped => "stopped",
        TransportState::Playing => "playing",
        TransportState::Paused => "paused",
    }
}

fn repeat_label(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "off",
        RepeatMode::All => "all",
        RepeatMode::One => "one",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunebox_core::{Track, TrackId};
    use tunebox_playback::filter;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Track::new(TrackId::new("1"), "Blue Monday", "New Order", "/1.mp3"),
            Track::new(TrackId::new("2"), "So What", "Miles Davis", "/2.mp3"),
        ])
        .unwrap()
    }

    #[test]
    fn list_numbers_follow_the_view() {
        let catalog = catalog();
        let view = filter(&catalog, "miles");
        assert_eq!(track_list(&view, Some(1)), ">   1. So What - Miles Davis");
    }

    #[test]
    fn empty_view_says_so() {
        let catalog = catalog();
        assert_eq!(track_list(&filter(&catalog, "zzz"), None), "  (no tracks)");
    }

    #[test]
    fn position_updates_are_quiet() {
        let catalog = catalog();
        let update = SessionEvent::PositionChanged {
            position: 1.0,
            duration: 2.0,
        };
        assert_eq!(event(&update, &catalog), None);
        assert_eq!(
            event(&SessionEvent::QueueEnded, &catalog).as_deref(),
            Some("-- end of queue")
        );
    }
}
