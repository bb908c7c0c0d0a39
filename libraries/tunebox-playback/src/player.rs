//! Player facade
//!
//! Ties the catalog, the search query, and the playback session together so
//! a front end has one value to drive. All user intents go through
//! [`Player::apply`]; all engine signals go through
//! [`Player::handle_engine_event`].

use crate::{
    engine::{EngineEvent, MediaEngine},
    error::{PlaybackError, Result},
    events::SessionEvent,
    search::{self, SearchView},
    session::PlaybackSession,
    types::SessionConfig,
};
use tracing::{info, warn};
use tunebox_core::{Catalog, CatalogSource, CoreError, Track};

/// User intents accepted by the player
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Play a catalog index
    Select(usize),
    /// Play the track at a position in the filtered view
    SelectVisible(usize),
    /// Skip forward
    Next,
    /// Restart or skip back
    Previous,
    /// Pause/resume
    TogglePlay,
    /// Turn shuffle on or off
    SetShuffle(bool),
    /// Advance the repeat mode
    CycleRepeat,
    /// Seek to seconds
    SeekTo(f64),
    /// Replace the search query
    SetQuery(String),
}

/// Catalog + search query + playback session
pub struct Player<E: MediaEngine> {
    catalog: Catalog,
    query: String,
    session: PlaybackSession<E>,
}

impl<E: MediaEngine> Player<E> {
    /// Create a player with an empty catalog
    pub fn new(engine: E, config: SessionConfig) -> Self {
        Self {
            catalog: Catalog::empty(),
            query: String::new(),
            session: PlaybackSession::new(engine, config),
        }
    }

    /// Install the result of a catalog fetch
    ///
    /// A failed fetch leaves the player with an empty catalog and returns
    /// `PlaybackError::CatalogUnavailable`; the player stays usable.
    pub fn load_catalog(&mut self, fetched: std::result::Result<Vec<Track>, CoreError>) -> Result<()> {
        match fetched {
            Ok(tracks) => {
                let catalog = Catalog::dedup(tracks);
                info!(tracks = catalog.len(), "Catalog loaded");
                self.install(catalog);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Catalog unavailable, continuing with an empty catalog");
                self.install(Catalog::empty());
                Err(PlaybackError::CatalogUnavailable(err.to_string()))
            }
        }
    }

    /// Fetch from a source and install the result
    pub async fn load_from(&mut self, source: &dyn CatalogSource) -> Result<()> {
        let fetched = source.fetch_catalog().await;
        self.load_catalog(fetched)
    }

    /// Prepend a freshly uploaded track
    ///
    /// The current selection keeps pointing at the same track.
    pub fn append_track(&mut self, track: Track) -> Result<()> {
        let catalog = self.catalog.with_prepended(track)?;
        self.install(catalog);
        Ok(())
    }

    fn install(&mut self, catalog: Catalog) {
        self.catalog = catalog.clone();
        self.session.replace_catalog(catalog);
    }

    /// Dispatch one user command
    pub fn apply(&mut self, command: PlayerCommand) -> Result<()> {
        match command {
            PlayerCommand::Select(index) => self.session.select(index),
            PlayerCommand::SelectVisible(position) => self.select_visible(position),
            PlayerCommand::Next => self.session.next(),
            PlayerCommand::Previous => self.session.previous(),
            PlayerCommand::TogglePlay => self.session.toggle_play(),
            PlayerCommand::SetShuffle(enabled) => {
                self.session.set_shuffle(enabled);
                Ok(())
            }
            PlayerCommand::CycleRepeat => {
                self.session.cycle_repeat();
                Ok(())
            }
            PlayerCommand::SeekTo(seconds) => self.session.seek(seconds),
            PlayerCommand::SetQuery(query) => {
                self.set_query(query);
                Ok(())
            }
        }
    }

    /// Forward an engine signal to the session
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        self.session.handle_engine_event(event);
    }

    /// Play the track at `position` within the filtered view
    pub fn select_visible(&mut self, position: usize) -> Result<()> {
        let view = self.visible();
        let len = view.len();
        let index = view
            .resolve(position)
            .ok_or(PlaybackError::InvalidIndex { index: position, len })?;
        self.session.select(index)
    }

    /// Filtered view for the current query
    pub fn visible(&self) -> SearchView<'_> {
        search::filter(&self.catalog, &self.query)
    }

    /// Current query text
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the query; selection and playback are unaffected
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Current catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Playback session
    pub fn session(&self) -> &PlaybackSession<E> {
        &self.session
    }

    /// Playback session, mutably
    pub fn session_mut(&mut self) -> &mut PlaybackSession<E> {
        &mut self.session
    }

    /// Take queued session events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.session.drain_events()
    }
}
