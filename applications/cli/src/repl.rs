//! Interactive event loop
//!
//! One task owns the player. Each iteration handles exactly one of: an
//! engine event, an input line, or a clock tick, then prints whatever the
//! session queued. Nothing else touches the player, so commands and engine
//! callbacks never interleave.
//!
//! Engine events win ties, but after [`ENGINE_BURST`] of them in a row the
//! engine branch is disabled until input or the clock has had a turn.

use crate::commands::{self, ReplCommand, HELP};
use crate::engine::{EngineEvents, SimulatedEngine};
use crate::error::Result;
use crate::render;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use tunebox_playback::{Player, PlayerCommand};

/// Consecutive engine events handled before input is polled
pub const ENGINE_BURST: usize = 64;

/// Terminal player over a simulated engine
pub type TerminalPlayer = Player<SimulatedEngine>;

/// Run until `quit` or end of input
pub async fn run<R, W>(
    player: &mut TerminalPlayer,
    engine_events: &mut EngineEvents,
    tick: Duration,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut clock = tokio::time::interval(tick);
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let tick_secs = tick.as_secs_f64();
    let mut engine_streak = 0;

    player.drain_events();
    writeln!(out, "{}", render::track_list(&player.visible(), player.session().current_index()))?;
    writeln!(out, "type `help` for commands")?;

    loop {
        tokio::select! {
            biased;

            Some(event) = engine_events.recv(), if engine_streak < ENGINE_BURST => {
                engine_streak += 1;
                player.handle_engine_event(event);
            }

            line = lines.next_line() => {
                engine_streak = 0;
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                if !handle_line(player, &line, out)? {
                    break;
                }
            }

            _ = clock.tick() => {
                engine_streak = 0;
                player.session_mut().engine_mut().tick(tick_secs);
            }
        }

        print_events(player, out)?;
    }

    info!("Leaving interactive session");
    Ok(())
}

/// Apply one input line; `Ok(false)` ends the loop
pub fn handle_line<W: Write>(player: &mut TerminalPlayer, line: &str, out: &mut W) -> Result<bool> {
    let command = match commands::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(true),
        Err(err) => {
            writeln!(out, "error: {err}")?;
            return Ok(true);
        }
    };

    match command {
        ReplCommand::Player(command) => {
            let lists = matches!(command, PlayerCommand::SetQuery(_));
            if let Err(err) = player.apply(command) {
                writeln!(out, "error: {err}")?;
            }
            if lists {
                writeln!(out, "{}", render::track_list(&player.visible(), player.session().current_index()))?;
            }
        }
        ReplCommand::List => {
            writeln!(out, "{}", render::track_list(&player.visible(), player.session().current_index()))?;
        }
        ReplCommand::Status => writeln!(out, "{}", render::status(player))?,
        ReplCommand::Help => writeln!(out, "{HELP}")?,
        ReplCommand::Quit => return Ok(false),
    }

    Ok(true)
}

fn print_events<W: Write>(player: &mut TerminalPlayer, out: &mut W) -> Result<()> {
    for event in player.drain_events() {
        if let Some(message) = render::event(&event, player.catalog()) {
            writeln!(out, "{message}")?;
        }
    }
    Ok(())
}
