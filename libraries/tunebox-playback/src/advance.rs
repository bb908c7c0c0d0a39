//! Track advance policy
//!
//! Pure index arithmetic for `next`, `previous`, and end-of-track handling.
//! The session feeds in its current state and acts on the returned target;
//! nothing here touches the engine.

use crate::types::RepeatMode;
use rand::Rng;

/// Outcome of an advance request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Select and play this catalog index
    Play(usize),

    /// End of queue reached: stop without changing the index
    Stop,

    /// Nothing to do (empty catalog)
    Idle,
}

/// Inputs to the advance policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceContext {
    /// Current catalog index
    pub current: Option<usize>,

    /// Catalog length
    pub len: usize,

    /// Shuffle flag
    pub shuffle: bool,

    /// Repeat mode
    pub repeat: RepeatMode,

    /// `true` for natural end-of-track, `false` for an explicit skip
    pub auto: bool,
}

/// Compute the target for `next()` (`auto == false`) or track end (`auto == true`)
///
/// Order of rules:
/// 1. Empty catalog → `Idle`
/// 2. Repeat-one on natural end → same index (explicit skips ignore repeat-one)
/// 3. Shuffle → uniform pick excluding the current index when `len > 1`
/// 4. Sequential → `(current + 1) % len`, except that a natural end of the
///    last track with repeat off stops instead of wrapping
pub fn next_target<R: Rng + ?Sized>(ctx: AdvanceContext, rng: &mut R) -> Advance {
    if ctx.len == 0 {
        return Advance::Idle;
    }

    let current = match ctx.current {
        Some(index) if index < ctx.len => index,
        // No usable index: start from the top
        _ => return Advance::Play(0),
    };

    if ctx.auto && ctx.repeat == RepeatMode::One {
        return Advance::Play(current);
    }

    if ctx.shuffle {
        return Advance::Play(shuffle_pick(current, ctx.len, rng));
    }

    if ctx.auto && ctx.repeat == RepeatMode::Off && current == ctx.len - 1 {
        return Advance::Stop;
    }

    Advance::Play((current + 1) % ctx.len)
}

/// Sequential target for `previous()`; always wraps backward
pub fn previous_target(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match current {
        Some(index) if index < len => Some((index + len - 1) % len),
        _ => Some(0),
    }
}

/// Uniform random index in `[0, len)` that differs from `current` when possible
///
/// Draws from the `len - 1` other slots directly, which gives the same
/// distribution as retrying until the draw differs.
fn shuffle_pick<R: Rng + ?Sized>(current: usize, len: usize, rng: &mut R) -> usize {
    if len <= 1 {
        return current;
    }

    let pick = rng.gen_range(0..len - 1);
    if pick >= current {
        pick + 1
    } else {
        pick
    }
}
