//! Cue events for an audio host.
//!
//! Each cue fires on the tick the matching state transition happens. The
//! engine queues them; the host drains the queue whenever it likes.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Cue {
    Jump,
    Coin,
    Stomp,
    Kick,
    Bump,
    BrickBreak,
    PowerUpAppears,
    PowerUp,
    PowerDown,
    OneUp,
    Die,
    Flagpole,
    HurryUp,
    GameOver,
}
