//! Host-facing building blocks shared by the simulation and whatever drives it.
//!
//! Nothing in here knows about tiles or enemies: `input` turns host key events
//! into the eight intents the simulation reads, and `time` slices wall-clock
//! time into fixed simulation ticks.

pub mod input;
pub mod time;
