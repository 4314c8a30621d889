//! Recorded intent sequences for headless runs and determinism checks.

use std::path::Path;

use plumber_core::input::InputFrame;
use serde::{Deserialize, Serialize};

use crate::error::{read_json, LoadError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

/// One set of held intents, kept for `repeat` consecutive ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    #[serde(flatten)]
    pub input: InputFrame,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayFrame {
    pub fn new(input: InputFrame, repeat: u32) -> Self {
        Self { input, repeat }
    }
}

impl ReplaySequence {
    /// One input per tick. A zero repeat counts as one.
    pub fn expanded_inputs(&self) -> Vec<InputFrame> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame.input);
            }
        }
        out
    }

    pub fn tick_count(&self) -> usize {
        self.frames.iter().map(|frame| frame.repeat.max(1) as usize).sum()
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, LoadError> {
    let replay: ReplaySequence = read_json(path)?;
    validate_replay(&replay)?;
    log::info!(
        "Loaded replay {} ({} frames, {} ticks)",
        path.display(),
        replay.frames.len(),
        replay.tick_count()
    );
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), LoadError> {
    if replay.frames.is_empty() {
        return Err(LoadError::invalid("replay frames list is empty"));
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}
