//! The eight intents and the tracker that turns them into press edges.
//!
//! Hosts map their raw keys (keyboard, gamepad, replay file) onto
//! [`Button`]s and hand the engine one [`InputFrame`] per tick; no key
//! identity ever reaches the simulation.
//!
//! [`InputState`] keeps the held set plus the edges of the latest
//! `apply_frame`. The engine applies each tick's frame and calls
//! `end_frame()` once the tick is done, so "just pressed" means pressed on
//! this tick and not on the previous one. Menu transitions read those
//! edges; holding Start does not retrigger them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Run,
    Start,
    Select,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
        Button::Jump,
        Button::Run,
        Button::Start,
        Button::Select,
    ];
}

/// The intents observed during one simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub run: bool,
    pub start: bool,
    pub select: bool,
}

impl InputFrame {
    pub fn is_down(&self, button: Button) -> bool {
        match button {
            Button::Left => self.left,
            Button::Right => self.right,
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Jump => self.jump,
            Button::Run => self.run,
            Button::Start => self.start,
            Button::Select => self.select,
        }
    }

    pub fn set(&mut self, button: Button, down: bool) {
        let slot = match button {
            Button::Left => &mut self.left,
            Button::Right => &mut self.right,
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::Jump => &mut self.jump,
            Button::Run => &mut self.run,
            Button::Start => &mut self.start,
            Button::Select => &mut self.select,
        };
        *slot = down;
    }

    /// Builder-style variant of [`InputFrame::set`].
    pub fn with(mut self, button: Button) -> Self {
        self.set(button, true);
        self
    }

    /// Horizontal intent as -1, 0 or 1. Left and right together cancel out.
    pub fn horizontal(&self) -> i8 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputState {
    held: HashSet<Button>,
    just_pressed: HashSet<Button>,
    just_released: HashSet<Button>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn press(&mut self, button: Button) {
        if self.held.insert(button) {
            self.just_pressed.insert(button);
        }
    }

    pub fn release(&mut self, button: Button) {
        if self.held.remove(&button) {
            self.just_released.insert(button);
        }
    }

    /// Replace the held set with `frame`, recording edges for every change.
    pub fn apply_frame(&mut self, frame: InputFrame) {
        for button in Button::ALL {
            if frame.is_down(button) {
                self.press(button);
            } else {
                self.release(button);
            }
        }
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.held.contains(&button)
    }

    pub fn is_just_pressed(&self, button: Button) -> bool {
        self.just_pressed.contains(&button)
    }

    pub fn is_just_released(&self, button: Button) -> bool {
        self.just_released.contains(&button)
    }

    pub fn frame(&self) -> InputFrame {
        let mut frame = InputFrame::default();
        for button in &self.held {
            frame.set(*button, true);
        }
        frame
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.press(Button::Jump);
        assert!(input.is_held(Button::Jump));
        assert!(input.is_just_pressed(Button::Jump));
    }

    #[test]
    fn release_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.press(Button::Jump);
        input.release(Button::Jump);
        assert!(!input.is_held(Button::Jump));
        assert!(input.is_just_released(Button::Jump));
    }

    #[test]
    fn repeated_press_keeps_single_edge() {
        let mut input = InputState::new();
        input.press(Button::Run);
        input.end_frame();
        // Key repeat from the host must not fabricate a second press edge.
        input.press(Button::Run);
        assert!(input.is_held(Button::Run));
        assert!(!input.is_just_pressed(Button::Run));
    }

    #[test]
    fn release_without_press_is_no_op() {
        let mut input = InputState::new();
        input.release(Button::Left);
        assert!(!input.is_just_released(Button::Left));
        assert!(!input.is_held(Button::Left));
    }

    #[test]
    fn end_frame_clears_edges_but_not_held() {
        let mut input = InputState::new();
        input.press(Button::Right);
        input.press(Button::Run);
        input.end_frame();
        assert!(!input.is_just_pressed(Button::Right));
        assert!(input.is_held(Button::Right));
        assert!(input.is_held(Button::Run));
    }

    #[test]
    fn frame_reflects_held_buttons() {
        let mut input = InputState::new();
        input.press(Button::Right);
        input.press(Button::Jump);
        let frame = input.frame();
        assert!(frame.right && frame.jump);
        assert!(!frame.left && !frame.run && !frame.start);
    }

    #[test]
    fn apply_frame_records_edges() {
        let mut input = InputState::new();
        input.apply_frame(InputFrame::default().with(Button::Start));
        assert!(input.is_just_pressed(Button::Start));
        input.end_frame();
        input.apply_frame(InputFrame::default());
        assert!(input.is_just_released(Button::Start));
        assert!(!input.is_held(Button::Start));
    }

    #[test]
    fn horizontal_cancels_opposing_directions() {
        let both = InputFrame::default().with(Button::Left).with(Button::Right);
        assert_eq!(both.horizontal(), 0);
        assert_eq!(InputFrame::default().with(Button::Left).horizontal(), -1);
        assert_eq!(InputFrame::default().with(Button::Right).horizontal(), 1);
        assert_eq!(InputFrame::default().horizontal(), 0);
    }

    #[test]
    fn set_and_is_down_agree_for_every_button() {
        for button in Button::ALL {
            let mut frame = InputFrame::default();
            frame.set(button, true);
            assert!(frame.is_down(button));
            frame.set(button, false);
            assert_eq!(frame, InputFrame::default());
        }
    }
}
