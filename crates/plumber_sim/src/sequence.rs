//! Global state transitions: title, death, game over and the level-clear
//! sequence.
//!
//! Every delay here is a countdown advanced once per tick; nothing waits on
//! wall-clock time.

use plumber_core::input::Button;
use serde::Serialize;

use crate::collision::{resolve_y, VerticalHit};
use crate::consts::SCREEN_HEIGHT;
use crate::engine::Engine;
use crate::events::Cue;
use crate::player::Action;
use crate::scoring::flag_score;
use crate::session::{GameState, Session};
use crate::tile::Cell;

/// Level-clear sub-sequence after the flagpole grab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ClearPhase {
    /// Sliding down the pole until the feet land on a solid tile.
    Slide,
    /// Walking right toward the level's end.
    Walk,
    /// Draining the countdown into points.
    TimeBonus,
    /// Ticks left before the session resets.
    Pause(u32),
}

impl Engine {
    pub(crate) fn update_title(&mut self) {
        if self.input.is_just_pressed(Button::Start) || self.input.is_just_pressed(Button::Jump) {
            self.state = GameState::Playing;
            // A jump press that started the game must be released first.
            self.player.can_jump = !self.input.is_held(Button::Jump);
            log::info!("Game start: world {}, {} lives", self.session.world, self.session.lives);
        }
    }

    pub(crate) fn update_game_over(&mut self) {
        if self.input.is_just_pressed(Button::Start) {
            self.full_reset();
        }
    }

    /// Back to the title screen with a fresh session and level.
    pub(crate) fn full_reset(&mut self) {
        self.session = Session::new(self.level.world.clone(), &self.config.tuning);
        self.load_world();
        self.state = GameState::Title;
        log::info!("Session reset");
    }

    /// Start the death animation. Only a playing player can die.
    pub(crate) fn kill_player(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        self.player.start_dying(&self.config.tuning);
        self.death_timer = self.config.tuning.death_frames;
        self.state = GameState::Dying;
        self.cues.push(Cue::Die);
        log::info!(
            "Player died at ({:.1}, {:.1}) with {} lives",
            self.player.body.pos.x,
            self.player.body.pos.y,
            self.session.lives
        );
    }

    pub(crate) fn update_dying(&mut self) {
        self.player.fall_dead(&self.config.tuning);
        self.death_timer = self.death_timer.saturating_sub(1);
        if self.death_timer > 0 {
            return;
        }

        if self.session.lose_life() {
            self.state = GameState::GameOver;
            self.cues.push(Cue::GameOver);
            log::info!("Game over with score {}", self.session.score);
        } else {
            self.session.retry(&self.config.tuning, self.config.session);
            self.load_world();
            self.state = GameState::Playing;
            log::info!("Retrying with {} lives left", self.session.lives);
        }
    }

    /// The player touched the flag tile in `cell`.
    pub(crate) fn grab_flagpole(&mut self, cell: Cell) {
        let tuning = &self.config.tuning;
        self.player.grab_pole(cell);
        let contact_y = self.player.body.top();
        let points = flag_score(contact_y, SCREEN_HEIGHT, tuning.flag_band_height, &tuning.flag_scores);
        self.session.add_points(points);

        self.clear_phase = Some(ClearPhase::Slide);
        self.state = GameState::LevelClear;
        self.cues.push(Cue::Flagpole);
        log::info!("Flagpole grabbed at y {contact_y:.1} for {points} points");
    }

    pub(crate) fn update_level_clear(&mut self) {
        let Some(phase) = self.clear_phase else {
            self.clear_phase = Some(ClearPhase::Walk);
            return;
        };
        let tuning = &self.config.tuning;
        let body = &mut self.player.body;

        self.clear_phase = match phase {
            ClearPhase::Slide => {
                // Scripted descent; the landing still goes through the
                // vertical collision pass.
                body.vel.y = tuning.flag_slide_speed;
                body.pos.y += body.vel.y;
                let landed = matches!(resolve_y(body, &self.grid), Some(VerticalHit::Floor(_)));
                if landed || body.top() >= self.grid.pixel_height() {
                    self.player.action = Action::Walking;
                    Some(ClearPhase::Walk)
                } else {
                    Some(phase)
                }
            }
            ClearPhase::Walk => {
                body.pos.x += tuning.clear_walk_speed;
                let done = body.pos.x > self.grid.pixel_width() - tuning.clear_walk_margin;
                self.player.advance_walk_cycle(tuning);
                if done {
                    self.player.action = Action::Standing;
                    Some(ClearPhase::TimeBonus)
                } else {
                    Some(phase)
                }
            }
            ClearPhase::TimeBonus => {
                if self.session.drain_time_unit(tuning) {
                    Some(phase)
                } else {
                    log::info!("Level clear with score {}", self.session.score);
                    Some(ClearPhase::Pause(tuning.clear_pause_frames))
                }
            }
            ClearPhase::Pause(left) if left > 1 => Some(ClearPhase::Pause(left - 1)),
            ClearPhase::Pause(_) => None,
        };

        if self.clear_phase.is_none() {
            self.full_reset();
            return;
        }
        self.camera.follow(
            self.player.body.pos.x,
            self.config.tuning.camera_lead,
            self.grid.pixel_width(),
        );
    }
}
