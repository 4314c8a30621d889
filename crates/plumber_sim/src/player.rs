//! Player controller: run/skid/release curves, two-stage gravity and the
//! jump latch.

use glam::Vec2;
use plumber_core::input::InputFrame;
use serde::Serialize;

use crate::body::{Body, Facing};
use crate::collision::move_and_collide_sensing_flagpole;
use crate::config::Tuning;
use crate::tile::{Cell, TileGrid};

pub const PLAYER_WIDTH: f32 = 12.0;
pub const SMALL_HEIGHT: f32 = 16.0;
pub const BIG_HEIGHT: f32 = 32.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PowerState {
    #[default]
    Small,
    Big,
    Fire,
}

impl PowerState {
    pub fn is_big(self) -> bool {
        !matches!(self, Self::Small)
    }

    pub fn height(self) -> f32 {
        if self.is_big() {
            BIG_HEIGHT
        } else {
            SMALL_HEIGHT
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Action {
    #[default]
    Standing,
    Walking,
    Skidding,
    Jumping,
    Falling,
    Climbing,
    Dying,
}

/// What a hit did to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hurt {
    /// Blocked by damage or star invincibility.
    Ignored,
    Demoted,
    Killed,
}

/// Tile contacts from one controller step that the engine must act on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    pub jumped: bool,
    pub landed: bool,
    pub head_bump: Option<Cell>,
    pub flagpole: Option<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Body,
    pub power: PowerState,
    pub action: Action,
    /// Opens only on a tick where jump is observed released.
    pub can_jump: bool,
    /// Jump held since take-off; selects the lighter ascent gravity.
    pub jump_held: bool,
    pub iframe_timer: u32,
    pub star_timer: u32,
    /// Top edge at the moment the flagpole was grabbed.
    pub flag_y: Option<f32>,
    pub anim_frame: u8,
    anim_timer: u32,
}

impl Player {
    pub fn new(start: Vec2) -> Self {
        Self {
            body: Body::new(start.x, start.y, PLAYER_WIDTH, SMALL_HEIGHT),
            power: PowerState::Small,
            action: Action::Standing,
            can_jump: true,
            jump_held: false,
            iframe_timer: 0,
            star_timer: 0,
            flag_y: None,
            anim_frame: 0,
            anim_timer: 0,
        }
    }

    /// Put the player back at `start` as a fresh small player.
    pub fn respawn(&mut self, start: Vec2) {
        *self = Self::new(start);
    }

    pub fn is_dying(&self) -> bool {
        self.action == Action::Dying
    }

    pub fn has_star(&self) -> bool {
        self.star_timer > 0
    }

    pub fn is_invincible(&self) -> bool {
        self.iframe_timer > 0 || self.star_timer > 0
    }

    pub fn tick_timers(&mut self) {
        self.iframe_timer = self.iframe_timer.saturating_sub(1);
        self.star_timer = self.star_timer.saturating_sub(1);
    }

    /// One tick of input-driven movement followed by move-and-collide.
    pub fn step(&mut self, input: &InputFrame, grid: &TileGrid, tuning: &Tuning) -> PlayerStep {
        let grounded = self.body.grounded;
        self.steer(input, grounded, tuning);
        let jumped = self.try_jump(input, tuning);
        self.apply_gravity(tuning);

        let contacts = move_and_collide_sensing_flagpole(&mut self.body, grid);
        let landed = contacts.landed();
        if landed && matches!(self.action, Action::Jumping | Action::Falling) {
            self.action = Action::Standing;
        }
        if self.body.grounded && self.action == Action::Walking {
            self.advance_walk_cycle(tuning);
        }

        PlayerStep {
            jumped,
            landed,
            head_bump: contacts.head_bump(),
            flagpole: contacts.flagpole(),
        }
    }

    fn steer(&mut self, input: &InputFrame, grounded: bool, tuning: &Tuning) {
        let cap = if input.run {
            tuning.max_run_speed
        } else {
            tuning.max_walk_speed
        };
        let intent = input.horizontal();
        let vx = &mut self.body.vel.x;

        match intent {
            -1 | 1 => {
                let dir = f32::from(intent);
                if grounded && *vx * dir < 0.0 {
                    // Skid toward the new direction instead of reversing.
                    *vx += dir * tuning.decel_skid;
                    self.action = Action::Skidding;
                } else {
                    *vx += dir * tuning.accel;
                    if grounded {
                        self.action = Action::Walking;
                    }
                }
                self.body.facing = if intent < 0 { Facing::Left } else { Facing::Right };
            }
            _ => {
                if grounded {
                    if *vx > 0.0 {
                        *vx = (*vx - tuning.decel_release).max(0.0);
                    } else if *vx < 0.0 {
                        *vx = (*vx + tuning.decel_release).min(0.0);
                    }
                }
            }
        }

        *vx = vx.clamp(-cap, cap);
        if intent == 0 && vx.abs() < tuning.min_walk_speed {
            *vx = 0.0;
            if grounded {
                self.action = Action::Standing;
            }
        }
    }

    fn try_jump(&mut self, input: &InputFrame, tuning: &Tuning) -> bool {
        let mut jumped = false;
        if input.jump && self.can_jump && self.body.grounded {
            self.body.vel.y = if self.body.vel.x.abs() > tuning.max_walk_speed {
                tuning.jump_velocity_fast
            } else {
                tuning.jump_velocity_slow
            };
            self.jump_held = true;
            self.can_jump = false;
            self.body.grounded = false;
            self.action = Action::Jumping;
            jumped = true;
            log::debug!("jump at ({:.1}, {:.1}) vy {}", self.body.pos.x, self.body.pos.y, self.body.vel.y);
        }
        if !input.jump {
            self.can_jump = true;
            self.jump_held = false;
        }
        jumped
    }

    fn apply_gravity(&mut self, tuning: &Tuning) {
        let gravity = if self.body.vel.y < 0.0 {
            if self.jump_held {
                tuning.gravity_jump_held
            } else {
                tuning.gravity_jump_released
            }
        } else {
            if !self.body.grounded {
                self.action = Action::Falling;
            }
            tuning.gravity_falling
        };
        self.body.vel.y = (self.body.vel.y + gravity).min(tuning.max_fall_speed);
    }

    pub fn advance_walk_cycle(&mut self, tuning: &Tuning) {
        self.anim_timer += 1;
        if self.anim_timer >= tuning.walk_anim_frames {
            self.anim_timer = 0;
            self.anim_frame = (self.anim_frame + 1) % 4;
        }
    }

    /// Change power state, resizing the hitbox around the feet.
    pub fn set_power(&mut self, power: PowerState) {
        self.power = power;
        self.body.set_height_keep_feet(power.height());
    }

    pub fn take_hit(&mut self, tuning: &Tuning) -> Hurt {
        if self.is_invincible() {
            return Hurt::Ignored;
        }
        if self.power.is_big() {
            self.set_power(PowerState::Small);
            self.iframe_timer = tuning.damage_iframes;
            log::debug!("player demoted to small");
            Hurt::Demoted
        } else {
            Hurt::Killed
        }
    }

    /// Upward bounce off a stomped enemy. Holding jump bounces higher and
    /// keeps the lighter ascent gravity.
    pub fn bounce(&mut self, jump_down: bool, tuning: &Tuning) {
        self.body.vel.y = if jump_down {
            tuning.stomp_bounce_high
        } else {
            tuning.stomp_bounce_low
        };
        self.jump_held = jump_down;
        self.action = Action::Jumping;
    }

    pub fn start_dying(&mut self, tuning: &Tuning) {
        self.action = Action::Dying;
        self.body.dead = true;
        self.body.grounded = false;
        self.body.vel = Vec2::new(0.0, tuning.death_hop);
    }

    /// Death animation step: gravity only, no tile collision.
    pub fn fall_dead(&mut self, tuning: &Tuning) {
        self.body.vel.y += tuning.gravity_falling;
        self.body.pos.y += self.body.vel.y;
    }

    /// Latch onto the pole in `cell`, standing just left of it.
    pub fn grab_pole(&mut self, cell: Cell) {
        self.body.pos.x = cell.left() - self.body.size.x;
        self.body.vel = Vec2::ZERO;
        self.body.facing = Facing::Right;
        self.flag_y = Some(self.body.pos.y);
        self.action = Action::Climbing;
    }
}
