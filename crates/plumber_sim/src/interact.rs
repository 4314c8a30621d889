//! Player-enemy contact, block strikes and item pickups.

use plumber_core::input::InputFrame;

use crate::engine::Engine;
use crate::enemy::StompEffect;
use crate::events::Cue;
use crate::particle::Particle;
use crate::player::{Hurt, PowerState};
use crate::powerup::{PowerUp, PowerUpKind};
use crate::scoring::Reward;
use crate::tile::{BlockContent, Cell, TileKind};

impl Engine {
    /// Resolve an overlap between the player and enemy `index`.
    ///
    /// Precedence: star power, then stomp geometry, then a stationary shell
    /// kick, then damage.
    pub(crate) fn resolve_player_enemy(&mut self, index: usize, input: &InputFrame) {
        if self.player.has_star() {
            self.enemies[index].knock_out();
            self.cues.push(Cue::Stomp);
            self.award_chain_kill();
            return;
        }

        let player = self.player.body;
        let enemy_top = self.enemies[index].body.top();
        if player.vel.y > 0.0 && player.bottom() <= enemy_top + self.config.tuning.stomp_margin {
            let effect = self.enemies[index].stomp(player.center_x(), &self.config.tuning);
            self.player.bounce(input.jump, &self.config.tuning);
            self.cues.push(match effect {
                StompEffect::Kicked => Cue::Kick,
                StompEffect::Squished | StompEffect::Shelled => Cue::Stomp,
            });
            self.award_chain_kill();
            return;
        }

        if self.enemies[index].is_stationary_shell() {
            self.enemies[index].kick(player.center_x(), &self.config.tuning);
            self.cues.push(Cue::Kick);
            return;
        }

        if self.enemies[index].is_harmful() {
            self.hurt_player();
        }
    }

    pub(crate) fn hurt_player(&mut self) {
        match self.player.take_hit(&self.config.tuning) {
            Hurt::Ignored => {}
            Hurt::Demoted => self.cues.push(Cue::PowerDown),
            Hurt::Killed => self.kill_player(),
        }
    }

    /// Score the next kill of the current chain.
    pub(crate) fn award_chain_kill(&mut self) {
        let (reward, cue) = self.session.chain_kill(&self.config.tuning);
        match reward {
            Reward::Points(points) => log::debug!("chain kill for {points}"),
            Reward::ExtraLife => log::debug!("chain kill for an extra life"),
        }
        self.cues.extend(cue);
    }

    /// The player's head struck `cell` from below.
    pub(crate) fn bump_block(&mut self, cell: Cell) {
        match self.grid.get(cell) {
            TileKind::QuestionBlock => self.release_content(cell),
            TileKind::Brick => {
                let holds_item = self
                    .blocks
                    .get(cell)
                    .is_some_and(|state| state.content != BlockContent::Empty);
                if holds_item {
                    self.release_content(cell);
                } else if self.player.power.is_big() {
                    self.grid.set(cell, TileKind::Air);
                    self.blocks.remove(cell);
                    self.particles.extend(Particle::brick_debris(cell));
                    self.cues.push(Cue::BrickBreak);
                    log::debug!("brick broken at ({}, {})", cell.x, cell.y);
                } else {
                    self.blocks.start_bump(cell, self.config.tuning.bump_frames);
                    self.cues.push(Cue::Bump);
                    self.bump_kill(cell);
                }
            }
            _ => {}
        }
    }

    /// Spend a block's content. The block is used up whatever it held.
    fn release_content(&mut self, cell: Cell) {
        let content = self.blocks.take_content(cell);
        self.grid.set(cell, TileKind::UsedBlock);
        self.blocks.start_bump(cell, self.config.tuning.bump_frames);
        log::debug!("block at ({}, {}) released {:?}", cell.x, cell.y, content);

        let kind = match content {
            BlockContent::Empty => {
                self.cues.push(Cue::Bump);
                return;
            }
            BlockContent::Coin => {
                self.particles.push(Particle::coin_pop(cell));
                self.cues.push(Cue::Coin);
                let bonus = self.session.add_coin(&self.config.tuning);
                self.cues.extend(bonus);
                return;
            }
            BlockContent::Mushroom if self.player.power.is_big() => PowerUpKind::FireFlower,
            BlockContent::Mushroom => PowerUpKind::Mushroom,
            BlockContent::Star => PowerUpKind::Star,
            BlockContent::OneUp => PowerUpKind::OneUp,
        };
        self.power_ups.push(PowerUp::sprout(kind, cell));
        self.cues.push(Cue::PowerUpAppears);
    }

    /// Knock out any enemy standing on top of `cell`.
    fn bump_kill(&mut self, cell: Cell) {
        for enemy in &mut self.enemies {
            if !enemy.is_collidable() {
                continue;
            }
            let feet = Cell::containing(enemy.body.center_x(), enemy.body.bottom());
            if feet == cell {
                enemy.knock_out();
            }
        }
    }

    pub(crate) fn collect_power_up(&mut self, kind: PowerUpKind) {
        let tuning = &self.config.tuning;
        match kind {
            PowerUpKind::Mushroom => {
                if self.player.power == PowerState::Small {
                    self.player.set_power(PowerState::Big);
                }
                self.session.add_points(tuning.score_power_up);
                self.cues.push(Cue::PowerUp);
            }
            PowerUpKind::FireFlower => {
                self.player.set_power(PowerState::Fire);
                self.session.add_points(tuning.score_power_up);
                self.cues.push(Cue::PowerUp);
            }
            PowerUpKind::Star => {
                self.player.star_timer = tuning.star_frames;
                self.session.add_points(tuning.score_power_up);
                self.cues.push(Cue::PowerUp);
            }
            PowerUpKind::OneUp => {
                self.session.add_life();
                self.cues.push(Cue::OneUp);
            }
        }
        log::debug!("collected {:?}, player now {:?}", kind, self.player.power);
    }
}
