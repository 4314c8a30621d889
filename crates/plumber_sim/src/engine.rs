//! The simulation engine: owns the world and advances it one tick at a time.

use glam::Vec2;
use plumber_core::input::{InputFrame, InputState};

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE};
use crate::enemy::Enemy;
use crate::error::LoadError;
use crate::events::Cue;
use crate::level::LevelData;
use crate::particle::Particle;
use crate::player::Player;
use crate::powerup::PowerUp;
use crate::sequence::ClearPhase;
use crate::session::{GameState, Session, TimerTick};
use crate::snapshot::Snapshot;
use crate::tile::{BlockTable, TileGrid};

pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) level: LevelData,
    pub(crate) grid: TileGrid,
    pub(crate) blocks: BlockTable,
    pub(crate) player: Player,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) power_ups: Vec<PowerUp>,
    pub(crate) particles: Vec<Particle>,
    pub(crate) camera: Camera,
    pub(crate) session: Session,
    pub(crate) state: GameState,
    pub(crate) clear_phase: Option<ClearPhase>,
    pub(crate) death_timer: u32,
    pub(crate) cues: Vec<Cue>,
    pub(crate) frame: u64,
    /// Edge tracker for menu presses; advanced once per tick.
    pub(crate) input: InputState,
}

impl Engine {
    /// Validate `level` and `config` and build an engine sitting on the
    /// title screen.
    pub fn new(level: LevelData, config: EngineConfig) -> Result<Self, LoadError> {
        level.validate()?;
        config.validate()?;
        Ok(Self::build(level, config))
    }

    /// The demonstration stage with default tuning.
    pub fn demo() -> Self {
        Self::build(LevelData::demo(), EngineConfig::default())
    }

    fn build(level: LevelData, config: EngineConfig) -> Self {
        let grid = level.grid();
        let blocks = level.block_table(&grid);
        let session = Session::new(level.world.clone(), &config.tuning);
        let player = Player::new(Self::start_of(&level));
        let mut engine = Self {
            config,
            level,
            grid,
            blocks,
            player,
            enemies: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            camera: Camera::new(SCREEN_WIDTH),
            session,
            state: GameState::Title,
            clear_phase: None,
            death_timer: 0,
            cues: Vec::new(),
            frame: 0,
            input: InputState::new(),
        };
        engine.load_world();
        log::info!(
            "Engine ready: world {} ({}x{} tiles, {} enemies)",
            engine.level.world,
            engine.grid.width(),
            engine.grid.height(),
            engine.enemies.len()
        );
        engine
    }

    fn start_of(level: &LevelData) -> Vec2 {
        Vec2::new(level.player_start[0], level.player_start[1])
    }

    /// Restore the level to its loaded state: tiles, blocks, enemies, the
    /// player and the camera. Session counters are left alone.
    pub(crate) fn load_world(&mut self) {
        self.grid = self.level.grid();
        self.blocks = self.level.block_table(&self.grid);
        let tuning = &self.config.tuning;
        self.enemies = self
            .level
            .spawns
            .iter()
            .map(|spawn| Enemy::spawn(spawn.kind, spawn.x, spawn.y, tuning))
            .collect();
        self.power_ups.clear();
        self.particles.clear();
        self.camera.reset();
        self.player.respawn(Self::start_of(&self.level));
        self.death_timer = 0;
        self.clear_phase = None;
    }

    /// Advance the simulation by exactly one tick.
    pub fn tick(&mut self, input: &InputFrame) {
        self.frame += 1;
        self.input.apply_frame(*input);
        match self.state {
            GameState::Title => self.update_title(),
            GameState::Playing => self.update_playing(input),
            GameState::Dying => self.update_dying(),
            GameState::LevelClear => self.update_level_clear(),
            GameState::GameOver => self.update_game_over(),
        }
        self.input.end_frame();
    }

    fn update_playing(&mut self, input: &InputFrame) {
        match self.session.tick_timer(&self.config.tuning) {
            TimerTick::Running => {}
            TimerTick::HurryUp => {
                log::info!("Hurry up: {} left", self.session.time_left);
                self.cues.push(Cue::HurryUp);
            }
            TimerTick::Expired => {
                log::info!("Time up");
                self.kill_player();
                return;
            }
        }
        self.player.tick_timers();

        let step = self.player.step(input, &self.grid, &self.config.tuning);
        if step.jumped {
            self.cues.push(Cue::Jump);
        }
        if let Some(cell) = step.flagpole {
            self.grab_flagpole(cell);
        } else {
            if self.player.body.grounded {
                self.session.chain.reset();
            }
            if let Some(cell) = step.head_bump {
                self.bump_block(cell);
            }
            self.clamp_player();
        }

        self.update_enemies(input);
        self.update_power_ups();
        self.update_particles();
        self.blocks
            .animate(self.config.tuning.bump_frames, self.config.tuning.bump_height);
        self.camera.follow(
            self.player.body.pos.x,
            self.config.tuning.camera_lead,
            self.grid.pixel_width(),
        );

        if self.state == GameState::Playing && self.player.body.pos.y > SCREEN_HEIGHT + TILE_SIZE {
            log::info!("Fell into a pit at x {:.1}", self.player.body.pos.x);
            self.kill_player();
        }
    }

    /// Keep the player between the camera's left edge and the level's right edge.
    fn clamp_player(&mut self) {
        let body = &mut self.player.body;
        let min_x = self.camera.x();
        let max_x = self.grid.pixel_width() - body.size.x;
        if body.pos.x < min_x {
            body.pos.x = min_x;
            body.vel.x = 0.0;
        } else if body.pos.x > max_x {
            body.pos.x = max_x;
            body.vel.x = 0.0;
        }
    }

    fn update_enemies(&mut self, input: &InputFrame) {
        for index in 0..self.enemies.len() {
            let enemy = &mut self.enemies[index];
            if !enemy.update_activation(&self.camera, &self.config.tuning) {
                continue;
            }
            enemy.step(&self.grid, &self.config.tuning);

            if enemy.is_moving_shell() && !enemy.body.dead {
                self.shell_sweep(index);
            }

            let enemy = &self.enemies[index];
            if self.state == GameState::Playing
                && enemy.is_collidable()
                && self.player.body.overlaps(&enemy.body)
            {
                self.resolve_player_enemy(index, input);
            }
        }
        self.enemies.retain(|enemy| !enemy.body.dead);
    }

    /// A moving shell knocks out every other enemy it overlaps.
    fn shell_sweep(&mut self, shell: usize) {
        let reach = self.enemies[shell].body;
        let mut kills = 0;
        for (index, other) in self.enemies.iter_mut().enumerate() {
            if index != shell && other.is_collidable() && reach.overlaps(&other.body) {
                other.knock_out();
                kills += 1;
            }
        }
        for _ in 0..kills {
            self.cues.push(Cue::Stomp);
            self.award_chain_kill();
        }
    }

    fn update_power_ups(&mut self) {
        for power_up in &mut self.power_ups {
            power_up.step(&self.grid, &self.camera, &self.config.tuning);
        }
        if self.state == GameState::Playing {
            let player = self.player.body;
            let collected: Vec<_> = self
                .power_ups
                .iter_mut()
                .filter(|power_up| power_up.is_collectable() && player.overlaps(&power_up.body))
                .map(|power_up| {
                    power_up.body.dead = true;
                    power_up.kind
                })
                .collect();
            for kind in collected {
                self.collect_power_up(kind);
            }
        }
        self.power_ups.retain(|power_up| !power_up.body.dead);
    }

    fn update_particles(&mut self) {
        for particle in &mut self.particles {
            particle.step(&self.config.tuning);
        }
        self.particles.retain(|particle| !particle.is_expired());
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn blocks(&self) -> &BlockTable {
        &self.blocks
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    pub fn clear_phase(&self) -> Option<ClearPhase> {
        self.clear_phase
    }

    /// Ticks run since the engine was built.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Cues fired since the last drain, oldest first.
    pub fn pending_cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}
