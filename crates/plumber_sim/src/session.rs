//! Session counters and the top-level game state.

use serde::Serialize;

use crate::config::{SessionPolicy, Tuning};
use crate::events::Cue;
use crate::scoring::{ChainCounter, Reward};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum GameState {
    #[default]
    Title,
    Playing,
    Dying,
    LevelClear,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    Running,
    HurryUp,
    Expired,
}

/// Score, coins, lives and the countdown for one play session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub score: u32,
    pub coins: u32,
    pub lives: u32,
    pub world: String,
    pub time_left: u32,
    timer_frames: u32,
    hurry_up_sent: bool,
    pub chain: ChainCounter,
}

impl Session {
    pub fn new(world: impl Into<String>, tuning: &Tuning) -> Self {
        Self {
            score: 0,
            coins: 0,
            lives: tuning.starting_lives,
            world: world.into(),
            time_left: tuning.timer_start,
            timer_frames: 0,
            hurry_up_sent: false,
            chain: ChainCounter::default(),
        }
    }

    pub fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn add_life(&mut self) {
        self.lives = self.lives.saturating_add(1);
    }

    /// Apply a reward; an extra life comes back as a cue.
    pub fn grant(&mut self, reward: Reward) -> Option<Cue> {
        match reward {
            Reward::Points(points) => {
                self.add_points(points);
                None
            }
            Reward::ExtraLife => {
                self.add_life();
                Some(Cue::OneUp)
            }
        }
    }

    /// Score one more kill in the current chain.
    pub fn chain_kill(&mut self, tuning: &Tuning) -> (Reward, Option<Cue>) {
        let reward = self.chain.next_reward(&tuning.chain_scores);
        (reward, self.grant(reward))
    }

    /// Count a coin; every `coins_per_life` coins wraps into an extra life.
    pub fn add_coin(&mut self, tuning: &Tuning) -> Option<Cue> {
        self.coins += 1;
        self.add_points(tuning.score_coin);
        if tuning.coins_per_life > 0 && self.coins >= tuning.coins_per_life {
            self.coins = 0;
            self.add_life();
            return Some(Cue::OneUp);
        }
        None
    }

    /// Advance the countdown by one tick. It only moves every
    /// `timer_tick_frames` ticks.
    pub fn tick_timer(&mut self, tuning: &Tuning) -> TimerTick {
        self.timer_frames += 1;
        if self.timer_frames < tuning.timer_tick_frames {
            return TimerTick::Running;
        }
        self.timer_frames = 0;
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            return TimerTick::Expired;
        }
        if !self.hurry_up_sent && self.time_left <= tuning.hurry_up_threshold {
            self.hurry_up_sent = true;
            return TimerTick::HurryUp;
        }
        TimerTick::Running
    }

    /// Convert one unit of remaining time into points. False once drained.
    pub fn drain_time_unit(&mut self, tuning: &Tuning) -> bool {
        if self.time_left == 0 {
            return false;
        }
        self.time_left -= 1;
        self.add_points(tuning.time_bonus_per_unit);
        true
    }

    /// Take a life away. True when none are left.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    /// Prepare for another attempt at the level after a death.
    pub fn retry(&mut self, tuning: &Tuning, policy: SessionPolicy) {
        if !policy.keep_score_on_death {
            self.score = 0;
        }
        if !policy.keep_coins_on_death {
            self.coins = 0;
        }
        self.time_left = tuning.timer_start;
        self.timer_frames = 0;
        self.hurry_up_sent = false;
        self.chain.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (Session, Tuning) {
        let tuning = Tuning::default();
        (Session::new("1-1", &tuning), tuning)
    }

    #[test]
    fn timer_moves_on_a_fixed_interval() {
        let (mut session, tuning) = session();
        for _ in 0..tuning.timer_tick_frames - 1 {
            assert_eq!(session.tick_timer(&tuning), TimerTick::Running);
            assert_eq!(session.time_left, 400);
        }
        session.tick_timer(&tuning);
        assert_eq!(session.time_left, 399);
    }

    #[test]
    fn hurry_up_fires_once_then_expires() {
        let (mut session, tuning) = session();
        session.time_left = 101;
        let mut hurry = 0;
        let mut expired = false;
        for _ in 0..(101 * tuning.timer_tick_frames) {
            match session.tick_timer(&tuning) {
                TimerTick::HurryUp => hurry += 1,
                TimerTick::Expired => {
                    expired = true;
                    break;
                }
                TimerTick::Running => {}
            }
        }
        assert_eq!(hurry, 1);
        assert!(expired);
        assert_eq!(session.time_left, 0);
    }

    #[test]
    fn hundredth_coin_becomes_a_life() {
        let (mut session, tuning) = session();
        session.coins = 99;
        assert_eq!(session.add_coin(&tuning), Some(Cue::OneUp));
        assert_eq!(session.coins, 0);
        assert_eq!(session.lives, 4);
        assert_eq!(session.score, 200);
    }

    #[test]
    fn retry_follows_policy() {
        let (mut session, tuning) = session();
        session.score = 1200;
        session.coins = 7;
        session.time_left = 30;
        session.chain_kill(&tuning);
        session.retry(&tuning, SessionPolicy::default());
        assert_eq!((session.score, session.coins), (1300, 7));
        assert_eq!(session.time_left, 400);
        assert_eq!(session.chain.index(), 0);

        session.retry(
            &tuning,
            SessionPolicy {
                keep_score_on_death: false,
                keep_coins_on_death: false,
            },
        );
        assert_eq!((session.score, session.coins), (0, 0));
    }

    #[test]
    fn time_bonus_drains_to_zero() {
        let (mut session, tuning) = session();
        session.time_left = 3;
        let mut units = 0;
        while session.drain_time_unit(&tuning) {
            units += 1;
        }
        assert_eq!(units, 3);
        assert_eq!(session.score, 150);
    }

    #[test]
    fn last_life_reports_game_over() {
        let (mut session, _) = session();
        assert!(!session.lose_life());
        assert!(!session.lose_life());
        assert!(session.lose_life());
        assert!(session.lose_life());
        assert_eq!(session.lives, 0);
    }
}
