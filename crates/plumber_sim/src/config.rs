//! Movement feel, timing and scoring constants.
//!
//! Values are per tick and in pixels, derived from the NES console's
//! 8.8 fixed-point tables. A config file only needs to name the fields it
//! overrides; everything else keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{read_json, LoadError};

pub const CHAIN_SCORES: [u32; 10] = [100, 200, 400, 500, 800, 1000, 2000, 4000, 5000, 8000];
pub const FLAG_SCORES: [u32; 5] = [100, 400, 800, 2000, 5000];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Gravity: two ascending values keyed on the jump button, one for falling.
    pub gravity_jump_held: f32,
    pub gravity_jump_released: f32,
    pub gravity_falling: f32,
    pub max_fall_speed: f32,

    pub jump_velocity_slow: f32,
    pub jump_velocity_fast: f32,

    pub accel: f32,
    pub decel_release: f32,
    pub decel_skid: f32,
    pub max_walk_speed: f32,
    pub max_run_speed: f32,
    pub min_walk_speed: f32,

    pub stomp_margin: f32,
    pub stomp_bounce_low: f32,
    pub stomp_bounce_high: f32,

    pub goomba_speed: f32,
    pub koopa_speed: f32,
    pub shell_speed: f32,
    pub squish_frames: u32,
    pub shell_wake_frames: u32,
    pub emerge_frames: u32,
    pub kick_grace_frames: u32,
    pub activation_margin: f32,

    pub power_up_rise_speed: f32,
    pub mushroom_speed: f32,
    pub star_speed: f32,
    pub star_bounce: f32,

    pub damage_iframes: u32,
    pub star_frames: u32,
    pub death_hop: f32,
    pub death_frames: u32,

    pub starting_lives: u32,
    pub timer_start: u32,
    pub timer_tick_frames: u32,
    pub hurry_up_threshold: u32,
    pub coins_per_life: u32,

    pub score_coin: u32,
    pub score_power_up: u32,
    pub chain_scores: Vec<u32>,
    pub flag_scores: Vec<u32>,
    /// Height in pixels of each flagpole score band, measured up from the
    /// bottom of the screen.
    pub flag_band_height: f32,
    pub time_bonus_per_unit: u32,

    pub flag_slide_speed: f32,
    pub clear_walk_speed: f32,
    /// The level-clear walk ends once the player is this far from the right edge.
    pub clear_walk_margin: f32,
    pub clear_pause_frames: u32,

    pub bump_frames: u32,
    pub bump_height: f32,

    pub camera_lead: f32,
    pub walk_anim_frames: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_jump_held: 0.1875,
            gravity_jump_released: 0.375,
            gravity_falling: 0.4375,
            max_fall_speed: 4.0,

            jump_velocity_slow: -4.0,
            jump_velocity_fast: -5.0,

            accel: 0.046875,
            decel_release: 0.0625,
            decel_skid: 0.125,
            max_walk_speed: 1.5625,
            max_run_speed: 2.5625,
            min_walk_speed: 0.0625,

            stomp_margin: 8.0,
            stomp_bounce_low: -4.0,
            stomp_bounce_high: -5.0,

            goomba_speed: 0.375,
            koopa_speed: 0.375,
            shell_speed: 3.0,
            squish_frames: 30,
            shell_wake_frames: 300,
            emerge_frames: 60,
            kick_grace_frames: 8,
            activation_margin: 32.0,

            power_up_rise_speed: 1.0,
            mushroom_speed: 0.75,
            star_speed: 1.5,
            star_bounce: -4.0,

            damage_iframes: 120,
            star_frames: 720,
            death_hop: -5.0,
            death_frames: 180,

            starting_lives: 3,
            timer_start: 400,
            timer_tick_frames: 24,
            hurry_up_threshold: 100,
            coins_per_life: 100,

            score_coin: 200,
            score_power_up: 1000,
            chain_scores: CHAIN_SCORES.to_vec(),
            flag_scores: FLAG_SCORES.to_vec(),
            flag_band_height: 40.0,
            time_bonus_per_unit: 50,

            flag_slide_speed: 2.0,
            clear_walk_speed: 1.0,
            clear_walk_margin: 80.0,
            clear_pause_frames: 120,

            bump_frames: 8,
            bump_height: 8.0,

            camera_lead: 100.0,
            walk_anim_frames: 8,
        }
    }
}

/// What survives a death-triggered retry of the level.
///
/// Lives always carry over; a game over or a cleared level resets everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPolicy {
    pub keep_score_on_death: bool,
    pub keep_coins_on_death: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            keep_score_on_death: true,
            keep_coins_on_death: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tuning: Tuning,
    pub session: SessionPolicy,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), LoadError> {
        let t = &self.tuning;
        let positive = [
            ("gravity_jump_held", t.gravity_jump_held),
            ("gravity_jump_released", t.gravity_jump_released),
            ("gravity_falling", t.gravity_falling),
            ("max_fall_speed", t.max_fall_speed),
            ("accel", t.accel),
            ("max_walk_speed", t.max_walk_speed),
            ("max_run_speed", t.max_run_speed),
            ("shell_speed", t.shell_speed),
            ("flag_band_height", t.flag_band_height),
            ("flag_slide_speed", t.flag_slide_speed),
            ("clear_walk_speed", t.clear_walk_speed),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(LoadError::invalid(format!("{name} must be > 0, got {value}")));
            }
        }
        if t.jump_velocity_slow >= 0.0 || t.jump_velocity_fast >= 0.0 {
            return Err(LoadError::invalid("jump velocities must point upward (< 0)"));
        }
        if t.chain_scores.is_empty() {
            return Err(LoadError::invalid("chain_scores must not be empty"));
        }
        if t.flag_scores.is_empty() {
            return Err(LoadError::invalid("flag_scores must not be empty"));
        }
        if t.timer_tick_frames == 0 {
            return Err(LoadError::invalid("timer_tick_frames must be > 0"));
        }
        if t.starting_lives == 0 {
            return Err(LoadError::invalid("starting_lives must be > 0"));
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<EngineConfig, LoadError> {
    let config: EngineConfig = read_json(path)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "plumber_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn defaults_validate() {
        EngineConfig::default().validate().expect("defaults are valid");
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let path = temp_file_path("partial");
        fs::write(
            &path,
            r#"{
              "tuning": { "max_run_speed": 3.0, "chain_scores": [100, 200] },
              "session": { "keep_score_on_death": false }
            }"#,
        )
        .expect("write temp file");

        let config = load_config_from_path(&path).expect("partial config should load");
        assert_eq!(config.tuning.max_run_speed, 3.0);
        assert_eq!(config.tuning.chain_scores, vec![100, 200]);
        assert_eq!(config.tuning.max_walk_speed, Tuning::default().max_walk_speed);
        assert!(!config.session.keep_score_on_death);
        assert!(config.session.keep_coins_on_death);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_score_table_is_rejected() {
        let path = temp_file_path("empty_table");
        fs::write(&path, r#"{ "tuning": { "flag_scores": [] } }"#).expect("write temp file");

        let err = load_config_from_path(&path).expect_err("empty table should fail");
        assert!(err.to_string().contains("flag_scores"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn downward_jump_is_rejected() {
        let mut config = EngineConfig::default();
        config.tuning.jump_velocity_fast = 5.0;
        assert!(matches!(config.validate(), Err(LoadError::Invalid(_))));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = load_config_from_path(Path::new("/definitely/not/here.json"))
            .expect_err("missing file");
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let path = temp_file_path("malformed");
        fs::write(&path, "{ not json").expect("write temp file");
        let err = load_config_from_path(&path).expect_err("malformed json");
        assert!(matches!(err, LoadError::Parse { .. }));
        let _ = fs::remove_file(path);
    }
}
