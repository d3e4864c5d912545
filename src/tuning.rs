//! Gameplay tuning
//!
//! Every physics and timing constant the simulation reads at runtime. Defaults
//! come from [`crate::consts`]; hosts can override any subset from JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading tuning or layout data
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Reject the field unless `ok` holds
pub(crate) fn ensure(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason })
    }
}

/// Runtime gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub gravity: f32,
    pub player_speed: f32,
    pub player_acceleration: f32,
    pub player_deceleration: f32,
    pub jump_velocity: f32,
    pub terminal_velocity: f32,
    pub jump_input_threshold: f32,
    /// Collision box (width, height)
    pub player_size: Vec2,
    pub max_player_health: u8,
    pub max_shield_health: u8,
    pub invulnerability_duration: f32,

    // === Fireballs ===
    pub fireball_gravity: f32,
    pub fireball_terminal: f32,
    pub fireball_interval: f32,
    pub fireball_aim_speed: f32,
    /// Fraction of each velocity component used as random spread
    pub fireball_spread: f32,
    /// Half-extent of the spawn position jitter box
    pub fireball_jitter: Vec2,
    pub fireball_despawn_y: f32,
    pub collision_distance: f32,

    // === World ===
    pub cloud_disappear_time: f32,
    pub landing_tolerance: f32,
    pub float_amplitude: f32,
    pub float_speed: f32,
    pub death_y: f32,

    // === Transitions ===
    pub death_fade_delay: f32,
    pub level_complete_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            player_speed: PLAYER_SPEED,
            player_acceleration: PLAYER_ACCELERATION,
            player_deceleration: PLAYER_DECELERATION,
            jump_velocity: JUMP_VELOCITY,
            terminal_velocity: TERMINAL_VELOCITY,
            jump_input_threshold: JUMP_INPUT_THRESHOLD,
            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            max_player_health: MAX_PLAYER_HEALTH,
            max_shield_health: MAX_SHIELD_HEALTH,
            invulnerability_duration: INVULNERABILITY_DURATION,

            fireball_gravity: FIREBALL_GRAVITY,
            fireball_terminal: FIREBALL_TERMINAL,
            fireball_interval: FIREBALL_INTERVAL,
            fireball_aim_speed: FIREBALL_AIM_SPEED,
            fireball_spread: FIREBALL_SPREAD,
            fireball_jitter: Vec2::new(FIREBALL_JITTER_X, FIREBALL_JITTER_Y),
            fireball_despawn_y: FIREBALL_DESPAWN_Y,
            collision_distance: COLLISION_DISTANCE,

            cloud_disappear_time: CLOUD_DISAPPEAR_TIME,
            landing_tolerance: LANDING_TOLERANCE,
            float_amplitude: FLOAT_AMPLITUDE,
            float_speed: FLOAT_SPEED,
            death_y: DEATH_Y,

            death_fade_delay: DEATH_FADE_DELAY,
            level_complete_delay: LEVEL_COMPLETE_DELAY,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load overrides if present, falling back to defaults on any error
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            log::info!("Using default tuning");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Rejected tuning overrides ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Check every value is usable by the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("gravity", self.gravity),
            ("player_speed", self.player_speed),
            ("player_acceleration", self.player_acceleration),
            ("player_deceleration", self.player_deceleration),
            ("jump_velocity", self.jump_velocity),
            ("terminal_velocity", self.terminal_velocity),
            ("jump_input_threshold", self.jump_input_threshold),
            ("invulnerability_duration", self.invulnerability_duration),
            ("fireball_gravity", self.fireball_gravity),
            ("fireball_terminal", self.fireball_terminal),
            ("fireball_interval", self.fireball_interval),
            ("fireball_aim_speed", self.fireball_aim_speed),
            ("fireball_spread", self.fireball_spread),
            ("fireball_despawn_y", self.fireball_despawn_y),
            ("collision_distance", self.collision_distance),
            ("cloud_disappear_time", self.cloud_disappear_time),
            ("landing_tolerance", self.landing_tolerance),
            ("float_amplitude", self.float_amplitude),
            ("float_speed", self.float_speed),
            ("death_y", self.death_y),
            ("death_fade_delay", self.death_fade_delay),
            ("level_complete_delay", self.level_complete_delay),
        ];
        for (field, value) in floats {
            ensure(value.is_finite(), field, "must be finite")?;
        }
        ensure(
            self.player_size.is_finite() && self.player_size.min_element() > 0.0,
            "player_size",
            "must be positive",
        )?;
        ensure(
            self.fireball_jitter.is_finite() && self.fireball_jitter.min_element() >= 0.0,
            "fireball_jitter",
            "must not be negative",
        )?;

        ensure(self.gravity > 0.0, "gravity", "must be positive")?;
        ensure(self.player_speed > 0.0, "player_speed", "must be positive")?;
        ensure(self.player_acceleration > 0.0, "player_acceleration", "must be positive")?;
        ensure(self.player_deceleration > 0.0, "player_deceleration", "must be positive")?;
        ensure(self.jump_velocity < 0.0, "jump_velocity", "must point upward (negative)")?;
        ensure(self.terminal_velocity > 0.0, "terminal_velocity", "must be positive")?;
        ensure(self.max_player_health > 0, "max_player_health", "must be at least 1")?;
        ensure(self.max_shield_health > 0, "max_shield_health", "must be at least 1")?;
        ensure(self.invulnerability_duration >= 0.0, "invulnerability_duration", "must not be negative")?;
        ensure(self.fireball_gravity >= 0.0, "fireball_gravity", "must not be negative")?;
        ensure(self.fireball_terminal > 0.0, "fireball_terminal", "must be positive")?;
        ensure(self.fireball_interval > 0.0, "fireball_interval", "must be positive")?;
        ensure(self.fireball_aim_speed > 0.0, "fireball_aim_speed", "must be positive")?;
        ensure(
            (0.0..1.0).contains(&self.fireball_spread),
            "fireball_spread",
            "must be in [0, 1)",
        )?;
        ensure(self.collision_distance > 0.0, "collision_distance", "must be positive")?;
        ensure(self.cloud_disappear_time > 0.0, "cloud_disappear_time", "must be positive")?;
        ensure(self.landing_tolerance >= 0.0, "landing_tolerance", "must not be negative")?;
        // One sub-step of falling must not carry the feet past a platform's landing band
        ensure(
            self.terminal_velocity * SIM_DT <= self.landing_tolerance,
            "terminal_velocity",
            "falls further than landing_tolerance in one sub-step",
        )?;
        ensure(self.float_amplitude >= 0.0, "float_amplitude", "must not be negative")?;
        ensure(self.float_speed >= 0.0, "float_speed", "must not be negative")?;
        ensure(self.death_fade_delay >= 0.0, "death_fade_delay", "must not be negative")?;
        ensure(self.level_complete_delay >= 0.0, "level_complete_delay", "must not be negative")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let tuning = Tuning::default();
        assert_eq!(tuning.gravity, 1000.0);
        assert_eq!(tuning.jump_velocity, -650.0);
        assert_eq!(tuning.fireball_interval, 0.4);
        assert_eq!(tuning.max_shield_health, 3);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "death_y": 1180.0, "fireball_interval": 0.6 }"#)
            .expect("valid overrides");
        assert_eq!(tuning.death_y, 1180.0);
        assert_eq!(tuning.fireball_interval, 0.6);
        assert_eq!(tuning.player_speed, PLAYER_SPEED);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "fireball_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "fireball_interval",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "jump_velocity": 650.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "jump_velocity", .. }));
    }

    #[test]
    fn test_rejects_fall_faster_than_landing_band() {
        let err = Tuning::from_json(r#"{ "terminal_velocity": 3000.0, "gravity": 6000.0 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "terminal_velocity", .. }));

        // Shrinking the landing band alone trips the same check
        let err = Tuning::from_json(r#"{ "landing_tolerance": 2.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "terminal_velocity", .. }));

        // Widening it makes room for a faster fall
        let tuning = Tuning::from_json(r#"{ "terminal_velocity": 3000.0, "landing_tolerance": 26.0 }"#)
            .expect("fall fits the landing band");
        assert_eq!(tuning.terminal_velocity, 3000.0);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        assert_eq!(Tuning::load_or_default(Some("[]")), Tuning::default());
        assert_eq!(Tuning::load_or_default(None), Tuning::default());
    }
}
