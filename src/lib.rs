//! Sky Climber - cloud-hopping platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, clouds, fireballs, game state)
//! - `tuning`: Data-driven gameplay constants
//! - `input`: Joystick/keyboard mapping into per-frame input
//! - `ui`: Per-frame snapshot for the HUD and renderer

pub mod input;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use sim::{GameEvent, GamePhase, GameSession, TickInput, tick};
pub use tuning::{ConfigError, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation sub-step (120 Hz keeps per-step falls under the landing tolerance)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 12;
    /// Longest frame the simulation will accept (stalled host loops are clamped)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player physics (pixels, seconds; +y points down)
    pub const GRAVITY: f32 = 1000.0;
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_ACCELERATION: f32 = 1000.0;
    pub const PLAYER_DECELERATION: f32 = 500.0;
    pub const JUMP_VELOCITY: f32 = -650.0;
    pub const TERMINAL_VELOCITY: f32 = 800.0;
    /// Joystick Y below this counts as "jump"
    pub const JUMP_INPUT_THRESHOLD: f32 = -0.5;

    /// Player body (collision box)
    pub const PLAYER_WIDTH: f32 = 36.0;
    pub const PLAYER_HEIGHT: f32 = 66.0;

    /// Meters
    pub const MAX_PLAYER_HEALTH: u8 = 3;
    pub const MAX_SHIELD_HEALTH: u8 = 3;
    pub const INVULNERABILITY_DURATION: f32 = 2.0;

    /// Fireballs
    pub const FIREBALL_GRAVITY: f32 = 500.0;
    pub const FIREBALL_TERMINAL: f32 = 600.0;
    pub const FIREBALL_INTERVAL: f32 = 0.4;
    /// Speed used to derive flight time (distance / speed)
    pub const FIREBALL_AIM_SPEED: f32 = 400.0;
    /// Fractional velocity perturbation (±10%)
    pub const FIREBALL_SPREAD: f32 = 0.1;
    pub const FIREBALL_JITTER_X: f32 = 20.0;
    pub const FIREBALL_JITTER_Y: f32 = 10.0;
    pub const FIREBALL_DESPAWN_Y: f32 = 1100.0;
    /// Fireball/player hit radius (center to center)
    pub const COLLISION_DISTANCE: f32 = 40.0;

    /// Clouds
    pub const CLOUD_DISAPPEAR_TIME: f32 = 5.0;
    /// How far above a platform top the player's feet may be and still land
    pub const LANDING_TOLERANCE: f32 = 10.0;

    /// Collectible float animation
    pub const FLOAT_AMPLITUDE: f32 = 10.0;
    pub const FLOAT_SPEED: f32 = 20.0;

    /// Falling below this kills the player
    pub const DEATH_Y: f32 = 1100.0;

    /// Visual delays
    pub const DEATH_FADE_DELAY: f32 = 0.3;
    pub const LEVEL_COMPLETE_DELAY: f32 = 1.0;
}

/// Move `current` toward `target` by at most `max_delta`, snapping when close enough
#[inline]
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Heading of a velocity vector in radians (0 = +x, clockwise on screen)
#[inline]
pub fn heading(vel: Vec2) -> f32 {
    vel.y.atan2(vel.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_snaps_within_step() {
        assert_eq!(approach(195.0, 200.0, 10.0), 200.0);
        assert_eq!(approach(0.0, 200.0, 10.0), 10.0);
        assert_eq!(approach(50.0, 0.0, 8.0), 42.0);
        assert_eq!(approach(-3.0, 0.0, 8.0), 0.0);
    }

    #[test]
    fn test_heading() {
        assert!(heading(Vec2::new(1.0, 0.0)).abs() < 1e-6);
        assert!((heading(Vec2::new(0.0, 1.0)) - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
