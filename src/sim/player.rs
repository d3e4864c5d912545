//! The climbing player: movement, shield and health meters

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::tick::TickInput;
use crate::approach;
use crate::tuning::Tuning;

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Body center
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision box size
    pub size: Vec2,
    /// Resting on a cloud or the gate (may jump)
    pub grounded: bool,
    pub health: u8,
    pub max_health: u8,
    pub shield_health: u8,
    pub max_shield_health: u8,
    pub is_shielding: bool,
    pub invulnerable: bool,
    /// Seconds of invulnerability left (never negative)
    pub invulnerability_timer: f32,
    /// Length of the post-hit invulnerability window
    pub invulnerability_duration: f32,
    /// Sprite opacity (blinks while invulnerable, visual only)
    pub alpha: f32,
    /// Shield input from the previous step, for edge detection
    #[serde(skip)]
    shield_was_held: bool,
}

impl Player {
    pub fn new(spawn: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            size: tuning.player_size,
            grounded: false,
            health: tuning.max_player_health,
            max_health: tuning.max_player_health,
            shield_health: tuning.max_shield_health,
            max_shield_health: tuning.max_shield_health,
            is_shielding: false,
            invulnerable: false,
            invulnerability_timer: 0.0,
            invulnerability_duration: tuning.invulnerability_duration,
            alpha: 1.0,
            shield_was_held: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    /// Rest the player's feet on a platform top
    pub fn land_at(&mut self, platform_top: f32) {
        self.pos.y = platform_top - self.size.y / 2.0;
        self.vel.y = 0.0;
        self.grounded = true;
    }

    /// Advance timers, shield and motion by one step
    pub fn update(&mut self, dt: f32, input: &TickInput, tuning: &Tuning) {
        self.update_invulnerability(dt);
        self.update_shield(input.shield_held);

        if self.is_shielding {
            // Shielding freezes the player in place
            self.vel = Vec2::ZERO;
            return;
        }

        // Horizontal: accelerate toward target speed, or coast to a stop
        let move_x = input.move_x.clamp(-1.0, 1.0);
        self.vel.x = if move_x != 0.0 {
            approach(
                self.vel.x,
                move_x * tuning.player_speed,
                tuning.player_acceleration * dt,
            )
        } else {
            approach(self.vel.x, 0.0, tuning.player_deceleration * dt)
        };

        if input.move_y < tuning.jump_input_threshold && self.grounded {
            self.vel.y = tuning.jump_velocity;
            self.grounded = false;
        }

        self.vel.y = (self.vel.y + tuning.gravity * dt).min(tuning.terminal_velocity);
        self.pos += self.vel * dt;
    }

    fn update_invulnerability(&mut self, dt: f32) {
        if !self.invulnerable {
            return;
        }
        self.invulnerability_timer -= dt;
        if self.invulnerability_timer <= 0.0 {
            self.invulnerable = false;
            self.invulnerability_timer = 0.0;
            self.alpha = 1.0;
        } else {
            self.alpha = (self.invulnerability_timer * 10.0).sin() * 0.5 + 0.5;
        }
    }

    /// Shield engages on the press edge and drops the moment the button is released
    fn update_shield(&mut self, held: bool) {
        let pressed = held && !self.shield_was_held;
        self.shield_was_held = held;

        if !held || self.shield_health == 0 {
            self.is_shielding = false;
        } else if pressed {
            self.is_shielding = true;
        }
    }

    /// Lose one health and start the invulnerability window. Returns true when dead.
    pub fn take_damage(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.invulnerable = true;
        self.invulnerability_timer = self.invulnerability_duration;
        self.health == 0
    }

    /// Absorb a hit with the shield; an empty shield drops
    pub fn damage_shield(&mut self) {
        self.shield_health = self.shield_health.saturating_sub(1);
        if self.shield_health == 0 {
            self.is_shielding = false;
        }
    }

    pub fn restore_shield(&mut self) {
        self.shield_health = self.max_shield_health;
    }

    /// Back to spawn with full meters
    pub fn reset(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
        self.grounded = false;
        self.health = self.max_health;
        self.shield_health = self.max_shield_health;
        self.is_shielding = false;
        self.shield_was_held = false;
        self.invulnerable = false;
        self.invulnerability_timer = 0.0;
        self.alpha = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(Vec2::new(100.0, 100.0), &Tuning::default())
    }

    fn held(move_x: f32, move_y: f32, shield_held: bool) -> TickInput {
        TickInput {
            move_x,
            move_y,
            shield_held,
            ..Default::default()
        }
    }

    #[test]
    fn test_accelerates_to_speed() {
        let tuning = Tuning::default();
        let mut p = player();
        p.update(0.1, &held(1.0, 0.0, false), &tuning);
        assert!((p.vel.x - 100.0).abs() < 1e-3);
        p.update(0.1, &held(1.0, 0.0, false), &tuning);
        assert!((p.vel.x - 200.0).abs() < 1e-3);
        // Never overshoots
        p.update(0.1, &held(1.0, 0.0, false), &tuning);
        assert_eq!(p.vel.x, 200.0);
    }

    #[test]
    fn test_decelerates_to_rest() {
        let tuning = Tuning::default();
        let mut p = player();
        p.vel.x = 120.0;
        p.update(0.1, &TickInput::default(), &tuning);
        assert!((p.vel.x - 70.0).abs() < 1e-3);
        p.update(0.2, &TickInput::default(), &tuning);
        assert_eq!(p.vel.x, 0.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let tuning = Tuning::default();
        let mut p = player();
        p.update(SIM_DT, &held(0.0, -1.0, false), &tuning);
        assert!(p.vel.y > 0.0, "airborne jump must not fire");

        p.vel = Vec2::ZERO;
        p.grounded = true;
        p.update(SIM_DT, &held(0.0, -1.0, false), &tuning);
        assert!(!p.grounded);
        assert!((p.vel.y - (-650.0 + 1000.0 * SIM_DT)).abs() < 1e-3);

        // Weak upward stick does not jump
        let mut p = player();
        p.grounded = true;
        p.update(SIM_DT, &held(0.0, -0.4, false), &tuning);
        assert!(p.grounded);
    }

    #[test]
    fn test_gravity_capped_at_terminal() {
        let tuning = Tuning::default();
        let mut p = player();
        for _ in 0..600 {
            p.update(SIM_DT, &TickInput::default(), &tuning);
        }
        assert_eq!(p.vel.y, 800.0);
    }

    #[test]
    fn test_shield_freezes_player() {
        let tuning = Tuning::default();
        let mut p = player();
        p.vel = Vec2::new(150.0, 300.0);
        let start = p.pos;
        p.update(SIM_DT, &held(1.0, -1.0, true), &tuning);
        assert!(p.is_shielding);
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.pos, start);
    }

    #[test]
    fn test_shield_is_edge_triggered() {
        let tuning = Tuning::default();
        let mut p = player();
        p.shield_health = 0;
        p.update(SIM_DT, &held(0.0, 0.0, true), &tuning);
        assert!(!p.is_shielding);

        // Refilled while still holding: must press again
        p.restore_shield();
        p.update(SIM_DT, &held(0.0, 0.0, true), &tuning);
        assert!(!p.is_shielding);
        p.update(SIM_DT, &held(0.0, 0.0, false), &tuning);
        p.update(SIM_DT, &held(0.0, 0.0, true), &tuning);
        assert!(p.is_shielding);

        // Release drops it immediately
        p.update(SIM_DT, &held(0.0, 0.0, false), &tuning);
        assert!(!p.is_shielding);
    }

    #[test]
    fn test_broken_shield_drops() {
        let tuning = Tuning::default();
        let mut p = player();
        p.update(SIM_DT, &held(0.0, 0.0, true), &tuning);
        assert!(p.is_shielding);
        p.damage_shield();
        p.damage_shield();
        assert!(p.is_shielding);
        p.damage_shield();
        assert_eq!(p.shield_health, 0);
        assert!(!p.is_shielding);
        p.update(SIM_DT, &held(0.0, 0.0, true), &tuning);
        assert!(!p.is_shielding);
    }

    #[test]
    fn test_take_damage() {
        let mut p = player();
        assert!(!p.take_damage());
        assert!(p.invulnerable);
        assert_eq!(p.invulnerability_timer, 2.0);
        assert!(!p.take_damage());
        assert!(p.take_damage());
        assert_eq!(p.health, 0);
        // Already dead: still reports dead, never wraps
        assert!(p.take_damage());
        assert_eq!(p.health, 0);
    }

    #[test]
    fn test_invulnerability_expires() {
        let tuning = Tuning::default();
        let mut p = player();
        p.take_damage();
        let mut elapsed = 0.0;
        while p.invulnerable {
            p.update(1.0 / 60.0, &TickInput::default(), &tuning);
            elapsed += 1.0 / 60.0;
            assert!((0.0..=1.0).contains(&p.alpha));
        }
        assert!((elapsed - 2.0_f32).abs() < 1.0 / 60.0 + 1e-4);
        assert_eq!(p.invulnerability_timer, 0.0);
        assert_eq!(p.alpha, 1.0);
    }

    #[test]
    fn test_reset() {
        let mut p = player();
        p.take_damage();
        p.damage_shield();
        p.vel = Vec2::new(10.0, 10.0);
        p.reset(Vec2::new(5.0, 6.0));
        assert_eq!(p.pos, Vec2::new(5.0, 6.0));
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.health, 3);
        assert_eq!(p.shield_health, 3);
        assert!(!p.invulnerable);
        assert!(!p.is_shielding);
    }

    proptest! {
        #[test]
        fn prop_meters_never_negative(ops in prop::collection::vec(0u8..3, 0..40)) {
            let mut p = player();
            for op in ops {
                match op {
                    0 => { p.take_damage(); }
                    1 => p.damage_shield(),
                    _ => p.restore_shield(),
                }
                prop_assert!(p.health <= p.max_health);
                prop_assert!(p.shield_health <= p.max_shield_health);
                prop_assert!(!(p.is_shielding && p.shield_health == 0));
            }
        }

        #[test]
        fn prop_empty_shield_never_engages(
            inputs in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0, any::<bool>()), 1..60)
        ) {
            let tuning = Tuning::default();
            let mut p = player();
            p.shield_health = 0;
            for (x, y, shield) in inputs {
                p.update(SIM_DT, &held(x, y, shield), &tuning);
                prop_assert!(!p.is_shielding);
            }
        }
    }
}
