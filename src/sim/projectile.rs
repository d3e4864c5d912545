//! Sun fireballs: spawn cadence, ballistic aiming and flight
//!
//! The sun lobs fireballs at the cloud path. Each shot solves for the launch
//! velocity that lands on a chosen target after `distance / aim_speed`
//! seconds under constant gravity, then adds a little random spread.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::state::{EventQueue, GameEvent};
use crate::heading;
use crate::tuning::Tuning;

/// A single fireball in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fireball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Simulation time it was launched
    pub spawn_time: f32,
    /// Sprite rotation following the velocity (visual only)
    pub rotation: f32,
}

impl Fireball {
    /// Apply fireball gravity (capped at terminal fall speed) and move
    pub fn integrate(&mut self, dt: f32, gravity: f32, terminal: f32) {
        self.vel.y = (self.vel.y + gravity * dt).min(terminal);
        self.pos += self.vel * dt;
        self.rotation = heading(self.vel);
    }
}

/// Launch velocity and flight time that carry a projectile from `from` to `to`.
///
/// Flight time is `|to - from| / aim_speed`; over that time constant downward
/// `gravity` bends the path so it passes exactly through `to`.
pub fn ballistic_velocity(from: Vec2, to: Vec2, aim_speed: f32, gravity: f32) -> (Vec2, f32) {
    let delta = to - from;
    let time = (delta.length() / aim_speed).max(f32::EPSILON);
    let vel = Vec2::new(
        delta.x / time,
        (delta.y - 0.5 * gravity * time * time) / time,
    );
    (vel, time)
}

/// Uniform sample in `[-half, half]`
fn jitter<R: Rng>(rng: &mut R, half: f32) -> f32 {
    if half > 0.0 {
        rng.random_range(-half..=half)
    } else {
        0.0
    }
}

/// The sun
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emitter {
    pub pos: Vec2,
    /// Present in the sky and firing
    pub active: bool,
    /// Seconds accumulated toward the next shot
    pub timer: f32,
}

/// Emitter plus every live fireball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSystem {
    pub emitter: Emitter,
    /// Live fireballs (sorted by id)
    pub fireballs: Vec<Fireball>,
    next_id: u32,
}

impl ProjectileSystem {
    pub fn new(emitter_pos: Vec2) -> Self {
        Self {
            emitter: Emitter {
                pos: emitter_pos,
                active: true,
                timer: 0.0,
            },
            fireballs: Vec::new(),
            next_id: 1,
        }
    }

    /// Bring the sun back and drop every fireball
    pub fn reset(&mut self, emitter_pos: Vec2) {
        self.emitter = Emitter {
            pos: emitter_pos,
            active: true,
            timer: 0.0,
        };
        self.fireballs.clear();
    }

    /// Move fireballs, drop the ones below the playfield, then fire if due
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        now: f32,
        tuning: &Tuning,
        targets: &[Vec2],
        rng: &mut R,
        events: &mut EventQueue,
    ) {
        for fireball in &mut self.fireballs {
            fireball.integrate(dt, tuning.fireball_gravity, tuning.fireball_terminal);
        }
        self.fireballs
            .retain(|f| f.pos.y <= tuning.fireball_despawn_y);

        if !self.emitter.active {
            return;
        }
        self.emitter.timer += dt;
        if self.emitter.timer >= tuning.fireball_interval {
            self.emitter.timer = 0.0;
            if let Some((id, target)) = self.fire(now, tuning, targets, rng) {
                log::debug!("Fireball {id} aimed at ({:.0}, {:.0})", target.x, target.y);
                events.push(GameEvent::FireballSpawned { id, target });
            }
        }
    }

    /// Launch one aimed fireball at a random target
    pub fn fire<R: Rng>(
        &mut self,
        now: f32,
        tuning: &Tuning,
        targets: &[Vec2],
        rng: &mut R,
    ) -> Option<(u32, Vec2)> {
        let target = *targets.choose(rng)?;
        let origin = self.emitter.pos;

        let (aim, _) = ballistic_velocity(origin, target, tuning.fireball_aim_speed, tuning.fireball_gravity);
        let spread = tuning.fireball_spread;
        let vel = Vec2::new(
            aim.x + jitter(rng, aim.x.abs() * spread),
            aim.y + jitter(rng, aim.y.abs() * spread),
        );
        let pos = origin
            + Vec2::new(
                jitter(rng, tuning.fireball_jitter.x),
                jitter(rng, tuning.fireball_jitter.y),
            );

        let id = self.spawn_at(pos, vel, now);
        Some((id, target))
    }

    /// Place a fireball directly
    pub fn spawn_at(&mut self, pos: Vec2, vel: Vec2, now: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.fireballs.push(Fireball {
            id,
            pos,
            vel,
            spawn_time: now,
            rotation: heading(vel),
        });
        id
    }

    /// The sun vanishes: no more shots and every fireball is gone.
    /// Returns how many fireballs were cleared.
    pub fn remove_emitter(&mut self) -> usize {
        self.emitter.active = false;
        self.clear()
    }

    pub fn clear(&mut self) -> usize {
        let cleared = self.fireballs.len();
        self.fireballs.clear();
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::layout::Layout;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn precise() -> Tuning {
        Tuning {
            fireball_spread: 0.0,
            fireball_jitter: Vec2::ZERO,
            ..Default::default()
        }
    }

    #[test]
    fn test_ballistic_solve_hits_every_target() {
        let layout = Layout::default();
        for &target in &layout.fireball_targets {
            let (vel, t) = ballistic_velocity(layout.emitter, target, 400.0, 500.0);
            let landed = layout.emitter + vel * t + 0.5 * Vec2::new(0.0, 500.0) * t * t;
            assert!(landed.distance(target) < 0.05, "missed {target:?}: {landed:?}");
        }
    }

    #[test]
    fn test_simulated_flight_hits_target() {
        // Close target so the fall never reaches the terminal clamp
        let from = Vec2::new(1700.0, 100.0);
        let target = Vec2::new(1500.0, 250.0);
        let tuning = precise();
        let mut system = ProjectileSystem::new(from);
        let mut rng = Pcg32::seed_from_u64(7);
        system.fire(0.0, &tuning, &[target], &mut rng).expect("target list is not empty");

        let (_, time) = ballistic_velocity(from, target, 400.0, 500.0);
        let steps = (time / SIM_DT).round() as usize;
        let mut fireball = system.fireballs[0].clone();
        for _ in 0..steps {
            fireball.integrate(SIM_DT, tuning.fireball_gravity, tuning.fireball_terminal);
        }
        assert!(fireball.vel.y < tuning.fireball_terminal);
        assert!(fireball.pos.distance(target) < 3.0, "{:?}", fireball.pos);
    }

    #[test]
    fn test_spread_and_jitter_bounds() {
        let tuning = Tuning::default();
        let from = Vec2::new(1700.0, 100.0);
        let target = Vec2::new(700.0, 650.0);
        let (aim, _) = ballistic_velocity(from, target, 400.0, 500.0);
        let mut system = ProjectileSystem::new(from);
        let mut rng = Pcg32::seed_from_u64(42);
        for i in 0..200 {
            system.fire(i as f32, &tuning, &[target], &mut rng);
        }
        for f in &system.fireballs {
            assert!((f.vel.x - aim.x).abs() <= aim.x.abs() * 0.1 + 1e-3);
            assert!((f.vel.y - aim.y).abs() <= aim.y.abs() * 0.1 + 1e-3);
            assert!((f.pos.x - from.x).abs() <= 20.0);
            assert!((f.pos.y - from.y).abs() <= 10.0);
        }
    }

    #[test]
    fn test_fires_on_cadence() {
        let tuning = Tuning::default();
        let targets = Layout::default().fireball_targets;
        let mut system = ProjectileSystem::new(Vec2::new(1700.0, 100.0));
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = EventQueue::default();

        // 0.35s: nothing yet
        for _ in 0..42 {
            system.update(SIM_DT, 0.0, &tuning, &targets, &mut rng, &mut events);
        }
        assert!(system.fireballs.is_empty());
        // Crossing 0.4s fires exactly one
        for _ in 0..8 {
            system.update(SIM_DT, 0.0, &tuning, &targets, &mut rng, &mut events);
        }
        assert_eq!(system.fireballs.len(), 1);
        assert!(system.emitter.timer < SIM_DT * 3.0);
        assert!(matches!(
            events.drain().as_slice(),
            [GameEvent::FireballSpawned { id: 1, .. }]
        ));
    }

    #[test]
    fn test_despawn_below_playfield() {
        let tuning = Tuning::default();
        let mut system = ProjectileSystem::new(Vec2::new(1700.0, 100.0));
        system.emitter.active = false;
        system.spawn_at(Vec2::new(500.0, 1099.0), Vec2::new(0.0, 600.0), 0.0);
        system.spawn_at(Vec2::new(500.0, 500.0), Vec2::new(0.0, 600.0), 0.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = EventQueue::default();
        system.update(SIM_DT, 0.0, &tuning, &[], &mut rng, &mut events);
        assert_eq!(system.fireballs.len(), 1);
        assert_eq!(system.fireballs[0].id, 2);
    }

    #[test]
    fn test_terminal_velocity() {
        let mut f = Fireball {
            id: 1,
            pos: Vec2::ZERO,
            vel: Vec2::new(50.0, 590.0),
            spawn_time: 0.0,
            rotation: 0.0,
        };
        f.integrate(0.1, 500.0, 600.0);
        assert_eq!(f.vel.y, 600.0);
        assert!((f.rotation - heading(f.vel)).abs() < 1e-6);
    }

    #[test]
    fn test_remove_emitter_stops_spawning() {
        let tuning = Tuning::default();
        let targets = Layout::default().fireball_targets;
        let mut system = ProjectileSystem::new(Vec2::new(1700.0, 100.0));
        let mut rng = Pcg32::seed_from_u64(3);
        let mut events = EventQueue::default();
        system.fire(0.0, &tuning, &targets, &mut rng);
        system.fire(0.0, &tuning, &targets, &mut rng);
        assert_eq!(system.remove_emitter(), 2);
        for _ in 0..240 {
            system.update(SIM_DT, 0.0, &tuning, &targets, &mut rng, &mut events);
        }
        assert!(system.fireballs.is_empty());

        system.reset(Vec2::new(1700.0, 100.0));
        assert!(system.emitter.active);
    }
}
