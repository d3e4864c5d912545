//! Collision detection and damage resolution
//!
//! Geometry is plain axis-aligned boxes plus a center-distance test for
//! fireballs. Resolution runs once per step after every entity has moved, in a
//! fixed order: landing, gems, key, gate entry, fireballs, world bounds.
//! Pickups come before damage, so a gem grabbed this step restores the shield
//! before an incoming fireball is checked against it.

use glam::Vec2;

use super::player::Player;
use super::state::{DeathCause, EventQueue, GameEvent, GameSession};
use super::world::World;

/// Axis-aligned box stored as center + half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    /// Strict overlap: boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        d.x < self.half.x + other.half.x && d.y < self.half.y + other.half.y
    }

    /// Horizontal overlap only (used for landing)
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() < self.half.x + other.half.x
    }
}

/// Center-distance hit test (fireballs are treated as points)
#[inline]
pub fn within_distance(a: Vec2, b: Vec2, distance: f32) -> bool {
    a.distance_squared(b) < distance * distance
}

/// Whether a falling body should land on a platform.
///
/// The body must be moving down (or resting), overlap the platform
/// horizontally, touch or overlap it vertically, and have its feet no more than
/// `tolerance` below the platform top.
pub fn lands_on(body: &Aabb, vel_y: f32, platform: &Aabb, tolerance: f32) -> bool {
    vel_y >= 0.0
        && body.overlaps_x(platform)
        && body.bottom() >= platform.top()
        && body.top() < platform.bottom()
        && body.bottom() <= platform.top() + tolerance
}

/// Terminal result of a resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Player walked through the open gate holding the key
    LevelComplete,
    /// Player ran out of health or fell out of the world
    Died(DeathCause),
}

/// Resolve every player interaction for this step.
///
/// Returns the transition the state machine has to make, if any.
pub fn resolve_contacts(session: &mut GameSession) -> Option<Resolution> {
    let GameSession {
        player,
        world,
        projectiles,
        tuning,
        events,
        gems_collected,
        has_key,
        ..
    } = session;

    resolve_platforms(player, world, tuning.landing_tolerance, tuning.cloud_disappear_time, events);

    // Gems
    let player_box = player.bounds();
    let picked = world.collect_gems_touching(&player_box);
    for _ in 0..picked {
        *gems_collected += 1;
        player.restore_shield();
        let remaining = world.gems.len();
        log::debug!("Gem collected ({remaining} left), shield restored");
        events.push(GameEvent::GemCollected { remaining });
    }
    // Also covers a level with no gems, where the key is out from the first step
    if *gems_collected as usize >= world.total_gems && world.reveal_key() {
        log::info!("All gems collected, key revealed");
        events.push(GameEvent::KeyRevealed);
    }

    // Key
    let all_gems = *gems_collected as usize >= world.total_gems;
    let key_touched = world
        .key
        .as_ref()
        .is_some_and(|key| key.active && player_box.overlaps(&key.bounds()));
    if all_gems && key_touched {
        world.key = None;
        *has_key = true;
        world.gate.open();
        let cleared = projectiles.remove_emitter();
        log::info!("Key collected: gate open, sun gone ({cleared} fireballs cleared)");
        events.push(GameEvent::KeyCollected);
        events.push(GameEvent::GateOpened);
        events.push(GameEvent::SunRemoved { cleared });
    }

    // Gate entry
    if *has_key && world.gate.is_open() && player_box.overlaps(&world.gate.entry_box()) {
        return Some(Resolution::LevelComplete);
    }

    // Fireballs
    let mut fatal = false;
    let hit_radius = tuning.collision_distance;
    projectiles.fireballs.retain(|fireball| {
        if !within_distance(fireball.pos, player.pos, hit_radius) || player.invulnerable {
            return true;
        }
        if player.is_shielding && player.shield_health > 0 {
            player.damage_shield();
            events.push(GameEvent::ShieldHit {
                shield_health: player.shield_health,
            });
        } else {
            fatal |= player.take_damage();
            events.push(GameEvent::PlayerHit {
                health: player.health,
            });
        }
        false
    });
    if fatal {
        return Some(Resolution::Died(DeathCause::OutOfHealth));
    }

    // World bounds
    if player.pos.y > tuning.death_y {
        return Some(Resolution::Died(DeathCause::Fell));
    }

    None
}

/// Land the player on clouds and the gate, and keep them out of a closed gate
fn resolve_platforms(
    player: &mut Player,
    world: &mut World,
    tolerance: f32,
    cloud_time: f32,
    events: &mut EventQueue,
) {
    player.grounded = false;

    for (index, cloud) in world.clouds.iter_mut().enumerate() {
        if !cloud.is_solid {
            continue;
        }
        let platform = cloud.bounds();
        if lands_on(&player.bounds(), player.vel.y, &platform, tolerance) {
            player.land_at(platform.top());
            if cloud.arm(cloud_time) {
                log::debug!("Cloud {index} armed");
                events.push(GameEvent::CloudArmed { index });
            }
        }
    }

    let gate = &world.gate;
    let platform = gate.platform_box();
    if lands_on(&player.bounds(), player.vel.y, &platform, tolerance) {
        player.land_at(platform.top());
        return;
    }

    // A closed gate is solid: push the player out along the shallower axis
    let body = player.bounds();
    if !gate.is_open() && body.overlaps(&platform) {
        let side_depth = if body.center.x < platform.center.x {
            body.right() - platform.left()
        } else {
            platform.right() - body.left()
        };
        let below_depth = platform.bottom() - body.top();
        if player.vel.y < 0.0 && below_depth < side_depth {
            // Jumped into its underside: bump the head and fall back
            player.pos.y = platform.bottom() + body.half.y;
            player.vel.y = 0.0;
        } else if body.center.x < platform.center.x {
            player.pos.x = platform.left() - body.half.x;
            player.vel.x = player.vel.x.min(0.0);
        } else {
            player.pos.x = platform.right() + body.half.x;
            player.vel.x = player.vel.x.max(0.0);
        }
    }
}
