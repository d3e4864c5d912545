//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed sub-steps only
//! - Seeded RNG only
//! - Stable iteration order (clouds by index, fireballs by ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod layout;
pub mod player;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod timer;
pub mod world;

pub use collision::{Aabb, Resolution, resolve_contacts};
pub use layout::{CloudSpec, GateSpec, Layout};
pub use player::Player;
pub use projectile::{Emitter, Fireball, ProjectileSystem, ballistic_velocity};
pub use state::{DeathCause, EventQueue, GameEvent, GamePhase, GameSession, MAX_PENDING_EVENTS};
pub use tick::{TickInput, substeps, tick};
pub use timer::{TimerAction, TimerId, Timers};
pub use world::{CLOUD_UNARMED, Cloud, Gate, GateState, Gem, Key, World};
