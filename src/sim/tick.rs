//! Per-frame simulation entry point
//!
//! The host calls [`tick`] once per rendered frame with the elapsed time. The
//! frame is clamped and split into fixed-size sub-steps so a stalled frame
//! cannot tunnel the player through a cloud.

use serde::{Deserialize, Serialize};

use super::collision::{Resolution, resolve_contacts};
use super::state::{GamePhase, GameSession};
use crate::consts::*;

/// Input for a single frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Horizontal stick/keys in [-1, 1]
    pub move_x: f32,
    /// Vertical stick/keys in [-1, 1] (negative is up; strongly up jumps)
    pub move_y: f32,
    /// Shield button held
    pub shield_held: bool,
    /// Tap/click/Enter this frame (start, retry)
    pub confirm: bool,
}

/// Number of sub-steps and their length for a frame of `dt` seconds
pub fn substeps(dt: f32) -> (u32, f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };
    if dt == 0.0 {
        return (0, 0.0);
    }
    // Shave float noise so an exact multiple of SIM_DT doesn't gain a step
    let count = ((dt / SIM_DT - 1e-4).ceil() as u32).clamp(1, MAX_SUBSTEPS);
    (count, dt / count as f32)
}

/// Advance the session by one rendered frame
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    if input.confirm {
        handle_confirm(session);
    }

    let (count, step_dt) = substeps(dt);
    let frame_dt = step_dt * count as f32;

    for action in session.timers.advance(frame_dt) {
        session.apply_timer(action);
    }

    for _ in 0..count {
        if !session.is_simulating() {
            break;
        }
        step(session, input, step_dt);
    }
}

/// Confirm starts a run from the title screen and restarts after it ends
fn handle_confirm(session: &mut GameSession) {
    match session.phase {
        GamePhase::Start | GamePhase::GameOver | GamePhase::LevelComplete => session.start(),
        GamePhase::Playing | GamePhase::Dying => {}
    }
}

/// One fixed sub-step: player, world, fireballs, then contact resolution
fn step(session: &mut GameSession, input: &TickInput, dt: f32) {
    session.time += dt;
    session.time_ticks += 1;

    session.player.update(dt, input, &session.tuning);
    session
        .world
        .update(dt, &session.tuning, &mut session.events);
    session.projectiles.update(
        dt,
        session.time,
        &session.tuning,
        &session.layout.fireball_targets,
        &mut session.rng,
        &mut session.events,
    );

    match resolve_contacts(session) {
        Some(Resolution::LevelComplete) => session.begin_level_complete(),
        Some(Resolution::Died(cause)) => session.begin_dying(cause),
        None => {}
    }
}
