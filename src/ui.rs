//! Per-frame snapshot for the HUD and renderer
//!
//! The host never reads simulation internals directly: it captures a
//! [`HudSnapshot`] after each tick and draws from that.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{GamePhase, GameSession, GateState, TimerAction};

/// Full-screen overlay to draw over the playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Overlay {
    /// Title/instructions card, dismissed by confirm
    Info,
    /// Fading out after death; `progress` runs 0 to 1
    FadeToBlack { progress: f32 },
    GameOver,
    LevelComplete,
}

impl Overlay {
    pub fn for_session(session: &GameSession) -> Option<Self> {
        match session.phase {
            GamePhase::Start => Some(Overlay::Info),
            GamePhase::Playing => None,
            GamePhase::Dying => Some(Overlay::FadeToBlack {
                progress: session
                    .timers
                    .progress(TimerAction::FinishDeathFade)
                    .unwrap_or(1.0),
            }),
            GamePhase::GameOver => Some(Overlay::GameOver),
            GamePhase::LevelComplete => Some(Overlay::LevelComplete),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CloudView {
    pub pos: Vec2,
    pub size: Vec2,
    pub variant: u8,
    pub alpha: f32,
    pub solid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FireballView {
    pub pos: Vec2,
    pub rotation: f32,
}

/// Everything the HUD and renderer need for one frame
#[derive(Debug, Clone, Serialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub overlay: Option<Overlay>,
    pub health: u8,
    pub max_health: u8,
    pub shield_health: u8,
    pub max_shield_health: u8,
    pub is_shielding: bool,
    pub player_pos: Vec2,
    pub player_alpha: f32,
    pub clouds: Vec<CloudView>,
    pub gems: Vec<Vec2>,
    pub gems_collected: u32,
    pub total_gems: usize,
    /// Key position while it is visible and uncollected
    pub key: Option<Vec2>,
    pub has_key: bool,
    pub gate: GateState,
    /// Sun position while it is still in the sky
    pub emitter: Option<Vec2>,
    pub fireballs: Vec<FireballView>,
}

impl HudSnapshot {
    pub fn capture(session: &GameSession) -> Self {
        let player = &session.player;
        let world = &session.world;
        let emitter = &session.projectiles.emitter;

        Self {
            phase: session.phase,
            overlay: Overlay::for_session(session),
            health: player.health,
            max_health: player.max_health,
            shield_health: player.shield_health,
            max_shield_health: player.max_shield_health,
            is_shielding: player.is_shielding,
            player_pos: player.pos,
            player_alpha: player.alpha,
            clouds: world
                .clouds
                .iter()
                .map(|c| CloudView {
                    pos: c.pos,
                    size: c.size,
                    variant: c.variant,
                    alpha: c.alpha,
                    solid: c.is_solid,
                })
                .collect(),
            gems: world.gems.iter().map(|g| g.pos).collect(),
            gems_collected: session.gems_collected,
            total_gems: world.total_gems,
            key: world.key.as_ref().filter(|k| k.active).map(|k| k.pos),
            has_key: session.has_key,
            gate: world.gate.state,
            emitter: emitter.active.then_some(emitter.pos),
            fireballs: session
                .projectiles
                .fireballs
                .iter()
                .map(|f| FireballView {
                    pos: f.pos,
                    rotation: f.rotation,
                })
                .collect(),
        }
    }

    /// Shield meter as a 0..=1 fraction
    pub fn shield_fraction(&self) -> f32 {
        if self.max_shield_health == 0 {
            0.0
        } else {
            self.shield_health as f32 / self.max_shield_health as f32
        }
    }

    /// Compact status line for logs and the headless host
    pub fn status_line(&self) -> String {
        format!(
            "{:?} hp {}/{} shield {}/{} gems {}/{}{}",
            self.phase,
            self.health,
            self.max_health,
            self.shield_health,
            self.max_shield_health,
            self.gems_collected,
            self.total_gems,
            if self.has_key { " +key" } else { "" },
        )
    }
}
