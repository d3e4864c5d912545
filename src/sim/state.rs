//! Game session and core simulation types
//!
//! One `GameSession` holds everything a playthrough needs. The host loop owns
//! it and drives it through [`super::tick::tick`].

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::Layout;
use super::player::Player;
use super::projectile::ProjectileSystem;
use super::timer::{TimerAction, Timers};
use super::world::World;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title/info screen, waiting for the first confirm
    Start,
    /// Active gameplay
    Playing,
    /// Death fade in progress (transient)
    Dying,
    /// Run ended, waiting for confirm to retry
    GameOver,
    /// Gate reached, waiting for confirm to replay
    LevelComplete,
}

/// Why the player died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    OutOfHealth,
    Fell,
}

/// Gameplay moments for the host (sounds, banners, screen shake)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    CloudArmed { index: usize },
    CloudVanished { index: usize },
    FireballSpawned { id: u32, target: Vec2 },
    GemCollected { remaining: usize },
    KeyRevealed,
    KeyCollected,
    GateOpened,
    SunRemoved { cleared: usize },
    ShieldHit { shield_health: u8 },
    PlayerHit { health: u8 },
    PlayerDied { cause: DeathCause },
    GameOver,
    GateEntered,
    LevelComplete,
}

/// Maximum undrained events kept (oldest dropped first)
pub const MAX_PENDING_EVENTS: usize = 256;

/// Bounded queue of events waiting for the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Complete state of one playthrough
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub gems_collected: u32,
    pub has_key: bool,
    /// Set the moment the gate is entered; freezes the simulation
    pub level_complete: bool,
    pub player: Player,
    pub world: World,
    pub projectiles: ProjectileSystem,
    pub timers: Timers,
    pub tuning: Tuning,
    pub layout: Layout,
    /// Simulated seconds since the run started
    pub time: f32,
    /// Simulation step counter
    pub time_ticks: u64,
    pub(crate) events: EventQueue,
    pub(crate) rng: Pcg32,
}

impl GameSession {
    /// New session on the start screen with default tuning and layout
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Layout::default())
    }

    pub fn with_config(seed: u64, tuning: Tuning, layout: Layout) -> Self {
        Self {
            seed,
            phase: GamePhase::Start,
            gems_collected: 0,
            has_key: false,
            level_complete: false,
            player: Player::new(layout.player_spawn, &tuning),
            world: World::new(&layout),
            projectiles: ProjectileSystem::new(layout.emitter),
            timers: Timers::default(),
            time: 0.0,
            time_ticks: 0,
            events: EventQueue::default(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            layout,
        }
    }

    /// Restore player, world, projectiles, progress and timers.
    ///
    /// Pending timers are cancelled so a fade from the previous run cannot
    /// fire into this one. The RNG keeps running so each retry differs.
    pub fn reset(&mut self) {
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            log::debug!("Reset cancelled {cancelled} pending timer(s)");
        }
        self.player.reset(self.layout.player_spawn);
        self.world.reset(&self.layout);
        self.projectiles.reset(self.layout.emitter);
        self.gems_collected = 0;
        self.has_key = false;
        self.level_complete = false;
        self.time = 0.0;
        self.time_ticks = 0;
    }

    /// Full reset straight into gameplay
    pub fn start(&mut self) {
        self.reset();
        self.phase = GamePhase::Playing;
        log::info!("Run started (seed {})", self.seed);
        self.events.push(GameEvent::RunStarted);
    }

    /// Whether per-step gameplay updates run
    pub fn is_simulating(&self) -> bool {
        self.phase == GamePhase::Playing && !self.level_complete
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Playing -> Dying. Ignored outside live gameplay, so repeat triggers are harmless.
    pub fn begin_dying(&mut self, cause: DeathCause) {
        if !self.is_simulating() {
            return;
        }
        self.phase = GamePhase::Dying;
        self.timers
            .schedule(TimerAction::FinishDeathFade, self.tuning.death_fade_delay);
        log::info!("Player died ({cause:?})");
        self.events.push(GameEvent::PlayerDied { cause });
    }

    /// Gate entered: freeze the level and schedule the completion screen
    pub fn begin_level_complete(&mut self) {
        if !self.is_simulating() {
            return;
        }
        self.level_complete = true;
        self.projectiles.remove_emitter();
        self.timers.schedule(
            TimerAction::ShowLevelComplete,
            self.tuning.level_complete_delay,
        );
        log::info!("Gate entered after {:.1}s", self.time);
        self.events.push(GameEvent::GateEntered);
    }

    /// Apply an expired timer, if it still matches the current phase
    pub fn apply_timer(&mut self, action: TimerAction) {
        match action {
            TimerAction::FinishDeathFade if self.phase == GamePhase::Dying => {
                self.phase = GamePhase::GameOver;
                log::info!("Game over");
                self.events.push(GameEvent::GameOver);
            }
            TimerAction::ShowLevelComplete
                if self.phase == GamePhase::Playing && self.level_complete =>
            {
                self.phase = GamePhase::LevelComplete;
                log::info!("Level complete");
                self.events.push(GameEvent::LevelComplete);
            }
            _ => log::debug!("Ignoring stale timer {action:?} in {:?}", self.phase),
        }
    }
}
