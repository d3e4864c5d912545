//! Sky Climber - native headless host
//!
//! Runs one scripted playthrough at 60 fps and logs what happened. Rendering
//! hosts drive the same `tick` loop and draw from `HudSnapshot`.
//!
//! Usage: `sky-climber [seed]`. Set `SKY_CLIMBER_TUNING` / `SKY_CLIMBER_LAYOUT`
//! to JSON files to override gameplay constants or the level.

#[cfg(not(target_arch = "wasm32"))]
use sky_climber::{
    GameEvent, GamePhase, GameSession, TickInput, Tuning,
    sim::Layout,
    tick,
    ui::HudSnapshot,
};

#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after two minutes of game time
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u32 = 60 * 120;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sky Climber (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(12345);

    let tuning = Tuning::load_or_default(read_env_file("SKY_CLIMBER_TUNING").as_deref());
    let layout = match read_env_file("SKY_CLIMBER_LAYOUT") {
        Some(json) => Layout::from_json(&json).unwrap_or_else(|e| {
            log::warn!("Rejected layout override ({e}), using default level");
            Layout::default()
        }),
        None => Layout::default(),
    };

    let mut session = GameSession::with_config(seed, tuning, layout);
    let mut frames = 0;

    // Title screen: tap to start
    let start = TickInput {
        confirm: true,
        ..Default::default()
    };
    tick(&mut session, &start, FRAME_DT);

    while frames < MAX_FRAMES {
        let input = autopilot(&session);
        tick(&mut session, &input, FRAME_DT);
        frames += 1;

        for event in session.drain_events() {
            report(&event, session.time);
        }
        if matches!(session.phase, GamePhase::GameOver | GamePhase::LevelComplete) {
            break;
        }
    }

    let hud = HudSnapshot::capture(&session);
    println!(
        "seed {seed}: {} after {:.1}s ({frames} frames)",
        hud.status_line(),
        frames as f32 * FRAME_DT
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn read_env_file(var: &str) -> Option<String> {
    let path = std::env::var(var).ok()?;
    match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read {var}={path}: {e}");
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn report(event: &GameEvent, time: f32) {
    match event {
        GameEvent::FireballSpawned { .. } | GameEvent::CloudArmed { .. } => {
            log::trace!("[{time:6.2}] {event:?}")
        }
        _ => log::info!("[{time:6.2}] {event:?}"),
    }
}

/// Naive bot: walk toward the next cloud up the path and jump when close,
/// shielding against fireballs that get near
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(session: &GameSession) -> TickInput {
    let player = &session.player;

    let threat = session
        .projectiles
        .fireballs
        .iter()
        .any(|f| f.pos.distance(player.pos) < session.tuning.collision_distance * 2.5);
    if threat && player.shield_health > 0 {
        return TickInput {
            shield_held: true,
            ..Default::default()
        };
    }

    // Prefer the key, then the gate, once collectibles are in play
    let world = &session.world;
    let goal = if let Some(gem) = world.gems.first() {
        gem.pos
    } else if let Some(key) = world.key.as_ref().filter(|k| k.active) {
        key.pos
    } else {
        world.gate.pos
    };

    let next_cloud = world
        .clouds
        .iter()
        .filter(|c| c.is_solid && c.pos.y < player.pos.y && c.pos.x > player.pos.x - 50.0)
        .min_by(|a, b| a.pos.distance(goal).total_cmp(&b.pos.distance(goal)));
    let target = next_cloud.map_or(goal, |c| c.pos);

    let dx = target.x - player.pos.x;
    let move_x = (dx / 40.0).clamp(-1.0, 1.0);
    let move_y = if player.grounded && dx.abs() < 220.0 && target.y < player.pos.y {
        -1.0
    } else {
        0.0
    };

    TickInput {
        move_x,
        move_y,
        ..Default::default()
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts embed the library directly
}
