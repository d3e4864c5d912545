//! Level entities: cloud platforms, gems, the key and the gate

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::layout::{CloudSpec, GateSpec, Layout};
use super::state::{EventQueue, GameEvent};
use crate::tuning::Tuning;

/// `disappear_timer` value for a cloud nobody has stood on yet
pub const CLOUD_UNARMED: f32 = -1.0;

/// A floating cloud platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: Vec2,
    pub collision_size: Vec2,
    pub variant: u8,
    /// -1 until first landed on, then seconds left before it stops being solid
    pub disappear_timer: f32,
    pub is_solid: bool,
    /// Sprite opacity (visual only)
    pub alpha: f32,
}

impl Cloud {
    pub fn from_spec(spec: &CloudSpec) -> Self {
        Self {
            pos: spec.pos,
            size: spec.size,
            collision_size: spec.collision_size,
            variant: spec.variant,
            disappear_timer: CLOUD_UNARMED,
            is_solid: true,
            alpha: 1.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.collision_size)
    }

    pub fn is_armed(&self) -> bool {
        self.disappear_timer >= 0.0
    }

    /// Start the countdown. Returns false if it was already running or finished.
    pub fn arm(&mut self, duration: f32) -> bool {
        if self.is_armed() || !self.is_solid {
            return false;
        }
        self.disappear_timer = duration;
        true
    }

    /// Count down an armed cloud. Returns true on the step it stops being solid.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.disappear_timer <= 0.0 {
            return false;
        }
        self.disappear_timer -= dt;
        self.alpha = match self.disappear_timer {
            t if t > 4.0 => 1.0,
            t if t > 2.0 => 0.6,
            _ => 0.2,
        };
        if self.disappear_timer <= 0.0 {
            self.disappear_timer = 0.0;
            self.is_solid = false;
            return true;
        }
        false
    }
}

/// Bob a collectible between `base_y ± amplitude`, flipping at each bound
fn float_step(y: &mut f32, dir: &mut f32, base_y: f32, dt: f32, tuning: &Tuning) {
    if *y <= base_y - tuning.float_amplitude {
        *dir = 1.0;
    } else if *y >= base_y + tuning.float_amplitude {
        *dir = -1.0;
    }
    *y += *dir * tuning.float_speed * dt;
}

/// A shield-restoring gem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gem {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub base_y: f32,
    pub float_dir: f32,
}

impl Gem {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }
}

/// The gate key (hidden until every gem is collected)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Key {
    pub pos: Vec2,
    pub size: Vec2,
    pub base_y: f32,
    pub float_dir: f32,
    /// Visible and collectible
    pub active: bool,
}

impl Key {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    Closed,
    Open,
}

/// The level exit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub pos: Vec2,
    pub size: Vec2,
    pub base_height: f32,
    pub state: GateState,
}

impl Gate {
    pub fn from_spec(spec: &GateSpec) -> Self {
        Self {
            pos: spec.pos,
            size: spec.size,
            base_height: spec.base_height,
            state: GateState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == GateState::Open
    }

    pub fn open(&mut self) {
        self.state = GateState::Open;
    }

    pub fn close(&mut self) {
        self.state = GateState::Closed;
    }

    /// Doorway region that finishes the level
    pub fn entry_box(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    /// Solid part of the gate: the whole thing while closed, only the base once open
    pub fn platform_box(&self) -> Aabb {
        match self.state {
            GateState::Closed => self.entry_box(),
            GateState::Open => {
                let bottom = self.pos.y + self.size.y / 2.0;
                Aabb::from_center_size(
                    Vec2::new(self.pos.x, bottom - self.base_height / 2.0),
                    Vec2::new(self.size.x, self.base_height),
                )
            }
        }
    }
}

/// Clouds, collectibles and the gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub clouds: Vec<Cloud>,
    /// Gems still in play (collected gems are removed)
    pub gems: Vec<Gem>,
    /// Gems placed at level start
    pub total_gems: usize,
    /// None once collected
    pub key: Option<Key>,
    pub gate: Gate,
}

impl World {
    pub fn new(layout: &Layout) -> Self {
        let mut world = Self {
            clouds: Vec::new(),
            gems: Vec::new(),
            total_gems: 0,
            key: None,
            gate: Gate::from_spec(&layout.gate),
        };
        world.reset(layout);
        world
    }

    /// Rebuild every entity from the layout
    pub fn reset(&mut self, layout: &Layout) {
        self.clouds = layout.clouds.iter().map(Cloud::from_spec).collect();
        self.gems = layout
            .gems
            .iter()
            .zip(0u32..)
            .map(|(&pos, id)| Gem {
                id,
                pos,
                size: layout.gem_size,
                base_y: pos.y,
                float_dir: 1.0,
            })
            .collect();
        self.total_gems = self.gems.len();
        self.key = Some(Key {
            pos: layout.key,
            size: layout.key_size,
            base_y: layout.key.y,
            float_dir: 1.0,
            active: false,
        });
        self.gate = Gate::from_spec(&layout.gate);
    }

    /// Cloud decay and collectible float
    pub fn update(&mut self, dt: f32, tuning: &Tuning, events: &mut EventQueue) {
        for (index, cloud) in self.clouds.iter_mut().enumerate() {
            if cloud.update(dt) {
                log::debug!("Cloud {index} vanished");
                events.push(GameEvent::CloudVanished { index });
            }
        }

        for gem in &mut self.gems {
            float_step(&mut gem.pos.y, &mut gem.float_dir, gem.base_y, dt, tuning);
        }

        if let Some(key) = self.key.as_mut().filter(|k| k.active) {
            float_step(&mut key.pos.y, &mut key.float_dir, key.base_y, dt, tuning);
        }
    }

    /// Remove every gem overlapping `body`, returning how many were taken
    pub fn collect_gems_touching(&mut self, body: &Aabb) -> usize {
        let before = self.gems.len();
        self.gems.retain(|gem| !body.overlaps(&gem.bounds()));
        before - self.gems.len()
    }

    /// Make the key visible. Returns true if it was hidden.
    pub fn reveal_key(&mut self) -> bool {
        match self.key.as_mut() {
            Some(key) if !key.active => {
                key.active = true;
                true
            }
            _ => false,
        }
    }

    pub fn key_visible(&self) -> bool {
        self.key.as_ref().is_some_and(|k| k.active)
    }
}
