//! Static level layout
//!
//! Positions are entity centers in screen space (+y down) on a 1920x1080 playfield.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::{ConfigError, ensure};

/// One cloud platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudSpec {
    pub pos: Vec2,
    /// Sprite size
    pub size: Vec2,
    /// Collision box size
    pub collision_size: Vec2,
    /// Which of the three cloud sprites to draw
    #[serde(default)]
    pub variant: u8,
}

impl CloudSpec {
    fn new(x: f32, y: f32, w: f32, h: f32, variant: u8) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            collision_size: Vec2::new(w, h),
            variant,
        }
    }
}

/// Goal gate placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSpec {
    /// Center of the doorway (entry box)
    pub pos: Vec2,
    pub size: Vec2,
    /// Height of the solid base that stays a platform once the gate opens
    pub base_height: f32,
}

/// Everything placed in the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Player body center at spawn (feet resting on the first cloud)
    pub player_spawn: Vec2,
    /// The sun: fireball emitter
    pub emitter: Vec2,
    pub clouds: Vec<CloudSpec>,
    pub gems: Vec<Vec2>,
    pub gem_size: Vec2,
    pub key: Vec2,
    pub key_size: Vec2,
    pub gate: GateSpec,
    /// Points the sun aims at (one per cloud on the climbing path)
    pub fireball_targets: Vec<Vec2>,
}

impl Default for Layout {
    fn default() -> Self {
        // Eight clouds climbing from bottom-left to the gate at top-right
        let clouds = vec![
            CloudSpec::new(200.0, 850.0, 180.0, 60.0, 1),
            CloudSpec::new(450.0, 750.0, 170.0, 55.0, 2),
            CloudSpec::new(700.0, 650.0, 175.0, 60.0, 3),
            CloudSpec::new(800.0, 550.0, 180.0, 65.0, 1),
            CloudSpec::new(1000.0, 450.0, 170.0, 55.0, 2),
            CloudSpec::new(1200.0, 350.0, 175.0, 60.0, 3),
            CloudSpec::new(1350.0, 280.0, 160.0, 55.0, 1),
            CloudSpec::new(1500.0, 250.0, 180.0, 65.0, 2),
        ];
        let fireball_targets = clouds.iter().map(|c| c.pos).collect();

        Self {
            player_spawn: Vec2::new(200.0, 787.0),
            emitter: Vec2::new(1700.0, 100.0),
            clouds,
            gems: vec![
                Vec2::new(450.0, 720.0),
                Vec2::new(700.0, 620.0),
                Vec2::new(1000.0, 420.0),
            ],
            gem_size: Vec2::splat(24.0),
            key: Vec2::new(800.0, 520.0),
            key_size: Vec2::splat(32.0),
            gate: GateSpec {
                pos: Vec2::new(1500.0, 160.0),
                size: Vec2::new(120.0, 120.0),
                base_height: 40.0,
            },
            fireball_targets,
        }
    }
}

impl Layout {
    /// Parse and validate a layout from JSON. Missing tables keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let layout: Layout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(!self.clouds.is_empty(), "clouds", "must not be empty")?;
        ensure(
            !self.fireball_targets.is_empty(),
            "fireball_targets",
            "must not be empty",
        )?;
        for cloud in &self.clouds {
            ensure(
                cloud.pos.is_finite() && cloud.collision_size.min_element() > 0.0,
                "clouds",
                "collision size must be positive",
            )?;
        }
        ensure(
            self.gem_size.min_element() > 0.0 && self.key_size.min_element() > 0.0,
            "gem_size",
            "pickup sizes must be positive",
        )?;
        ensure(
            self.gate.size.min_element() > 0.0
                && self.gate.base_height > 0.0
                && self.gate.base_height <= self.gate.size.y,
            "gate",
            "base must fit inside a positive-sized gate",
        )?;
        let points = [self.player_spawn, self.emitter, self.key]
            .into_iter()
            .chain(self.gems.iter().copied())
            .chain(self.fireball_targets.iter().copied());
        for p in points {
            ensure(p.is_finite(), "layout", "positions must be finite")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_valid() {
        let layout = Layout::default();
        assert!(layout.validate().is_ok());
        assert_eq!(layout.clouds.len(), 8);
        assert_eq!(layout.gems.len(), 3);
        assert_eq!(layout.fireball_targets.len(), 8);
    }

    #[test]
    fn test_spawn_rests_on_first_cloud() {
        let layout = Layout::default();
        let cloud = &layout.clouds[0];
        let cloud_top = cloud.pos.y - cloud.collision_size.y / 2.0;
        let feet = layout.player_spawn.y + crate::consts::PLAYER_HEIGHT / 2.0;
        assert!((feet - cloud_top).abs() < 0.01);
    }

    #[test]
    fn test_empty_targets_rejected() {
        let err = Layout::from_json(r#"{ "fireball_targets": [] }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "fireball_targets",
                ..
            }
        ));
    }

    #[test]
    fn test_json_override() {
        let layout = Layout::from_json(r#"{ "key": [420.0, 400.0] }"#).expect("valid layout");
        assert_eq!(layout.key, Vec2::new(420.0, 400.0));
        assert_eq!(layout.clouds.len(), 8);
    }
}
