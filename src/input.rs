//! Touch and keyboard mapping into [`TickInput`]
//!
//! The on-screen controls are a virtual joystick in the bottom-left corner and
//! a round shield button in the bottom-right. Keyboard keys override the stick
//! axis they cover.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Default joystick placement and reach (screen pixels)
pub const JOYSTICK_CENTER: Vec2 = Vec2::new(100.0, 980.0);
pub const JOYSTICK_RADIUS: f32 = 60.0;
/// Default shield button placement and hit radius
pub const SHIELD_BUTTON_CENTER: Vec2 = Vec2::new(1820.0, 980.0);
pub const SHIELD_BUTTON_RADIUS: f32 = 60.0;

/// Virtual analog stick driven by a pointer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Joystick {
    pub center: Vec2,
    pub radius: f32,
    /// A pointer grabbed the stick and has not been released
    pub active: bool,
    /// Current deflection, each component in [-1, 1] and length <= 1
    axis: Vec2,
}

impl Default for Joystick {
    fn default() -> Self {
        Self::new(JOYSTICK_CENTER, JOYSTICK_RADIUS)
    }
}

impl Joystick {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(f32::EPSILON),
            active: false,
            axis: Vec2::ZERO,
        }
    }

    /// Grab the stick if the pointer lands inside it. Returns true when grabbed.
    pub fn press(&mut self, pointer: Vec2) -> bool {
        if pointer.distance(self.center) > self.radius {
            return false;
        }
        self.active = true;
        self.drag(pointer);
        true
    }

    /// Follow the pointer; positions past the rim are clamped onto it
    pub fn drag(&mut self, pointer: Vec2) {
        if !self.active {
            return;
        }
        let offset = pointer - self.center;
        self.axis = if offset.length() <= self.radius {
            offset / self.radius
        } else {
            offset.normalize_or_zero()
        };
    }

    pub fn release(&mut self) {
        self.active = false;
        self.axis = Vec2::ZERO;
    }

    pub fn axis(&self) -> Vec2 {
        self.axis
    }

    /// Where to draw the knob relative to `center`
    pub fn knob_offset(&self) -> Vec2 {
        self.axis * self.radius
    }
}

/// Circular touch button
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchButton {
    pub center: Vec2,
    pub radius: f32,
    pub held: bool,
}

impl TouchButton {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            held: false,
        }
    }

    pub fn press(&mut self, pointer: Vec2) -> bool {
        if pointer.distance(self.center) <= self.radius {
            self.held = true;
        }
        self.held
    }

    pub fn release(&mut self) {
        self.held = false;
    }
}

/// Keys currently held (arrows/WASD for movement, space for the shield)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub shield: bool,
}

/// Every control surface the host feeds, folded into one [`TickInput`] per frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Controls {
    pub joystick: Joystick,
    pub shield_button: TouchButton,
    pub keys: KeyboardState,
    /// Tap/click/Enter since the last frame
    confirm: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            joystick: Joystick::default(),
            shield_button: TouchButton::new(SHIELD_BUTTON_CENTER, SHIELD_BUTTON_RADIUS),
            keys: KeyboardState::default(),
            confirm: false,
        }
    }
}

impl Controls {
    /// A pointer went down: any tap confirms, then the stick and button get a look
    pub fn pointer_down(&mut self, pointer: Vec2) {
        self.confirm = true;
        self.joystick.press(pointer);
        self.shield_button.press(pointer);
    }

    pub fn pointer_move(&mut self, pointer: Vec2) {
        self.joystick.drag(pointer);
    }

    /// Lifting the pointer lets go of both the stick and the button
    pub fn pointer_up(&mut self) {
        self.joystick.release();
        self.shield_button.release();
    }

    pub fn confirm(&mut self) {
        self.confirm = true;
    }

    /// Build this frame's input and clear one-shot flags
    pub fn take_input(&mut self) -> TickInput {
        let input = merge(self.joystick.axis(), &self.keys, self.shield_button.held, self.confirm);
        self.confirm = false;
        input
    }
}

/// Keys win over the stick on the axis they cover
pub fn merge(axis: Vec2, keys: &KeyboardState, shield_button: bool, confirm: bool) -> TickInput {
    let mut move_x = axis.x;
    if keys.left {
        move_x = -1.0;
    } else if keys.right {
        move_x = 1.0;
    }
    let move_y = if keys.up { -1.0 } else { axis.y };

    TickInput {
        move_x: move_x.clamp(-1.0, 1.0),
        move_y: move_y.clamp(-1.0, 1.0),
        shield_held: shield_button || keys.shield,
        confirm,
    }
}
