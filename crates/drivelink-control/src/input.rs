//! The input collaborator seam.
//!
//! The control loop consumes an abstract snapshot (held directional keys
//! and/or a joystick reading) plus a queue of discrete events.  Concrete
//! sources live outside the core: the CLI ships a keyboard source, and a
//! gamepad backend plugs in through the same trait by filling
//! [`StickInput`] from its axes.

use drivelink_types::ControlIntent;

use crate::ControlError;
use crate::mixer::apply_dead_zone;

/// Discrete operator events, drained once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Flip the is-sending toggle.
    ToggleSending,
    /// Force sending off (panic key).
    HaltSending,
    SpeedUp,
    SpeedDown,
    Quit,
}

/// Which directional keys are currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Digital keys become unit intent components; opposing keys cancel.
    pub fn to_intent(self) -> ControlIntent {
        let mut x = 0.0;
        let mut y = 0.0;
        if self.forward {
            y += 1.0;
        }
        if self.backward {
            y -= 1.0;
        }
        if self.left {
            x -= 1.0;
        }
        if self.right {
            x += 1.0;
        }
        ControlIntent::new(x, y)
    }
}

/// Raw joystick reading.
///
/// `turn` is the left-stick X axis, `forward` the right-stick Y axis with
/// the sign already flipped so positive means forward, and `trigger` the
/// right trigger's raw `[-1, 1]` range (unpressed = `-1`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickInput {
    pub turn: f32,
    pub forward: f32,
    pub trigger: f32,
}

impl StickInput {
    /// Dead-zone-filtered directional intent.
    pub fn to_intent(self, dead_zone: f32) -> ControlIntent {
        ControlIntent::new(
            apply_dead_zone(self.turn, dead_zone),
            apply_dead_zone(self.forward, dead_zone),
        )
    }

    /// Trigger normalised to `[0, 1]`; acts as a momentary throttle floor.
    pub fn boost(self) -> f32 {
        ((self.trigger + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

/// Per-tick polled snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub held: HeldKeys,
    pub stick: Option<StickInput>,
}

impl InputSnapshot {
    /// Directional intent for this tick.  An off-centre stick wins over the
    /// keys; a centred (or absent) stick falls back to them.
    pub fn intent(&self, dead_zone: f32) -> ControlIntent {
        if let Some(stick) = self.stick {
            let intent = stick.to_intent(dead_zone);
            if intent.x != 0.0 || intent.y != 0.0 {
                return intent;
            }
        }
        self.held.to_intent()
    }

    /// Momentary throttle floor from the trigger, `0.0` without a stick.
    pub fn boost(&self) -> f32 {
        self.stick.map(StickInput::boost).unwrap_or(0.0)
    }
}

/// The input collaborator: a polled snapshot plus an event queue.
pub trait InputSource {
    fn events(&mut self) -> Result<Vec<InputEvent>, ControlError>;
    fn snapshot(&mut self) -> Result<InputSnapshot, ControlError>;
}
