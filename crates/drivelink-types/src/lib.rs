//! Shared data model for the DriveLink remote-control client.
//!
//! Everything that crosses a crate boundary lives here: the wire-level
//! [`MotorCommand`], the per-tick [`ControlIntent`], the process-wide
//! [`Throttle`] and [`ShutdownFlag`], the supervisor-visible
//! [`SessionState`], and the closed [`TransportError`] taxonomy.

pub mod wire;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One wheel-power snapshot as it appears on the wire.
///
/// `active == false` is the canonical stop command and implies all four
/// power fields are zero.  The invariant is enforced by construction:
/// [`MotorCommand::stop`] is the only way to build an inactive command,
/// and [`MotorCommand::from_sides`] always marks the command active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorCommand {
    pub front_left: i16,
    pub back_left: i16,
    pub front_right: i16,
    pub back_right: i16,
    pub active: bool,
}

impl MotorCommand {
    /// The canonical stop command: inactive, all powers zero.
    pub const fn stop() -> Self {
        Self {
            front_left: 0,
            back_left: 0,
            front_right: 0,
            back_right: 0,
            active: false,
        }
    }

    /// An active driving command.  Front and back wheels on each side carry
    /// the same power; the mixer guarantees both values are already bounded
    /// to the configured maximum.
    pub const fn from_sides(left: i16, right: i16) -> Self {
        Self {
            front_left: left,
            back_left: left,
            front_right: right,
            back_right: right,
            active: true,
        }
    }

    /// `true` for the canonical stop command.
    pub const fn is_stop(&self) -> bool {
        !self.active
    }
}

/// Raw directional intent before mixing, both axes in `[-1, 1]`.
///
/// Owned transiently per control-loop tick; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlIntent {
    pub x: f32,
    pub y: f32,
}

impl ControlIntent {
    /// Build an intent, clamping both axes into `[-1, 1]`.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }

    /// Centred intent (no movement requested).
    pub const fn neutral() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Process-wide throttle scalar in `[0, 1]`, stepped by discrete operator
/// events.  Lives for the entire run and survives reconnects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throttle {
    speed: f32,
    step: f32,
}

impl Throttle {
    pub fn new(initial_speed: f32, step: f32) -> Self {
        Self {
            speed: initial_speed.clamp(0.0, 1.0),
            step,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Step the throttle up, clamping at `1.0`.  Returns the new speed.
    pub fn increase(&mut self) -> f32 {
        self.speed = (self.speed + self.step).min(1.0);
        self.speed
    }

    /// Step the throttle down, clamping at `0.0`.  Returns the new speed.
    pub fn decrease(&mut self) -> f32 {
        self.speed = (self.speed - self.step).max(0.0);
        self.speed
    }
}

/// Connection state as observed by the control loop and the status renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "disconnected"),
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Connected => write!(f, "connected"),
        }
    }
}

/// Cooperative shutdown signal shared by the Ctrl-C handler, the control
/// loop, and the reconnect supervisor.  Cheap to clone.
#[derive(Clone, Debug, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Transport failures the reconnect supervisor knows how to recover from.
///
/// This closed enumeration replaces exception discrimination: every fault a
/// session can produce is one of these two kinds, and both are recoverable
/// via the retry path.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The connect attempt exceeded its bound.
    #[error("connect to {endpoint} timed out after {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },

    /// The peer refused, reset, or otherwise closed the connection, or a
    /// write failed mid-stream.
    #[error("connection to {endpoint} closed: {details}")]
    Closed { endpoint: String, details: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_command_is_inactive_and_zeroed() {
        let cmd = MotorCommand::stop();
        assert!(cmd.is_stop());
        assert_eq!(cmd.front_left, 0);
        assert_eq!(cmd.back_left, 0);
        assert_eq!(cmd.front_right, 0);
        assert_eq!(cmd.back_right, 0);
    }

    #[test]
    fn from_sides_is_active_and_mirrors_front_back() {
        let cmd = MotorCommand::from_sides(120, -80);
        assert!(cmd.active);
        assert_eq!(cmd.front_left, 120);
        assert_eq!(cmd.back_left, 120);
        assert_eq!(cmd.front_right, -80);
        assert_eq!(cmd.back_right, -80);
    }

    #[test]
    fn command_serialization_roundtrip() {
        let cmd = MotorCommand::from_sides(255, -255);
        let json = serde_json::to_string(&cmd).unwrap();
        let back: MotorCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }

    #[test]
    fn intent_clamps_out_of_range_axes() {
        let intent = ControlIntent::new(2.0, -3.5);
        assert_eq!(intent.x, 1.0);
        assert_eq!(intent.y, -1.0);
    }

    #[test]
    fn throttle_increase_clamps_at_one() {
        let mut throttle = Throttle::new(0.9, 0.1);
        assert_eq!(throttle.increase(), 1.0);
        // Stepping past the ceiling stays pinned.
        assert_eq!(throttle.increase(), 1.0);
        assert_eq!(throttle.increase(), 1.0);
    }

    #[test]
    fn throttle_decrease_clamps_at_zero() {
        let mut throttle = Throttle::new(0.15, 0.1);
        assert!((throttle.decrease() - 0.05).abs() < 1e-6);
        assert_eq!(throttle.decrease(), 0.0);
        assert_eq!(throttle.decrease(), 0.0);
    }

    #[test]
    fn throttle_clamps_initial_speed() {
        let throttle = Throttle::new(1.8, 0.1);
        assert_eq!(throttle.speed(), 1.0);
    }

    #[test]
    fn shutdown_flag_is_shared_across_clones() {
        let flag = ShutdownFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_requested());
        flag.request();
        assert!(clone.is_requested());
    }

    #[test]
    fn session_state_display_names() {
        assert_eq!(SessionState::Disconnected.to_string(), "disconnected");
        assert_eq!(SessionState::Connecting.to_string(), "connecting");
        assert_eq!(SessionState::Connected.to_string(), "connected");
    }

    #[test]
    fn transport_error_display_carries_endpoint() {
        let err = TransportError::Closed {
            endpoint: "192.168.1.18:65432".to_string(),
            details: "broken pipe".to_string(),
        };
        assert!(err.to_string().contains("192.168.1.18:65432"));
        assert!(err.to_string().contains("broken pipe"));
    }
}
