//! The render collaborator seam.
//!
//! Once per tick the control loop hands the sink everything a status
//! display needs; what the sink draws with it is out of core scope.

use drivelink_types::{MotorCommand, SessionState};

use crate::ControlError;
use crate::input::HeldKeys;

/// One tick's worth of display state.
#[derive(Debug, Clone, Copy)]
pub struct StatusFrame {
    /// The operator's is-sending toggle.
    pub sending: bool,
    /// Directional keys currently held.
    pub held: HeldKeys,
    /// Current throttle in `[0, 1]`.
    pub speed: f32,
    /// Connection state as reported by the supervisor.
    pub session: SessionState,
    /// The command submitted this tick (the canonical stop while idle).
    pub command: MotorCommand,
}

/// Consumes one [`StatusFrame`] per tick and produces a visual frame.
pub trait RenderSink {
    fn render(&mut self, frame: &StatusFrame) -> Result<(), ControlError>;
}
