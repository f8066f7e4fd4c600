//! Control core for the DriveLink client.
//!
//! * [`mixer`] – pure tank-mixing math, no I/O.
//! * [`input`] – the abstract input collaborator: polled snapshots plus a
//!   discrete event queue, sourced from a keyboard or a joystick mapping.
//! * [`render`] – the abstract render collaborator fed once per tick.
//! * [`pilot`] – the top-level control loop driving input, mixing,
//!   dispatch, and rendering at a fixed cadence.

pub mod input;
pub mod mixer;
pub mod pilot;
pub mod render;

use thiserror::Error;

pub use input::{HeldKeys, InputEvent, InputSnapshot, InputSource, StickInput};
pub use pilot::{Pilot, PilotConfig};
pub use render::{RenderSink, StatusFrame};

/// Collaborator failures.  Unlike transport faults these are not retried:
/// a broken input or render collaborator terminates the run (after the
/// final best-effort stop).
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("input source failed: {0}")]
    Input(String),

    #[error("render sink failed: {0}")]
    Render(String),
}
