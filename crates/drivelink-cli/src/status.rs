//! Single-line terminal status renderer.
//!
//! Redraws one line per tick: toggle state, held drive keys, throttle,
//! session state, and the command that just went out (or would, once the
//! link is up).

use std::io::{self, Write};

use colored::Colorize;
use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};

use drivelink_control::{ControlError, RenderSink, StatusFrame};
use drivelink_types::{MotorCommand, SessionState};

pub struct StatusLine {
    out: io::Stdout,
}

impl StatusLine {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

/// Compact wire-shaped rendering of the last command.  The stop command is
/// abbreviated the way the operator thinks of it.
fn command_json(cmd: &MotorCommand) -> String {
    if cmd.is_stop() {
        return r#"{"active":false}"#.to_string();
    }
    serde_json::to_string(cmd).unwrap_or_else(|_| "<unserialisable>".to_string())
}

fn key_label(label: &str, held: bool) -> String {
    if held {
        label.bright_green().bold().to_string()
    } else {
        label.dimmed().to_string()
    }
}

fn session_label(state: SessionState) -> String {
    match state {
        SessionState::Connected => state.to_string().green().to_string(),
        SessionState::Connecting => state.to_string().yellow().to_string(),
        SessionState::Disconnected => state.to_string().red().to_string(),
    }
}

impl RenderSink for StatusLine {
    fn render(&mut self, frame: &StatusFrame) -> Result<(), ControlError> {
        let toggle = if frame.sending {
            " SENDING ".black().on_green().to_string()
        } else {
            " STOPPED ".white().on_red().to_string()
        };
        let keys = format!(
            "{} {} {} {}",
            key_label("W", frame.held.forward),
            key_label("A", frame.held.left),
            key_label("S", frame.held.backward),
            key_label("D", frame.held.right),
        );
        let line = format!(
            "{}  {}  speed {:>3.0}%  {}  {}",
            toggle,
            keys,
            frame.speed * 100.0,
            session_label(frame.session),
            command_json(&frame.command).dimmed(),
        );

        queue!(self.out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))
            .map_err(|e| ControlError::Render(e.to_string()))?;
        write!(self.out, "{line}").map_err(|e| ControlError::Render(e.to_string()))?;
        self.out
            .flush()
            .map_err(|e| ControlError::Render(e.to_string()))
    }
}
