//! Crossterm-backed keyboard input source.
//!
//! Terminals report key presses (and OS auto-repeats) but no releases, so
//! a directional key counts as held while its most recent press or repeat
//! falls inside [`HOLD_WINDOW`]; auto-repeat keeps the entry fresh for as
//! long as the key stays down.
//!
//! Bindings: `W`/`A`/`S`/`D` drive, `Enter` toggles streaming, `Space`
//! halts it, `Up`/`Down` step the throttle, `Esc`/`q`/`Ctrl-C` quit.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use drivelink_control::{ControlError, HeldKeys, InputEvent, InputSnapshot, InputSource};

/// How long a press keeps a key "held" without a repeat refreshing it.
/// Comfortably above typical OS auto-repeat intervals.
const HOLD_WINDOW: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, Default)]
struct HoldTracker {
    last_seen: Option<Instant>,
}

impl HoldTracker {
    fn mark(&mut self, at: Instant) {
        self.last_seen = Some(at);
    }

    fn is_held(&self, now: Instant) -> bool {
        self.last_seen
            .is_some_and(|at| now.duration_since(at) < HOLD_WINDOW)
    }
}

/// Keyboard source reading raw-mode events from the controlling terminal.
pub struct KeyboardSource {
    forward: HoldTracker,
    backward: HoldTracker,
    left: HoldTracker,
    right: HoldTracker,
}

impl KeyboardSource {
    /// Switch the terminal into raw mode; restored on drop.
    pub fn new() -> Result<Self, ControlError> {
        terminal::enable_raw_mode().map_err(|e| ControlError::Input(e.to_string()))?;
        Ok(Self {
            forward: HoldTracker::default(),
            backward: HoldTracker::default(),
            left: HoldTracker::default(),
            right: HoldTracker::default(),
        })
    }
}

impl Drop for KeyboardSource {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl InputSource for KeyboardSource {
    fn events(&mut self) -> Result<Vec<InputEvent>, ControlError> {
        let mut out = Vec::new();
        // Drain everything already queued without blocking the tick.
        while event::poll(Duration::ZERO).map_err(|e| ControlError::Input(e.to_string()))? {
            let read = event::read().map_err(|e| ControlError::Input(e.to_string()))?;
            let Event::Key(key) = read else { continue };
            if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                continue;
            }
            let now = Instant::now();
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    out.push(InputEvent::Quit)
                }
                KeyCode::Char('w') | KeyCode::Char('W') => self.forward.mark(now),
                KeyCode::Char('s') | KeyCode::Char('S') => self.backward.mark(now),
                KeyCode::Char('a') | KeyCode::Char('A') => self.left.mark(now),
                KeyCode::Char('d') | KeyCode::Char('D') => self.right.mark(now),
                KeyCode::Enter => out.push(InputEvent::ToggleSending),
                KeyCode::Char(' ') => out.push(InputEvent::HaltSending),
                KeyCode::Up => out.push(InputEvent::SpeedUp),
                KeyCode::Down => out.push(InputEvent::SpeedDown),
                KeyCode::Esc | KeyCode::Char('q') => out.push(InputEvent::Quit),
                _ => {}
            }
        }
        Ok(out)
    }

    fn snapshot(&mut self) -> Result<InputSnapshot, ControlError> {
        let now = Instant::now();
        Ok(InputSnapshot {
            held: HeldKeys {
                forward: self.forward.is_held(now),
                backward: self.backward.is_held(now),
                left: self.left.is_held(now),
                right: self.right.is_held(now),
            },
            stick: None,
        })
    }
}
