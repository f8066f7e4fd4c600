//! Reconnect supervisor.
//!
//! Wraps a [`Connector`] in an explicit retry state machine:
//!
//! ```text
//! Disconnected ──connect ok──▶ Connected
//!      ▲  ◀──transport error / close──┘
//!      └── fixed retry delay after every failure or teardown
//! ```
//!
//! Network faults are expected and recoverable: any
//! [`TransportError`](drivelink_types::TransportError) tears the session
//! down (with its one best-effort stop command) and
//! re-arms the retry deadline; nothing ever propagates to the control loop
//! as an error.  The machine terminates only when the shared
//! [`ShutdownFlag`] is set.
//!
//! The supervisor is driven once per control-loop tick ([`maintain`] then
//! [`dispatch`]); it never sleeps on its own, so the tick cadence and the
//! UI stay responsive during outages.
//!
//! [`maintain`]: Supervisor::maintain
//! [`dispatch`]: Supervisor::dispatch

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use drivelink_types::{MotorCommand, SessionState, ShutdownFlag};

use crate::session::{Connector, Session};

enum Link<S> {
    /// No live session.  `retry_at == None` means an attempt may run
    /// immediately (startup); otherwise the deadline gates the next attempt.
    Down { retry_at: Option<Instant> },
    Up(S),
}

/// Owns the connection lifecycle on behalf of the control loop.
pub struct Supervisor<C: Connector> {
    connector: C,
    retry_delay: Duration,
    shutdown: ShutdownFlag,
    link: Link<C::Session>,
    state: SessionState,
}

impl<C: Connector> Supervisor<C> {
    pub fn new(connector: C, retry_delay: Duration, shutdown: ShutdownFlag) -> Self {
        Self {
            connector,
            retry_delay,
            shutdown,
            link: Link::Down { retry_at: None },
            state: SessionState::Disconnected,
        }
    }

    /// Current connection state, for the status renderer.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Advance the state machine by at most one transition.
    ///
    /// When disconnected and the retry deadline has passed, runs one bounded
    /// connect attempt (the control loop accepts the suspension, up to the
    /// connect timeout).  When the shutdown flag is set, tears down any live
    /// session instead.
    pub async fn maintain(&mut self) {
        if self.shutdown.is_requested() {
            if matches!(self.link, Link::Up(_)) {
                self.teardown().await;
            }
            return;
        }

        let due = match &self.link {
            Link::Up(_) => return,
            Link::Down { retry_at: None } => true,
            Link::Down { retry_at: Some(at) } => Instant::now() >= *at,
        };
        if !due {
            return;
        }

        self.state = SessionState::Connecting;
        info!(endpoint = %self.connector.endpoint(), "connecting");
        match self.connector.connect().await {
            Ok(session) => {
                info!(endpoint = %self.connector.endpoint(), "connected");
                self.link = Link::Up(session);
                self.state = SessionState::Connected;
            }
            Err(error) => {
                warn!(%error, retry_in = ?self.retry_delay, "connect failed");
                self.link = Link::Down {
                    retry_at: Some(Instant::now() + self.retry_delay),
                };
                self.state = SessionState::Disconnected;
            }
        }
    }

    /// Submit this tick's command to the live session, if any.
    ///
    /// While disconnected the command is dropped (latest-wins; the next
    /// connected tick carries a fresh snapshot).  A send failure tears the
    /// session down and re-arms the retry deadline.
    pub async fn dispatch(&mut self, cmd: &MotorCommand) {
        let Link::Up(session) = &mut self.link else {
            debug!("no session; dropping command");
            return;
        };
        if let Err(error) = session.send(cmd).await {
            warn!(%error, "send failed; tearing down session");
            self.teardown().await;
        }
    }

    /// Final teardown.  Safe to call in any state; with the shutdown flag
    /// set, subsequent [`maintain`][Self::maintain] calls will not reconnect.
    pub async fn close(&mut self) {
        self.teardown().await;
    }

    async fn teardown(&mut self) {
        let previous = std::mem::replace(
            &mut self.link,
            Link::Down {
                retry_at: Some(Instant::now() + self.retry_delay),
            },
        );
        if let Link::Up(mut session) = previous {
            // The session's shutdown performs the single best-effort stop.
            session.shutdown().await;
        }
        self.state = SessionState::Disconnected;
    }
}
