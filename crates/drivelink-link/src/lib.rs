//! Transport layer for the DriveLink client.
//!
//! Two pieces:
//!
//! * [`session`] – the [`Connector`]/[`Session`] seam and its production
//!   TCP implementation.  One session owns exactly one live connection and
//!   always attempts a best-effort stop command before it goes away.
//! * [`supervisor`] – the reconnect state machine that wraps sessions in a
//!   retry loop with a fixed delay, absorbing every transport fault so the
//!   control loop only ever observes `connected / not connected`.

pub mod session;
pub mod supervisor;

pub use session::{Connector, Session, TcpConnector, TcpSession};
pub use supervisor::Supervisor;
