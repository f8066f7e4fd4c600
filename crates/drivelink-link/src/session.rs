//! The transport seam and its TCP implementation.
//!
//! The supervisor never touches sockets directly; it speaks through the
//! [`Connector`] and [`Session`] traits so tests can inject fakes.  The
//! production pair is [`TcpConnector`] / [`TcpSession`]: a plain TCP byte
//! stream carrying newline-delimited JSON commands.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use drivelink_types::{MotorCommand, TransportError, wire};

/// Produces fresh sessions against a fixed remote endpoint.
#[async_trait]
pub trait Connector: Send {
    type Session: Session + Send;

    /// Attempt one bounded connection to the endpoint.
    async fn connect(&self) -> Result<Self::Session, TransportError>;

    /// Human-readable endpoint description for logs.
    fn endpoint(&self) -> String;
}

/// One live connection to the remote motor controller.
#[async_trait]
pub trait Session: Send {
    /// Encode and transmit one command.  Any partial-write, reset, or
    /// broken-pipe condition surfaces as [`TransportError::Closed`].
    async fn send(&mut self, cmd: &MotorCommand) -> Result<(), TransportError>;

    /// Attempt exactly one best-effort send of the canonical stop command,
    /// then close the underlying connection.  A failed final send is
    /// logged, never escalated; shutdown always completes.
    async fn shutdown(&mut self);
}

/// Connects to a fixed `host:port` with a bounded timeout.
pub struct TcpConnector {
    endpoint: String,
    connect_timeout: Duration,
}

impl TcpConnector {
    pub fn new(endpoint: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout,
        }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    type Session = TcpSession;

    async fn connect(&self) -> Result<TcpSession, TransportError> {
        let stream = tokio::time::timeout(
            self.connect_timeout,
            TcpStream::connect(&self.endpoint),
        )
        .await
        .map_err(|_| TransportError::Timeout {
            endpoint: self.endpoint.clone(),
            timeout: self.connect_timeout,
        })?
        .map_err(|e| TransportError::Closed {
            endpoint: self.endpoint.clone(),
            details: e.to_string(),
        })?;

        // Commands are small and latency-sensitive; never batch them.
        stream.set_nodelay(true).map_err(|e| TransportError::Closed {
            endpoint: self.endpoint.clone(),
            details: format!("set_nodelay: {e}"),
        })?;

        Ok(TcpSession {
            stream,
            endpoint: self.endpoint.clone(),
        })
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }
}

/// A connected TCP session.  Ready to send as soon as the connect completes;
/// there is no handshake beyond the transport-level connect.
pub struct TcpSession {
    stream: TcpStream,
    endpoint: String,
}

#[async_trait]
impl Session for TcpSession {
    async fn send(&mut self, cmd: &MotorCommand) -> Result<(), TransportError> {
        let frame = wire::encode(cmd).map_err(|e| TransportError::Closed {
            endpoint: self.endpoint.clone(),
            details: format!("encode: {e}"),
        })?;
        self.stream
            .write_all(&frame)
            .await
            .map_err(|e| TransportError::Closed {
                endpoint: self.endpoint.clone(),
                details: e.to_string(),
            })
    }

    async fn shutdown(&mut self) {
        match self.send(&MotorCommand::stop()).await {
            Ok(()) => info!(endpoint = %self.endpoint, "sent final stop command"),
            Err(error) => {
                warn!(endpoint = %self.endpoint, %error, "could not send final stop command")
            }
        }
        if let Err(error) = self.stream.shutdown().await {
            debug!(endpoint = %self.endpoint, %error, "socket shutdown failed");
        }
    }
}
