//! Newline-delimited JSON wire codec.
//!
//! One [`MotorCommand`] per line: the encoder emits a single JSON object
//! terminated by `\n`, and the peer parses exactly one line per command.
//! The newline terminator makes frame boundaries unambiguous even when the
//! transport coalesces writes or delivers partial reads.

use thiserror::Error;

use crate::MotorCommand;

/// Codec failures.
///
/// `Encode` is practically unreachable for [`MotorCommand`] but keeps the
/// seam honest about serialisation; `Decode` covers truncated or malformed
/// frames seen by the reference decoder.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("command serialisation failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("command parse failed: {0}")]
    Decode(String),
}

/// Serialise `cmd` as one JSON object terminated by `\n`.
pub fn encode(cmd: &MotorCommand) -> Result<Vec<u8>, WireError> {
    let mut frame = serde_json::to_vec(cmd).map_err(WireError::Encode)?;
    frame.push(b'\n');
    Ok(frame)
}

/// Reference decoder: parse exactly one newline-terminated command from the
/// front of `buf`, returning the command and the number of bytes consumed.
///
/// Errors when `buf` holds no terminator yet (partial frame) or when the
/// line is not a valid command object.
pub fn decode(buf: &[u8]) -> Result<(MotorCommand, usize), WireError> {
    let line_end = buf
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| WireError::Decode("no frame terminator in buffer".to_string()))?;
    let cmd = serde_json::from_slice(&buf[..line_end])
        .map_err(|e| WireError::Decode(e.to_string()))?;
    Ok((cmd, line_end + 1))
}
