use std::fmt;
use std::io;

#[derive(Debug, Clone)]
/// Errors that can occur while decoding a framed ITCH message
pub struct DecodeError(pub String);

impl fmt::Display for DecodeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl std::error::Error for DecodeError {}

#[derive(Debug)]
/// Errors surfaced by the replay server and client
pub enum ReplayError {
  /// Speed multiplier was zero, negative, or not finite
  Speed(f64),
  /// Subscriber slot table is full
  Capacity(usize),
  /// Underlying socket or file failure
  Io(io::Error),
}

impl fmt::Display for ReplayError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReplayError::Speed(m) => {
        write!(f, "invalid speed multiplier: {} (must be > 0)", m)
      }
      ReplayError::Capacity(n) => {
        write!(f, "subscriber capacity reached ({} slots)", n)
      }
      ReplayError::Io(e) => write!(f, "{}", e),
    }
  }
}

impl std::error::Error for ReplayError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReplayError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReplayError {
  fn from(e: io::Error) -> Self {
    ReplayError::Io(e)
  }
}
