//! Client-side access to a replay stream.
//!
//! The server writes bare concatenated ITCH messages with no envelope, so
//! the client re-frames with the same type→length table the server used.
//! The connection is a plain blocking TCP read loop; all framing state
//! lives in [`MessageStream`].

use std::io;
use std::net::{SocketAddr, TcpStream};

use crate::framer::{Frame, FramerStats, MessageStream};

#[derive(Debug)]
///
/// A connected replay subscriber that yields framed messages
///
pub struct ReplayClient {
  stream: MessageStream<TcpStream>,
  peer: SocketAddr,
}

impl ReplayClient {
  /// Connect to a replay server.
  pub fn connect(host: &str, port: u16) -> io::Result<Self> {
    let stream = TcpStream::connect((host, port))?;
    let peer = stream.peer_addr()?;
    Ok(Self {
      stream: MessageStream::new(stream),
      peer,
    })
  }

  pub fn peer_addr(&self) -> SocketAddr {
    self.peer
  }

  /// Next framed message; `None` once the server closes the stream.
  pub fn next_frame(&mut self) -> io::Result<Option<Frame>> {
    self.stream.next_message()
  }

  pub fn framer_stats(&self) -> FramerStats {
    self.stream.stats()
  }
}

impl Iterator for ReplayClient {
  type Item = io::Result<Frame>;

  fn next(&mut self) -> Option<Self::Item> {
    self.next_frame().transpose()
  }
}
