//! Fan-out of paced messages to every connected subscriber.
//!
//! Subscribers live in a fixed-capacity slot table behind a single mutex
//! shared with the acceptor. Delivery writes the exact byte slice to every
//! active slot in index order; a slot whose write fails is retired and its
//! socket closed exactly once, after which the slot index is reusable.

use std::io;
use std::net::SocketAddr;

use smallvec::SmallVec;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::errors::ReplayError;

/// Default subscriber capacity.
pub const MAX_SUBSCRIBERS: usize = 32;

#[derive(Debug)]
struct Subscriber {
  stream: TcpStream,
  peer: SocketAddr,
}

#[derive(Debug)]
///
/// Fixed-capacity subscriber set with slot reuse
///
pub struct Broadcaster {
  slots: Mutex<Vec<Option<Subscriber>>>,
}

impl Broadcaster {
  pub fn new() -> Self {
    Self::with_capacity(MAX_SUBSCRIBERS)
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      slots: Mutex::new((0..capacity).map(|_| None).collect()),
    }
  }

  /// Admit a subscriber into the lowest free slot and return its index.
  /// Fails with [`ReplayError::Capacity`] when every slot is active.
  pub async fn attach(
    &self,
    stream: TcpStream,
    peer: SocketAddr,
  ) -> Result<usize, ReplayError> {
    let mut slots = self.slots.lock().await;
    match slots.iter_mut().enumerate().find(|(_, s)| s.is_none()) {
      Some((index, slot)) => {
        *slot = Some(Subscriber { stream, peer });
        Ok(index)
      }
      None => Err(ReplayError::Capacity(slots.len())),
    }
  }

  /// Write `bytes` to every active subscriber, retiring each one whose
  /// write fails. Returns the number of subscribers still active.
  ///
  /// Writes block per-subscriber; there is no extra buffering beyond the
  /// OS socket buffers, so a slow subscriber slows the whole fan-out.
  pub async fn deliver(&self, bytes: &[u8]) -> usize {
    let mut slots = self.slots.lock().await;
    let mut retired: SmallVec<[usize; 4]> = SmallVec::new();
    for (index, slot) in slots.iter_mut().enumerate() {
      let Some(sub) = slot.as_mut() else {
        continue;
      };
      if let Err(e) = sub.stream.write_all(bytes).await {
        if is_disconnect(&e) {
          log::info!("subscriber {} ({}) disconnected", index, sub.peer);
        } else {
          log::warn!(
            "subscriber {} ({}) write failed: {}",
            index,
            sub.peer,
            e
          );
        }
        retired.push(index);
      }
    }
    for &index in &retired {
      // Dropping the subscriber closes its socket.
      slots[index] = None;
    }
    slots.iter().filter(|s| s.is_some()).count()
  }

  pub async fn active_count(&self) -> usize {
    let slots = self.slots.lock().await;
    slots.iter().filter(|s| s.is_some()).count()
  }

  /// Retire every subscriber, shutting each socket down in order.
  pub async fn shutdown(&self) {
    let mut slots = self.slots.lock().await;
    for slot in slots.iter_mut() {
      if let Some(mut sub) = slot.take() {
        let _ = sub.stream.shutdown().await;
      }
    }
  }
}

impl Default for Broadcaster {
  fn default() -> Self {
    Self::new()
  }
}

/// Disconnect-class write errors retire the subscriber silently; anything
/// else is logged as a transport failure for that subscriber.
fn is_disconnect(e: &io::Error) -> bool {
  matches!(
    e.kind(),
    io::ErrorKind::BrokenPipe
      | io::ErrorKind::ConnectionReset
      | io::ErrorKind::ConnectionAborted
  )
}
