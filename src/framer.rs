//! Streaming framer: turns an arbitrary byte stream into a sequence of
//! length-typed ITCH messages.
//!
//! The framer pulls from any [`Read`] source (file, gzip decoder, socket)
//! through a 64 KiB scratch buffer and never loses alignment: a type byte
//! outside the table is consumed one byte at a time until the stream
//! resynchronises, and a partial message at end-of-stream is reported and
//! dropped rather than emitted.

use std::io::{self, Read};

use bytes::Bytes;

use crate::codec::{message_length, HEADER_LEN};
use crate::models::raw::as_header_raw;

/// Scratch buffer capacity. Refills trigger below half of this, which always
/// leaves room for at least one full message (max message length is 50).
pub const SCRATCH_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Clone)]
///
/// One framed message: the raw bytes of exactly the table-declared length,
/// plus the embedded timestamp when the message carries a header
///
pub struct Frame {
  /// Message type byte
  pub kind: u8,
  /// The complete message, type byte included
  pub bytes: Bytes,
  /// Nanoseconds since midnight; `None` only for table entries shorter than
  /// the common header (none exist today)
  pub timestamp: Option<u64>,
}

/// Counters accumulated while framing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FramerStats {
  pub messages: u64,
  pub bytes: u64,
  /// Bytes skipped by unknown-type resynchronisation
  pub unknown_bytes: u64,
  /// A partial message was dropped at end-of-stream
  pub truncated: bool,
}

#[derive(Debug)]
///
/// Incremental framer over a byte source
///
pub struct MessageStream<S> {
  source: S,
  buf: Box<[u8]>,
  /// First resident byte
  head: usize,
  /// One past the last resident byte
  tail: usize,
  eof: bool,
  stats: FramerStats,
}

impl<S: Read> MessageStream<S> {
  pub fn new(source: S) -> Self {
    Self {
      source,
      buf: vec![0u8; SCRATCH_CAPACITY].into_boxed_slice(),
      head: 0,
      tail: 0,
      eof: false,
      stats: FramerStats::default(),
    }
  }

  pub fn stats(&self) -> FramerStats {
    self.stats
  }

  /// Give back the underlying source.
  pub fn into_source(self) -> S {
    self.source
  }

  #[inline]
  fn resident(&self) -> usize {
    self.tail - self.head
  }

  // Move pending bytes to the front. Runs at most once per buffer-worth of
  // consumed input, keeping compaction amortised O(1) per byte.
  fn compact(&mut self) {
    if self.head > 0 {
      self.buf.copy_within(self.head..self.tail, 0);
      self.tail -= self.head;
      self.head = 0;
    }
  }

  /// One refill attempt: request up to (capacity - resident) bytes from the
  /// source. A zero-byte read marks end-of-stream.
  fn refill(&mut self) -> io::Result<()> {
    if self.eof {
      return Ok(());
    }
    self.compact();
    let n = self.source.read(&mut self.buf[self.tail..])?;
    if n == 0 {
      self.eof = true;
    } else {
      self.tail += n;
    }
    Ok(())
  }

  /// Next complete message, or `None` at clean end-of-stream.
  ///
  /// Framing is refill-invariant: splitting the source stream at any byte
  /// boundary produces the same output.
  pub fn next_message(&mut self) -> io::Result<Option<Frame>> {
    loop {
      if self.resident() < SCRATCH_CAPACITY / 2 && !self.eof {
        self.refill()?;
      }
      if self.resident() == 0 {
        if self.eof {
          return Ok(None);
        }
        continue;
      }

      let kind = self.buf[self.head];
      let len = message_length(kind);
      if len == 0 {
        // Resync: drop the byte, never emit a frame for it.
        log::warn!(
          "unknown message type 0x{:02X}, skipping one byte",
          kind
        );
        self.stats.unknown_bytes += 1;
        self.head += 1;
        continue;
      }

      while self.resident() < len && !self.eof {
        self.refill()?;
      }
      if self.resident() < len {
        log::warn!(
          "truncated trailing message: type '{}', {} of {} bytes",
          kind as char,
          self.resident(),
          len
        );
        self.stats.truncated = true;
        self.head = self.tail;
        return Ok(None);
      }

      let msg = &self.buf[self.head..self.head + len];
      let timestamp = if len >= HEADER_LEN {
        as_header_raw(msg).map(|h| h.timestamp.nanos())
      } else {
        None
      };
      let frame = Frame {
        kind,
        bytes: Bytes::copy_from_slice(msg),
        timestamp,
      };
      self.head += len;
      self.stats.messages += 1;
      self.stats.bytes += len as u64;
      return Ok(Some(frame));
    }
  }
}

impl<S: Read> Iterator for MessageStream<S> {
  type Item = io::Result<Frame>;

  fn next(&mut self) -> Option<Self::Item> {
    self.next_message().transpose()
  }
}
