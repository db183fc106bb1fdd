//! Session counters and the end-of-stream statistics report.

use std::fmt;
use std::time::Instant;

use crate::codec::type_name;

/// A progress line is due every this many messages.
pub const PROGRESS_INTERVAL: u64 = 100_000;

const BYTES_PER_MIB: f64 = 1_048_576.0;

#[derive(Debug)]
///
/// Running totals for one replay session, server- or client-side
///
pub struct SessionStats {
  total_messages: u64,
  total_bytes: u64,
  by_type: [u64; 256],
  started: Instant,
}

impl SessionStats {
  pub fn new() -> Self {
    Self {
      total_messages: 0,
      total_bytes: 0,
      by_type: [0u64; 256],
      started: Instant::now(),
    }
  }

  /// Count one message. Returns true when a progress line is due.
  pub fn record(&mut self, kind: u8, len: usize) -> bool {
    self.total_messages += 1;
    self.total_bytes += len as u64;
    self.by_type[kind as usize] += 1;
    self.total_messages % PROGRESS_INTERVAL == 0
  }

  pub fn total_messages(&self) -> u64 {
    self.total_messages
  }

  pub fn total_bytes(&self) -> u64 {
    self.total_bytes
  }

  pub fn mib(&self) -> f64 {
    self.total_bytes as f64 / BYTES_PER_MIB
  }

  pub fn count_for(&self, kind: u8) -> u64 {
    self.by_type[kind as usize]
  }

  pub fn elapsed_secs(&self) -> f64 {
    self.started.elapsed().as_secs_f64()
  }
}

impl Default for SessionStats {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for SessionStats {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Guard the rate divisions against a sub-microsecond session.
    let elapsed = self.elapsed_secs().max(1e-6);
    writeln!(f, "=== Statistics ===")?;
    writeln!(f, "Total Messages: {}", self.total_messages)?;
    writeln!(f, "Total Bytes: {:.2} MiB", self.mib())?;
    writeln!(f, "Elapsed Time: {:.2} seconds", self.elapsed_secs())?;
    writeln!(
      f,
      "Message Rate: {:.0} msg/sec",
      self.total_messages as f64 / elapsed
    )?;
    writeln!(f, "Throughput: {:.2} MiB/sec", self.mib() / elapsed)?;
    writeln!(f)?;
    writeln!(f, "Message Type Breakdown:")?;
    for kind in 0u8..=255 {
      let count = self.by_type[kind as usize];
      if count == 0 {
        continue;
      }
      writeln!(
        f,
        "  [{}] {:<25} : {:>10} ({:.1}%)",
        kind as char,
        type_name(kind),
        count,
        100.0 * count as f64 / self.total_messages.max(1) as f64
      )?;
    }
    Ok(())
  }
}
