//! Egress scheduling: spaces message sends so wall-clock deltas track
//! feed-clock deltas divided by the speed multiplier.
//!
//! The schedule is anchor-based: the first timestamped record pins a wall
//! clock anchor and a feed clock anchor, and every later record's egress
//! instant is `wall_anchor + (t - feed_anchor) / speed`. Two policies bound
//! the schedule: any single sleep is capped at one second (a halt or an
//! overnight gap must not stall the stream), and delays under a microsecond
//! are not slept at all because timer wake-up jitter dominates down there.

use std::time::Duration;

use tokio::time::Instant;

use crate::errors::ReplayError;

/// Longest single sleep. After a capped sleep the anchors are re-based to
/// the current record so the lag does not accumulate.
pub const MAX_SLEEP: Duration = Duration::from_secs(1);

/// Delays below this are emitted immediately.
pub const MIN_SLEEP: Duration = Duration::from_micros(1);

#[derive(Debug, Clone, Copy, PartialEq)]
enum PaceMode {
  /// Emit as fast as possible, no scheduling at all
  Unpaced,
  /// Scale feed-clock deltas by 1/multiplier
  Scaled(f64),
}

#[derive(Debug)]
///
/// Computes and waits out the egress deadline for each framed record
///
pub struct Pacer {
  mode: PaceMode,
  anchors: Option<Anchors>,
  /// Most recently observed feed timestamp, inherited by records without one
  last_feed: u64,
}

#[derive(Debug, Clone, Copy)]
struct Anchors {
  wall: Instant,
  feed: u64,
}

impl Pacer {
  /// A pacer that tracks the feed clock scaled by `speed`.
  ///
  /// `speed` must be positive and finite; `1.0` is real-time, `2.0` twice
  /// as fast. For unpaced replay use [`Pacer::unpaced`].
  pub fn new(speed: f64) -> Result<Self, ReplayError> {
    if !speed.is_finite() || speed <= 0.0 {
      return Err(ReplayError::Speed(speed));
    }
    Ok(Self {
      mode: PaceMode::Scaled(speed),
      anchors: None,
      last_feed: 0,
    })
  }

  /// A pacer that never sleeps: every record egresses immediately.
  pub fn unpaced() -> Self {
    Self {
      mode: PaceMode::Unpaced,
      anchors: None,
      last_feed: 0,
    }
  }

  pub fn is_unpaced(&self) -> bool {
    self.mode == PaceMode::Unpaced
  }

  /// Sleep to wait before emitting a record stamped `timestamp`, evaluated
  /// at `now`. `None` means emit immediately.
  ///
  /// Records without a timestamp inherit the most recently observed one.
  /// A record at or behind schedule egresses immediately with no clamping.
  pub fn delay_at(
    &mut self,
    timestamp: Option<u64>,
    now: Instant,
  ) -> Option<Duration> {
    let PaceMode::Scaled(speed) = self.mode else {
      return None;
    };
    let t = match timestamp {
      Some(t) => {
        self.last_feed = t;
        t
      }
      None => self.last_feed,
    };
    let Some(anchors) = self.anchors else {
      // First timestamped record pins the schedule.
      if timestamp.is_some() {
        self.anchors = Some(Anchors { wall: now, feed: t });
      }
      return None;
    };

    if t <= anchors.feed {
      return None;
    }
    let scaled_ns = (t - anchors.feed) as f64 / speed;
    let target = anchors.wall + Duration::from_nanos(scaled_ns as u64);
    if target <= now {
      return None;
    }
    let mut delay = target - now;
    if delay > MAX_SLEEP {
      delay = MAX_SLEEP;
      // Re-base so a long feed gap costs one capped sleep, not many.
      self.anchors = Some(Anchors {
        wall: now + MAX_SLEEP,
        feed: t,
      });
    }
    if delay < MIN_SLEEP {
      return None;
    }
    Some(delay)
  }

  /// Sleep cooperatively until the record's egress deadline.
  pub async fn pace(&mut self, timestamp: Option<u64>) {
    if let Some(delay) = self.delay_at(timestamp, Instant::now()) {
      tokio::time::sleep(delay).await;
    }
  }
}
