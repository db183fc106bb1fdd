//! Scheduling law, sleep cap, minimum-sleep threshold, and wall-clock
//! pacing fidelity.

mod common;

use std::time::Duration;

use common::TS_OPEN;
use itch_replay::{Pacer, MAX_SLEEP};
use tokio::time::Instant;

#[test]
fn rejects_non_positive_speed() {
  assert!(Pacer::new(0.0).is_err());
  assert!(Pacer::new(-1.0).is_err());
  assert!(Pacer::new(f64::NAN).is_err());
  assert!(Pacer::new(f64::INFINITY).is_err());
  assert!(Pacer::new(1.0).is_ok());
}

#[test]
fn unpaced_never_sleeps() {
  let mut pacer = Pacer::unpaced();
  assert!(pacer.is_unpaced());
  let now = Instant::now();
  assert!(pacer.delay_at(Some(TS_OPEN), now).is_none());
  assert!(pacer
    .delay_at(Some(TS_OPEN + 3_600_000_000_000), now)
    .is_none());
}

#[test]
fn first_record_anchors_and_emits_immediately() {
  let mut pacer = Pacer::new(1.0).unwrap();
  let now = Instant::now();
  assert!(pacer.delay_at(Some(TS_OPEN), now).is_none());
}

#[test]
fn delta_scales_with_speed() {
  let now = Instant::now();

  let mut pacer = Pacer::new(1.0).unwrap();
  assert!(pacer.delay_at(Some(TS_OPEN), now).is_none());
  let delay = pacer
    .delay_at(Some(TS_OPEN + 50_000_000), now)
    .expect("should sleep");
  assert_eq!(delay, Duration::from_millis(50));

  let mut pacer = Pacer::new(10.0).unwrap();
  assert!(pacer.delay_at(Some(TS_OPEN), now).is_none());
  let delay = pacer
    .delay_at(Some(TS_OPEN + 50_000_000), now)
    .expect("should sleep");
  assert_eq!(delay, Duration::from_millis(5));
}

#[test]
fn behind_schedule_emits_immediately() {
  let mut pacer = Pacer::new(1.0).unwrap();
  let now = Instant::now();
  assert!(pacer.delay_at(Some(TS_OPEN), now).is_none());
  // Evaluated 100ms later, a 50ms-ahead record is already due.
  let later = now + Duration::from_millis(100);
  assert!(pacer.delay_at(Some(TS_OPEN + 50_000_000), later).is_none());
}

#[test]
fn non_monotonic_timestamps_emit_immediately() {
  let mut pacer = Pacer::new(1.0).unwrap();
  let now = Instant::now();
  assert!(pacer.delay_at(Some(TS_OPEN), now).is_none());
  assert!(pacer.delay_at(Some(TS_OPEN - 1_000_000), now).is_none());
}

#[test]
fn sub_microsecond_delays_are_skipped() {
  let mut pacer = Pacer::new(1.0).unwrap();
  let now = Instant::now();
  assert!(pacer.delay_at(Some(TS_OPEN), now).is_none());
  assert!(pacer.delay_at(Some(TS_OPEN + 500), now).is_none());
}

#[test]
fn long_gap_is_capped_and_rebased() {
  let mut pacer = Pacer::new(1.0).unwrap();
  let now = Instant::now();
  assert!(pacer.delay_at(Some(TS_OPEN), now).is_none());

  // An hour-long halt in the feed sleeps one capped second.
  let halt_end = TS_OPEN + 3_600_000_000_000;
  let delay = pacer.delay_at(Some(halt_end), now).expect("capped sleep");
  assert_eq!(delay, MAX_SLEEP);

  // After the cap the schedule is re-based at the gap record, so the next
  // record paces from there instead of replaying the whole backlog.
  let resumed = now + MAX_SLEEP;
  let delay = pacer
    .delay_at(Some(halt_end + 10_000_000), resumed)
    .expect("should sleep");
  assert_eq!(delay, Duration::from_millis(10));
}

#[test]
fn missing_timestamp_inherits_previous() {
  let mut pacer = Pacer::new(1.0).unwrap();
  let now = Instant::now();
  assert!(pacer.delay_at(None, now).is_none());
  assert!(pacer.delay_at(Some(TS_OPEN), now).is_none());
  // Inherits TS_OPEN: same instant as the anchor, so immediate.
  assert!(pacer.delay_at(None, now).is_none());
  let delay = pacer
    .delay_at(Some(TS_OPEN + 20_000_000), now)
    .expect("should sleep");
  assert_eq!(delay, Duration::from_millis(20));
}

#[tokio::test]
async fn wall_clock_spacing_tracks_feed_deltas() {
  // Two records 50ms apart at speed 1.0.
  let mut pacer = Pacer::new(1.0).unwrap();
  let start = Instant::now();
  pacer.pace(Some(TS_OPEN)).await;
  pacer.pace(Some(TS_OPEN + 50_000_000)).await;
  let elapsed = start.elapsed();
  assert!(
    elapsed >= Duration::from_millis(49),
    "spacing too tight: {:?}",
    elapsed
  );
  assert!(
    elapsed <= Duration::from_millis(150),
    "spacing too loose: {:?}",
    elapsed
  );

  // Same gap at speed 10.0.
  let mut pacer = Pacer::new(10.0).unwrap();
  let start = Instant::now();
  pacer.pace(Some(TS_OPEN)).await;
  pacer.pace(Some(TS_OPEN + 50_000_000)).await;
  let elapsed = start.elapsed();
  assert!(
    elapsed >= Duration::from_millis(4),
    "spacing too tight: {:?}",
    elapsed
  );
  assert!(
    elapsed <= Duration::from_millis(60),
    "spacing too loose: {:?}",
    elapsed
  );
}
