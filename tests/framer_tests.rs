//! Framing behaviour: round-trips, resync, refill-invariance, truncation.

mod common;

use std::io::Cursor;

use common::{add_order, order_executed, system_event, ChunkedReader, TS_OPEN};
use itch_replay::{Frame, MessageStream};

fn collect(stream: &mut MessageStream<impl std::io::Read>) -> Vec<Frame> {
  let mut frames = Vec::new();
  while let Some(frame) = stream.next_message().expect("framing io") {
    frames.push(frame);
  }
  frames
}

fn sample_stream() -> (Vec<Vec<u8>>, Vec<u8>) {
  let messages = vec![
    system_event(TS_OPEN, b'O'),
    add_order(TS_OPEN + 1_000_000, 1, b'B', 100, "AAPL", 1_500_000),
    add_order(TS_OPEN + 2_000_000, 2, b'S', 200, "AAPL", 1_500_100),
    order_executed(TS_OPEN + 3_000_000, 1, 50, 9000),
    system_event(TS_OPEN + 4_000_000, b'C'),
  ];
  let concat = messages.concat();
  (messages, concat)
}

#[test]
fn well_formed_stream_round_trips() {
  let (messages, concat) = sample_stream();
  let mut stream = MessageStream::new(Cursor::new(concat.clone()));
  let frames = collect(&mut stream);

  assert_eq!(frames.len(), messages.len());
  for (frame, msg) in frames.iter().zip(&messages) {
    assert_eq!(frame.kind, msg[0]);
    assert_eq!(&frame.bytes[..], &msg[..]);
    assert_eq!(frame.bytes.len(), itch_replay::message_length(frame.kind));
  }
  // Framer output concatenation equals the input stream.
  let rejoined: Vec<u8> =
    frames.iter().flat_map(|f| f.bytes.to_vec()).collect();
  assert_eq!(rejoined, concat);

  let stats = stream.stats();
  assert_eq!(stats.messages, messages.len() as u64);
  assert_eq!(stats.bytes, concat.len() as u64);
  assert_eq!(stats.unknown_bytes, 0);
  assert!(!stats.truncated);
}

#[test]
fn frames_carry_embedded_timestamps() {
  let (_, concat) = sample_stream();
  let mut stream = MessageStream::new(Cursor::new(concat));
  let frames = collect(&mut stream);
  assert_eq!(frames[0].timestamp, Some(TS_OPEN));
  assert_eq!(frames[1].timestamp, Some(TS_OPEN + 1_000_000));
  assert_eq!(frames[4].timestamp, Some(TS_OPEN + 4_000_000));
}

#[test]
fn empty_input_terminates_cleanly() {
  let mut stream = MessageStream::new(Cursor::new(Vec::new()));
  assert!(stream.next_message().unwrap().is_none());
  assert_eq!(stream.stats().messages, 0);
  assert!(!stream.stats().truncated);
}

#[test]
fn single_unknown_byte_yields_diagnostic_only() {
  let mut stream = MessageStream::new(Cursor::new(vec![0xFFu8]));
  assert!(stream.next_message().unwrap().is_none());
  let stats = stream.stats();
  assert_eq!(stats.messages, 0);
  assert_eq!(stats.unknown_bytes, 1);
  assert!(!stats.truncated);
}

#[test]
fn unknown_byte_resyncs_to_next_message() {
  let mut input = vec![0xFFu8];
  let s1 = system_event(TS_OPEN, b'O');
  input.extend_from_slice(&s1);

  let mut stream = MessageStream::new(Cursor::new(input));
  let frames = collect(&mut stream);
  assert_eq!(frames.len(), 1);
  assert_eq!(&frames[0].bytes[..], &s1[..]);
  assert_eq!(stream.stats().unknown_bytes, 1);
}

#[test]
fn split_reads_do_not_change_framing() {
  let s1 = system_event(TS_OPEN, b'O');

  // The seed split: 5 bytes then 7.
  let mut stream =
    MessageStream::new(ChunkedReader::new(s1.clone(), vec![5, 7]));
  let frames = collect(&mut stream);
  assert_eq!(frames.len(), 1);
  assert_eq!(&frames[0].bytes[..], &s1[..]);
  assert_eq!(frames[0].timestamp, Some(TS_OPEN));
}

#[test]
fn framing_is_invariant_under_any_split() {
  let (_, concat) = sample_stream();
  let mut whole = MessageStream::new(Cursor::new(concat.clone()));
  let expected = collect(&mut whole);

  for split in 1..concat.len() {
    let mut chunked = MessageStream::new(ChunkedReader::new(
      concat.clone(),
      vec![split],
    ));
    let frames = collect(&mut chunked);
    assert_eq!(frames.len(), expected.len(), "split at {}", split);
    for (a, b) in frames.iter().zip(&expected) {
      assert_eq!(a.bytes, b.bytes, "split at {}", split);
      assert_eq!(a.timestamp, b.timestamp, "split at {}", split);
    }
  }

  // One-byte trickle.
  let splits = vec![1; concat.len()];
  let mut trickle =
    MessageStream::new(ChunkedReader::new(concat.clone(), splits));
  let frames = collect(&mut trickle);
  assert_eq!(frames.len(), expected.len());
}

#[test]
fn truncated_trailing_message_is_dropped() {
  let s1 = system_event(TS_OPEN, b'O');
  let a1 = add_order(TS_OPEN + 1, 1, b'B', 100, "AAPL", 1_500_000);
  let mut input = s1.clone();
  input.extend_from_slice(&a1[..20]); // partial add order

  let mut stream = MessageStream::new(Cursor::new(input));
  let frames = collect(&mut stream);
  assert_eq!(frames.len(), 1);
  assert_eq!(&frames[0].bytes[..], &s1[..]);
  let stats = stream.stats();
  assert!(stats.truncated);
  assert_eq!(stats.messages, 1);
}

#[test]
fn gzip_source_frames_identically() {
  use flate2::write::GzEncoder;
  use flate2::Compression;
  use std::io::Write;

  let (_, concat) = sample_stream();
  let dir = std::env::temp_dir();
  let path = dir.join(format!("itch-replay-test-{}.itch.gz", std::process::id()));
  {
    let file = std::fs::File::create(&path).unwrap();
    let mut enc = GzEncoder::new(file, Compression::default());
    enc.write_all(&concat).unwrap();
    enc.finish().unwrap();
  }

  let source = itch_replay::open_source(&path).unwrap();
  let mut stream = MessageStream::new(source);
  let frames = collect(&mut stream);
  let rejoined: Vec<u8> =
    frames.iter().flat_map(|f| f.bytes.to_vec()).collect();
  assert_eq!(rejoined, concat);

  std::fs::remove_file(&path).ok();
}
