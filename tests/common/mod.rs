#![allow(dead_code)]

use std::io::Read;

use itch_replay::{put_stock, put_timestamp, put_u16, put_u32, put_u64};

/// 9:30 AM in nanoseconds since midnight.
pub const TS_OPEN: u64 = 34_200_000_000_000;

pub fn header(kind: u8, stock_locate: u16, tracking: u16, ts: u64) -> Vec<u8> {
  let mut msg = vec![0u8; 11];
  msg[0] = kind;
  put_u16(&mut msg[1..3], stock_locate);
  put_u16(&mut msg[3..5], tracking);
  put_timestamp(&mut msg[5..11], ts);
  msg
}

pub fn system_event(ts: u64, code: u8) -> Vec<u8> {
  let mut msg = header(b'S', 1, 0, ts);
  msg.push(code);
  msg
}

pub fn add_order(
  ts: u64,
  order_ref: u64,
  side: u8,
  shares: u32,
  stock: &str,
  price: u32,
) -> Vec<u8> {
  let mut msg = header(b'A', 1, 0, ts);
  msg.resize(36, 0);
  put_u64(&mut msg[11..19], order_ref);
  msg[19] = side;
  put_u32(&mut msg[20..24], shares);
  put_stock(&mut msg[24..32], stock);
  put_u32(&mut msg[32..36], price);
  msg
}

pub fn order_executed(
  ts: u64,
  order_ref: u64,
  shares: u32,
  match_number: u64,
) -> Vec<u8> {
  let mut msg = header(b'E', 1, 0, ts);
  msg.resize(31, 0);
  put_u64(&mut msg[11..19], order_ref);
  put_u32(&mut msg[19..23], shares);
  put_u64(&mut msg[23..31], match_number);
  msg
}

/// A source that hands out the stream in predetermined slices, to exercise
/// refill-invariance.
pub struct ChunkedReader {
  data: Vec<u8>,
  splits: Vec<usize>,
  pos: usize,
  split_index: usize,
}

impl ChunkedReader {
  /// `splits` are the sizes of successive reads; once exhausted, the rest
  /// of the data comes in one final read.
  pub fn new(data: Vec<u8>, splits: Vec<usize>) -> Self {
    Self {
      data,
      splits,
      pos: 0,
      split_index: 0,
    }
  }
}

impl Read for ChunkedReader {
  fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
    let remaining = self.data.len() - self.pos;
    if remaining == 0 {
      return Ok(0);
    }
    let want = if self.split_index < self.splits.len() {
      let w = self.splits[self.split_index];
      self.split_index += 1;
      w
    } else {
      remaining
    };
    let n = want.min(remaining).min(buf.len());
    buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
    self.pos += n;
    Ok(n)
  }
}
