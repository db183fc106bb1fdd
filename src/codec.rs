//! Wire-level primitives for TotalView-ITCH 5.0.
//!
//! ITCH messages are fixed-length records identified by a single leading
//! ASCII type byte. All integers are big-endian; timestamps are 48-bit
//! counts of nanoseconds since midnight; prices are unsigned integers with
//! four implied decimal digits. Everything here operates on byte slices the
//! caller has already length-checked, so the readers do not fail.

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};

/// Largest message defined by the type table (`I`, NOII).
pub const MAX_MESSAGE_LEN: usize = 50;

/// Common header length: type, stock locate, tracking number, timestamp.
pub const HEADER_LEN: usize = 11;

/// Total message length (including the type byte) for a type byte, or 0 when
/// the type is not part of ITCH 5.0. A zero return is the framer's signal to
/// resynchronise.
#[inline]
pub fn message_length(kind: u8) -> usize {
  match kind {
    b'S' => 12, // System Event
    b'R' => 39, // Stock Directory
    b'H' => 25, // Stock Trading Action
    b'Y' => 20, // Reg SHO Restriction
    b'L' => 26, // Market Participant Position
    b'V' => 35, // MWCB Decline Level
    b'W' => 12, // MWCB Status
    b'K' => 28, // IPO Quoting Period Update
    b'A' => 36, // Add Order (No MPID)
    b'F' => 40, // Add Order (MPID)
    b'E' => 31, // Order Executed
    b'C' => 36, // Order Executed With Price
    b'X' => 23, // Order Cancel
    b'D' => 19, // Order Delete
    b'U' => 35, // Order Replace
    b'P' => 44, // Trade (Non-Cross)
    b'Q' => 40, // Cross Trade
    b'B' => 19, // Broken Trade
    b'I' => 50, // NOII
    b'N' => 20, // RPII
    _ => 0,
  }
}

/// Human-readable name for a type byte, used by the statistics breakdown.
pub fn type_name(kind: u8) -> &'static str {
  match kind {
    b'S' => "System Event",
    b'R' => "Stock Directory",
    b'H' => "Trading Action",
    b'Y' => "Reg SHO Restriction",
    b'L' => "Participant Position",
    b'V' => "MWCB Decline Level",
    b'W' => "MWCB Status",
    b'K' => "IPO Quoting Update",
    b'A' => "Add Order (No MPID)",
    b'F' => "Add Order (MPID)",
    b'E' => "Order Executed",
    b'C' => "Order Executed w/ Price",
    b'X' => "Order Cancel",
    b'D' => "Order Delete",
    b'U' => "Order Replace",
    b'P' => "Trade (Non-Cross)",
    b'Q' => "Cross Trade",
    b'B' => "Broken Trade",
    b'I' => "NOII",
    b'N' => "RPII",
    _ => "Unknown",
  }
}

#[inline]
pub fn read_u16(input: &[u8]) -> u16 {
  BigEndian::read_u16(input)
}

#[inline]
pub fn read_u32(input: &[u8]) -> u32 {
  BigEndian::read_u32(input)
}

#[inline]
pub fn read_u64(input: &[u8]) -> u64 {
  BigEndian::read_u64(input)
}

/// Read a 6-byte big-endian timestamp: nanoseconds since midnight, held in a
/// u64 with the top 16 bits zero.
#[inline]
pub fn read_timestamp(input: &[u8]) -> u64 {
  BigEndian::read_u48(input)
}

/// Read a fixed-width ASCII field, trimming trailing spaces. An all-space
/// field yields the empty string; interior spaces are preserved.
pub fn read_ascii(input: &[u8]) -> String {
  let end = input
    .iter()
    .rposition(|&b| b != b' ')
    .map_or(0, |pos| pos + 1);
  String::from_utf8_lossy(&input[..end]).into_owned()
}

/// A price with four implied decimal digits (divisor 10,000).
///
/// Arithmetic and comparisons stay in the integer domain; only `Display`
/// produces the decimal rendering.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
  Serialize, Deserialize,
)]
pub struct Price4(pub u32);

impl Price4 {
  #[inline]
  pub fn raw(self) -> u32 {
    self.0
  }
}

impl std::fmt::Display for Price4 {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}.{:04}", self.0 / 10_000, self.0 % 10_000)
  }
}

#[inline]
pub fn read_price4(input: &[u8]) -> Price4 {
  Price4(BigEndian::read_u32(input))
}

/// An 8-byte price with eight implied decimal digits, used by the MWCB
/// decline-level message.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
  Serialize, Deserialize,
)]
pub struct Price8(pub u64);

impl std::fmt::Display for Price8 {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}.{:08}", self.0 / 100_000_000, self.0 % 100_000_000)
  }
}

#[inline]
pub fn read_price8(input: &[u8]) -> Price8 {
  Price8(BigEndian::read_u64(input))
}

// Encoding counterparts, used by the sample generator and tests.

#[inline]
pub fn put_u16(out: &mut [u8], v: u16) {
  BigEndian::write_u16(out, v);
}

#[inline]
pub fn put_u32(out: &mut [u8], v: u32) {
  BigEndian::write_u32(out, v);
}

#[inline]
pub fn put_u64(out: &mut [u8], v: u64) {
  BigEndian::write_u64(out, v);
}

#[inline]
pub fn put_timestamp(out: &mut [u8], ts: u64) {
  BigEndian::write_u48(out, ts);
}

/// Write a stock symbol as an 8-byte space-padded ASCII field.
pub fn put_stock(out: &mut [u8], stock: &str) {
  let field = &mut out[..8];
  field.fill(b' ');
  let n = stock.len().min(8);
  field[..n].copy_from_slice(&stock.as_bytes()[..n]);
}
