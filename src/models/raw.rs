//! Zero-copy raw views over framed ITCH messages.
//!
//! Built on `zerocopy::Ref` and big-endian integer wrappers; all structs
//! derive `Unaligned`, so views are valid at any offset of the backing
//! buffer. The framer uses `as_header_raw` to pull timestamps without
//! decoding, and the `as_*` helpers let consumers peek at the hot order-flow
//! types without allocating.

use byteorder::{BigEndian, ByteOrder};
use zerocopy::big_endian::{U16 as BeU16, U32 as BeU32, U64 as BeU64};
use zerocopy::{FromBytes, Immutable, KnownLayout, Ref, Unaligned};

/// 6-byte big-endian timestamp field: nanoseconds since midnight.
#[repr(C)]
#[derive(
  Clone, Copy, Debug, Default, Unaligned, KnownLayout, Immutable, FromBytes,
)]
pub struct TimestampRaw(pub [u8; 6]);

impl TimestampRaw {
  #[inline]
  pub fn nanos(&self) -> u64 {
    BigEndian::read_u48(&self.0)
  }
}

/// The 11-byte common header prefix of every defined message.
#[repr(C)]
#[derive(
  Clone, Copy, Debug, Default, Unaligned, KnownLayout, Immutable, FromBytes,
)]
pub struct HeaderRaw {
  pub kind: u8,              // 0
  pub stock_locate: BeU16,   // 1..3
  pub tracking_number: BeU16, // 3..5
  pub timestamp: TimestampRaw, // 5..11
}

/// Complete 36-byte Add Order (No MPID) message.
#[repr(C)]
#[derive(
  Clone, Copy, Debug, Default, Unaligned, KnownLayout, Immutable, FromBytes,
)]
pub struct AddOrderRaw {
  pub header: HeaderRaw, // 0..11
  pub order_ref: BeU64,  // 11..19
  pub side: u8,          // 19
  pub shares: BeU32,     // 20..24
  pub stock: [u8; 8],    // 24..32
  pub price: BeU32,      // 32..36
}

/// Complete 44-byte Trade (Non-Cross) message.
#[repr(C)]
#[derive(
  Clone, Copy, Debug, Default, Unaligned, KnownLayout, Immutable, FromBytes,
)]
pub struct TradeRaw {
  pub header: HeaderRaw,   // 0..11
  pub order_ref: BeU64,    // 11..19
  pub side: u8,            // 19
  pub shares: BeU32,       // 20..24
  pub stock: [u8; 8],      // 24..32
  pub price: BeU32,        // 32..36
  pub match_number: BeU64, // 36..44
}

/// View the common header at the front of a message slice (zero-copy,
/// unaligned-safe). Returns `None` if fewer than 11 bytes are available.
#[inline]
pub fn as_header_raw(slice: &[u8]) -> Option<Ref<&[u8], HeaderRaw>> {
  Ref::<_, HeaderRaw>::from_prefix(slice).ok().map(|(r, _)| r)
}

/// Try view as `AddOrderRaw`. Returns `None` unless the slice is exactly
/// 36 bytes.
#[inline]
pub fn as_add_order_raw(slice: &[u8]) -> Option<Ref<&[u8], AddOrderRaw>> {
  Ref::<_, AddOrderRaw>::from_bytes(slice).ok()
}

/// Try view as `TradeRaw`. Returns `None` unless the slice is exactly
/// 44 bytes.
#[inline]
pub fn as_trade_raw(slice: &[u8]) -> Option<Ref<&[u8], TradeRaw>> {
  Ref::<_, TradeRaw>::from_bytes(slice).ok()
}
