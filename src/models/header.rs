use serde::{Deserialize, Serialize};

use crate::codec;

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
///
/// Common header carried by every defined ITCH 5.0 message
///
pub struct MessageHeader {
  /// Message type byte
  pub kind: u8,
  /// NASDAQ-assigned locate code for the security
  pub stock_locate: u16,
  /// NASDAQ-internal tracking number
  pub tracking_number: u16,
  /// Nanoseconds since midnight of the trading day (48-bit)
  pub timestamp: u64,
}

impl MessageHeader {
  /// Decode the leading 11 bytes of a length-validated message.
  pub(crate) fn from_bytes(input: &[u8]) -> Self {
    Self {
      kind: input[0],
      stock_locate: codec::read_u16(&input[1..3]),
      tracking_number: codec::read_u16(&input[3..5]),
      timestamp: codec::read_timestamp(&input[5..11]),
    }
  }
}
