use serde::{Deserialize, Serialize};

use crate::{
  codec::{
    message_length, read_ascii, read_price4, read_price8, read_u32, read_u64,
    Price4, Price8,
  },
  errors::DecodeError,
  models::MessageHeader,
};

/// [S] System Event (12 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemEvent {
  pub event_code: char,
}

/// [R] Stock Directory (39 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockDirectory {
  pub stock: String,
  pub market_category: char,
  pub financial_status: char,
  pub round_lot_size: u32,
  pub round_lots_only: char,
  pub issue_classification: char,
  pub issue_sub_type: String,
  pub authenticity: char,
  pub short_sale_threshold: char,
  pub ipo_flag: char,
  pub luld_reference_price_tier: char,
  pub etp_flag: char,
  pub etp_leverage_factor: u32,
  pub inverse_indicator: char,
}

/// [H] Stock Trading Action (25 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingAction {
  pub stock: String,
  pub trading_state: char,
  pub reserved: char,
  pub reason: String,
}

/// [Y] Reg SHO Short Sale Price Test Restriction (20 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegShoRestriction {
  pub stock: String,
  pub action: char,
}

/// [L] Market Participant Position (26 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantPosition {
  pub mpid: String,
  pub stock: String,
  pub primary_market_maker: char,
  pub market_maker_mode: char,
  pub market_participant_state: char,
}

/// [V] MWCB Decline Level (35 bytes). Levels carry eight implied decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MwcbDeclineLevel {
  pub level1: Price8,
  pub level2: Price8,
  pub level3: Price8,
}

/// [W] MWCB Status (12 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MwcbStatus {
  pub breached_level: char,
}

/// [K] IPO Quoting Period Update (28 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpoQuotingUpdate {
  pub stock: String,
  /// Quotation release time, seconds since midnight
  pub release_time: u32,
  pub release_qualifier: char,
  pub price: Price4,
}

/// [A] Add Order, no MPID attribution (36 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddOrder {
  pub order_ref: u64,
  pub side: char,
  pub shares: u32,
  pub stock: String,
  pub price: Price4,
}

/// [F] Add Order with MPID attribution (40 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddOrderMpid {
  pub order_ref: u64,
  pub side: char,
  pub shares: u32,
  pub stock: String,
  pub price: Price4,
  pub mpid: String,
}

/// [E] Order Executed (31 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderExecuted {
  pub order_ref: u64,
  pub executed_shares: u32,
  pub match_number: u64,
}

/// [C] Order Executed With Price (36 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderExecutedWithPrice {
  pub order_ref: u64,
  pub executed_shares: u32,
  pub match_number: u64,
  pub printable: char,
  pub execution_price: Price4,
}

/// [X] Order Cancel (23 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderCancel {
  pub order_ref: u64,
  pub cancelled_shares: u32,
}

/// [D] Order Delete (19 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDelete {
  pub order_ref: u64,
}

/// [U] Order Replace (35 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderReplace {
  pub original_order_ref: u64,
  pub new_order_ref: u64,
  pub shares: u32,
  pub price: Price4,
}

/// [P] Trade, non-cross (44 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trade {
  pub order_ref: u64,
  pub side: char,
  pub shares: u32,
  pub stock: String,
  pub price: Price4,
  pub match_number: u64,
}

/// [Q] Cross Trade (40 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossTrade {
  pub shares: u64,
  pub stock: String,
  pub cross_price: Price4,
  pub match_number: u64,
  pub cross_type: char,
}

/// [B] Broken Trade (19 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokenTrade {
  pub match_number: u64,
}

/// [I] Net Order Imbalance Indicator (50 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Noii {
  pub paired_shares: u64,
  pub imbalance_shares: u64,
  pub imbalance_direction: char,
  pub stock: String,
  pub far_price: Price4,
  pub near_price: Price4,
  pub current_reference_price: Price4,
  pub cross_type: char,
  pub price_variation_indicator: char,
}

/// [N] Retail Price Improvement Indicator (20 bytes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rpii {
  pub stock: String,
  pub interest_flag: char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
///
/// Message payload, tagged by the type byte. One variant per entry of the
/// length table; type bytes outside the table land in `Unknown` with the
/// raw byte preserved.
///
pub enum Body {
  SystemEvent(SystemEvent),
  StockDirectory(StockDirectory),
  TradingAction(TradingAction),
  RegShoRestriction(RegShoRestriction),
  ParticipantPosition(ParticipantPosition),
  MwcbDeclineLevel(MwcbDeclineLevel),
  MwcbStatus(MwcbStatus),
  IpoQuotingUpdate(IpoQuotingUpdate),
  AddOrder(AddOrder),
  AddOrderMpid(AddOrderMpid),
  OrderExecuted(OrderExecuted),
  OrderExecutedWithPrice(OrderExecutedWithPrice),
  OrderCancel(OrderCancel),
  OrderDelete(OrderDelete),
  OrderReplace(OrderReplace),
  Trade(Trade),
  CrossTrade(CrossTrade),
  BrokenTrade(BrokenTrade),
  Noii(Noii),
  Rpii(Rpii),
  Unknown(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
///
/// A fully decoded ITCH 5.0 message: common header plus typed payload
///
pub struct Message {
  pub header: MessageHeader,
  pub body: Body,
}

impl Message {
  /// Decode one complete message. The slice must hold exactly the bytes of
  /// the message, i.e. what the framer emits.
  ///
  /// A type byte outside the table yields `Body::Unknown` with a header
  /// carrying only the kind; such bytes never reach this path from the
  /// framer, which resynchronises instead of framing them.
  pub fn decode(input: &[u8]) -> Result<Self, DecodeError> {
    let kind = *input
      .first()
      .ok_or_else(|| DecodeError("empty message".to_string()))?;
    let expected = message_length(kind);
    if expected == 0 {
      return Ok(Self {
        header: MessageHeader {
          kind,
          ..MessageHeader::default()
        },
        body: Body::Unknown(kind),
      });
    }
    if input.len() != expected {
      return Err(DecodeError(format!(
        "invalid length for type '{}': got {}, want {}",
        kind as char,
        input.len(),
        expected
      )));
    }

    let header = MessageHeader::from_bytes(input);
    let body = match kind {
      b'S' => Body::SystemEvent(SystemEvent {
        event_code: input[11] as char,
      }),
      b'R' => Body::StockDirectory(StockDirectory {
        stock: read_ascii(&input[11..19]),
        market_category: input[19] as char,
        financial_status: input[20] as char,
        round_lot_size: read_u32(&input[21..25]),
        round_lots_only: input[25] as char,
        issue_classification: input[26] as char,
        issue_sub_type: read_ascii(&input[27..29]),
        authenticity: input[29] as char,
        short_sale_threshold: input[30] as char,
        ipo_flag: input[31] as char,
        luld_reference_price_tier: input[32] as char,
        etp_flag: input[33] as char,
        etp_leverage_factor: read_u32(&input[34..38]),
        inverse_indicator: input[38] as char,
      }),
      b'H' => Body::TradingAction(TradingAction {
        stock: read_ascii(&input[11..19]),
        trading_state: input[19] as char,
        reserved: input[20] as char,
        reason: read_ascii(&input[21..25]),
      }),
      b'Y' => Body::RegShoRestriction(RegShoRestriction {
        stock: read_ascii(&input[11..19]),
        action: input[19] as char,
      }),
      b'L' => Body::ParticipantPosition(ParticipantPosition {
        mpid: read_ascii(&input[11..15]),
        stock: read_ascii(&input[15..23]),
        primary_market_maker: input[23] as char,
        market_maker_mode: input[24] as char,
        market_participant_state: input[25] as char,
      }),
      b'V' => Body::MwcbDeclineLevel(MwcbDeclineLevel {
        level1: read_price8(&input[11..19]),
        level2: read_price8(&input[19..27]),
        level3: read_price8(&input[27..35]),
      }),
      b'W' => Body::MwcbStatus(MwcbStatus {
        breached_level: input[11] as char,
      }),
      b'K' => Body::IpoQuotingUpdate(IpoQuotingUpdate {
        stock: read_ascii(&input[11..19]),
        release_time: read_u32(&input[19..23]),
        release_qualifier: input[23] as char,
        price: read_price4(&input[24..28]),
      }),
      b'A' => Body::AddOrder(AddOrder {
        order_ref: read_u64(&input[11..19]),
        side: input[19] as char,
        shares: read_u32(&input[20..24]),
        stock: read_ascii(&input[24..32]),
        price: read_price4(&input[32..36]),
      }),
      b'F' => Body::AddOrderMpid(AddOrderMpid {
        order_ref: read_u64(&input[11..19]),
        side: input[19] as char,
        shares: read_u32(&input[20..24]),
        stock: read_ascii(&input[24..32]),
        price: read_price4(&input[32..36]),
        mpid: read_ascii(&input[36..40]),
      }),
      b'E' => Body::OrderExecuted(OrderExecuted {
        order_ref: read_u64(&input[11..19]),
        executed_shares: read_u32(&input[19..23]),
        match_number: read_u64(&input[23..31]),
      }),
      b'C' => Body::OrderExecutedWithPrice(OrderExecutedWithPrice {
        order_ref: read_u64(&input[11..19]),
        executed_shares: read_u32(&input[19..23]),
        match_number: read_u64(&input[23..31]),
        printable: input[31] as char,
        execution_price: read_price4(&input[32..36]),
      }),
      b'X' => Body::OrderCancel(OrderCancel {
        order_ref: read_u64(&input[11..19]),
        cancelled_shares: read_u32(&input[19..23]),
      }),
      b'D' => Body::OrderDelete(OrderDelete {
        order_ref: read_u64(&input[11..19]),
      }),
      b'U' => Body::OrderReplace(OrderReplace {
        original_order_ref: read_u64(&input[11..19]),
        new_order_ref: read_u64(&input[19..27]),
        shares: read_u32(&input[27..31]),
        price: read_price4(&input[31..35]),
      }),
      b'P' => Body::Trade(Trade {
        order_ref: read_u64(&input[11..19]),
        side: input[19] as char,
        shares: read_u32(&input[20..24]),
        stock: read_ascii(&input[24..32]),
        price: read_price4(&input[32..36]),
        match_number: read_u64(&input[36..44]),
      }),
      b'Q' => Body::CrossTrade(CrossTrade {
        shares: read_u64(&input[11..19]),
        stock: read_ascii(&input[19..27]),
        cross_price: read_price4(&input[27..31]),
        match_number: read_u64(&input[31..39]),
        cross_type: input[39] as char,
      }),
      b'B' => Body::BrokenTrade(BrokenTrade {
        match_number: read_u64(&input[11..19]),
      }),
      b'I' => Body::Noii(Noii {
        paired_shares: read_u64(&input[11..19]),
        imbalance_shares: read_u64(&input[19..27]),
        imbalance_direction: input[27] as char,
        stock: read_ascii(&input[28..36]),
        far_price: read_price4(&input[36..40]),
        near_price: read_price4(&input[40..44]),
        current_reference_price: read_price4(&input[44..48]),
        cross_type: input[48] as char,
        price_variation_indicator: input[49] as char,
      }),
      b'N' => Body::Rpii(Rpii {
        stock: read_ascii(&input[11..19]),
        interest_flag: input[19] as char,
      }),
      _ => unreachable!("length table and decode table out of sync"),
    };

    Ok(Self { header, body })
  }

  /// Feed-clock timestamp rendered as wall-clock time of day.
  pub fn time_of_day(&self) -> Option<chrono::NaiveTime> {
    let ts = self.header.timestamp;
    chrono::NaiveTime::from_num_seconds_from_midnight_opt(
      (ts / 1_000_000_000) as u32,
      (ts % 1_000_000_000) as u32,
    )
  }
}

impl TryFrom<&[u8]> for Message {
  type Error = DecodeError;
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    Message::decode(value)
  }
}

impl std::fmt::Display for Message {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let kind = self.header.kind as char;
    match self.time_of_day() {
      Some(t) => write!(f, "[{}] {} ", kind, t.format("%H:%M:%S%.9f"))?,
      None => write!(f, "[{}] ", kind)?,
    }
    match &self.body {
      Body::SystemEvent(m) => write!(f, "event={}", m.event_code),
      Body::StockDirectory(m) => write!(
        f,
        "{} category={} lot={}",
        m.stock, m.market_category, m.round_lot_size
      ),
      Body::TradingAction(m) => {
        write!(f, "{} state={} reason={}", m.stock, m.trading_state, m.reason)
      }
      Body::RegShoRestriction(m) => {
        write!(f, "{} action={}", m.stock, m.action)
      }
      Body::ParticipantPosition(m) => write!(
        f,
        "{} mpid={} state={}",
        m.stock, m.mpid, m.market_participant_state
      ),
      Body::MwcbDeclineLevel(m) => {
        write!(f, "levels {} / {} / {}", m.level1, m.level2, m.level3)
      }
      Body::MwcbStatus(m) => write!(f, "breached={}", m.breached_level),
      Body::IpoQuotingUpdate(m) => {
        write!(f, "{} release={}s @ {}", m.stock, m.release_time, m.price)
      }
      Body::AddOrder(m) => write!(
        f,
        "{} {} {} @ {} ref={}",
        m.stock, m.side, m.shares, m.price, m.order_ref
      ),
      Body::AddOrderMpid(m) => write!(
        f,
        "{} {} {} @ {} ref={} mpid={}",
        m.stock, m.side, m.shares, m.price, m.order_ref, m.mpid
      ),
      Body::OrderExecuted(m) => write!(
        f,
        "ref={} exec={} match={}",
        m.order_ref, m.executed_shares, m.match_number
      ),
      Body::OrderExecutedWithPrice(m) => write!(
        f,
        "ref={} exec={} @ {} match={}",
        m.order_ref, m.executed_shares, m.execution_price, m.match_number
      ),
      Body::OrderCancel(m) => {
        write!(f, "ref={} cancelled={}", m.order_ref, m.cancelled_shares)
      }
      Body::OrderDelete(m) => write!(f, "ref={}", m.order_ref),
      Body::OrderReplace(m) => write!(
        f,
        "ref={}->{} {} @ {}",
        m.original_order_ref, m.new_order_ref, m.shares, m.price
      ),
      Body::Trade(m) => write!(
        f,
        "{} {} {} @ {} match={}",
        m.stock, m.side, m.shares, m.price, m.match_number
      ),
      Body::CrossTrade(m) => write!(
        f,
        "{} {} @ {} type={} match={}",
        m.stock, m.shares, m.cross_price, m.cross_type, m.match_number
      ),
      Body::BrokenTrade(m) => write!(f, "match={}", m.match_number),
      Body::Noii(m) => write!(
        f,
        "{} paired={} imbalance={}{} near={} far={}",
        m.stock,
        m.paired_shares,
        m.imbalance_direction,
        m.imbalance_shares,
        m.near_price,
        m.far_price
      ),
      Body::Rpii(m) => write!(f, "{} interest={}", m.stock, m.interest_flag),
      Body::Unknown(b) => write!(f, "unknown type 0x{:02X}", b),
    }
  }
}
