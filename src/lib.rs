#![allow(clippy::cognitive_complexity, clippy::large_enum_variant)]
#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

//! # ITCH Replay
//!
//! Timestamp-accurate replay of NASDAQ TotalView-ITCH 5.0 historical files
//! over TCP, plus the matching client-side framing and decoding library.
//!
//! ## Features
//!
//! - **Faithful pacing** - wall-clock gaps between sends track feed-clock
//!   gaps divided by a configurable speed multiplier, with a 1-second cap so
//!   halts and overnight gaps never stall the stream
//! - **Loss-free framing** - a streaming framer that survives short reads,
//!   split messages, and unknown type bytes (one-byte resync, never silent)
//! - **Broadcast fan-out** - up to 32 concurrent TCP subscribers with slot
//!   reuse and per-subscriber retirement on disconnect
//! - **Compressed ingress** - `.gz` files are decoded on the fly
//! - **Typed decoding** - every ITCH 5.0 message type decodes into a tagged
//!   variant; zero-copy raw views cover the hot order-flow types
//!
//! ## Replaying a file
//!
//! ```rust,no_run
//! use itch_replay::{ReplayServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = ServerConfig {
//!     file: "data/01302019.NASDAQ_ITCH50.gz".into(),
//!     port: 9999,
//!     speed: 1.0,
//!     ..Default::default()
//!   };
//!   let server = ReplayServer::bind(config).await?;
//!   let summary = server.run().await?;
//!   println!("replayed {} messages", summary.messages);
//!   Ok(())
//! }
//! ```
//!
//! ## Consuming a stream
//!
//! ```rust,no_run
//! use itch_replay::{Message, ReplayClient};
//!
//! fn main() -> std::io::Result<()> {
//!   let mut client = ReplayClient::connect("127.0.0.1", 9999)?;
//!   while let Some(frame) = client.next_frame()? {
//!     if let Ok(msg) = Message::decode(&frame.bytes) {
//!       println!("{}", msg);
//!     }
//!   }
//!   Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Data flows *byte source → framer → pacer → broadcaster → subscriber
//! sockets*; membership flows *listening socket → acceptor → subscriber
//! set*. The framer runs on a blocking task (file and gzip reads are
//! synchronous) and feeds the async pacer through a bounded channel, so
//! ordering is preserved end to end and a fast reader cannot buffer the
//! whole file ahead of the schedule.

mod broadcast;
mod client;
mod codec;
mod errors;
mod framer;
mod models;
mod pacer;
mod server;
mod source;
mod stats;

pub use broadcast::{Broadcaster, MAX_SUBSCRIBERS};
pub use client::ReplayClient;
pub use codec::{
  message_length, put_stock, put_timestamp, put_u16, put_u32, put_u64,
  read_ascii, read_price4, read_price8, read_timestamp, read_u16, read_u32,
  read_u64, type_name, Price4, Price8, HEADER_LEN, MAX_MESSAGE_LEN,
};
pub use errors::{DecodeError, ReplayError};
pub use framer::{Frame, FramerStats, MessageStream, SCRATCH_CAPACITY};
pub use models::raw::{
  as_add_order_raw, as_header_raw, as_trade_raw, AddOrderRaw, HeaderRaw,
  TimestampRaw, TradeRaw,
};
pub use models::{
  AddOrder, AddOrderMpid, Body, BrokenTrade, CrossTrade, IpoQuotingUpdate,
  Message, MessageHeader, MwcbDeclineLevel, MwcbStatus, Noii, OrderCancel,
  OrderDelete, OrderExecuted, OrderExecutedWithPrice, OrderReplace,
  ParticipantPosition, RegShoRestriction, Rpii, StockDirectory, SystemEvent,
  Trade, TradingAction,
};
pub use pacer::{Pacer, MAX_SLEEP, MIN_SLEEP};
pub use server::{ReplayServer, ReplaySummary, ServerConfig};
pub use source::open as open_source;
pub use stats::{SessionStats, PROGRESS_INTERVAL};
