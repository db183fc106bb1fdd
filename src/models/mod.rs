
mod header;
mod message;
pub(crate) mod raw;

pub use self::header::MessageHeader;
pub use self::message::{
  AddOrder, AddOrderMpid, Body, BrokenTrade, CrossTrade, IpoQuotingUpdate,
  Message, MwcbDeclineLevel, MwcbStatus, Noii, OrderCancel, OrderDelete,
  OrderExecuted, OrderExecutedWithPrice, OrderReplace, ParticipantPosition,
  RegShoRestriction, Rpii, StockDirectory, SystemEvent, Trade, TradingAction,
};
