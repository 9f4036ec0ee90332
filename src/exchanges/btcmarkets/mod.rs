pub mod codec;
pub mod conversions;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

// Re-export main components
pub use builder::{build_connector, BtcMarketsBuilder, DEFAULT_BASE_URL};
pub use codec::{WireCodec, WIRE_SCALE};
pub use connector::{Account, BtcMarketsConnector, MarketData, Trading};
pub use rest::BtcMarketsRest;
pub use signer::BtcMarketsSigner;
pub use types::{
    BtcMarketsBalance, BtcMarketsCancelRequest, BtcMarketsCancelResponse, BtcMarketsCancelResult,
    BtcMarketsEnvelope, BtcMarketsOrderBook, BtcMarketsOrderRequest, BtcMarketsOrderResponse,
    BtcMarketsTick, BtcMarketsTrade, BtcMarketsTradingFee,
};
