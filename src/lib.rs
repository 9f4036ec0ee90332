pub mod core;
pub mod exchanges;

pub use core::{
    errors::ExchangeError,
    traits::{AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer},
    types::*,
};
pub use exchanges::btcmarkets::{BtcMarketsBuilder, BtcMarketsConnector};
