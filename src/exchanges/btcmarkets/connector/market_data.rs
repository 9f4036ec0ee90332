use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::MarketDataSource;
use crate::core::types::{ApiOutcome, OrderBook, Price, Trade};
use crate::exchanges::btcmarkets::conversions;
use crate::exchanges::btcmarkets::rest::BtcMarketsRest;
use async_trait::async_trait;
use tracing::instrument;

/// Public market data for BTC Markets
pub struct MarketData<R: RestClient> {
    rest: BtcMarketsRest<R>,
}

impl<R: RestClient> MarketData<R> {
    pub fn new(rest: BtcMarketsRest<R>) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for MarketData<R> {
    /// A `null` body or an error envelope comes back as `Rejected`,
    /// meaning no price is available right now
    #[instrument(skip(self), fields(exchange = "btcmarkets"))]
    async fn get_price(
        &self,
        instrument: &str,
        currency: &str,
    ) -> Result<ApiOutcome<Price>, ExchangeError> {
        self.rest
            .get_tick(instrument, currency)
            .await?
            .and_then(|value| conversions::convert_tick(&value))
    }

    #[instrument(skip(self), fields(exchange = "btcmarkets"))]
    async fn get_order_book(
        &self,
        instrument: &str,
        currency: &str,
    ) -> Result<ApiOutcome<OrderBook>, ExchangeError> {
        self.rest
            .get_order_book(instrument, currency)
            .await?
            .and_then(|value| conversions::convert_order_book(&value, instrument, currency))
    }

    #[instrument(skip(self), fields(exchange = "btcmarkets"))]
    async fn get_trades(
        &self,
        instrument: &str,
        currency: &str,
        since: Option<u64>,
    ) -> Result<ApiOutcome<Vec<Trade>>, ExchangeError> {
        self.rest
            .get_trades(instrument, currency, since)
            .await?
            .and_then(|value| conversions::convert_trades(&value, instrument, currency))
    }
}
