use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer};
use crate::core::types::{
    Account as AccountBalances, ApiOutcome, Order, OrderBook, OrderType, PlacedOrder, Price,
    Trade,
};
use crate::exchanges::btcmarkets::codec::WireCodec;
use crate::exchanges::btcmarkets::rest::BtcMarketsRest;
use async_trait::async_trait;

pub mod account;
pub mod market_data;
pub mod trading;

pub use account::Account;
pub use market_data::MarketData;
pub use trading::Trading;

/// BTC Markets connector that composes all sub-trait implementations
pub struct BtcMarketsConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub account: Account<R>,
}

impl<R: RestClient + Clone> BtcMarketsConnector<R> {
    pub fn new(rest: BtcMarketsRest<R>) -> Self {
        Self::with_codec(rest, WireCodec::new())
    }

    pub fn with_codec(rest: BtcMarketsRest<R>, codec: WireCodec) -> Self {
        Self {
            market: MarketData::new(rest.clone()),
            trading: Trading::new(rest.clone(), codec),
            account: Account::new(rest, codec),
        }
    }

    pub fn can_sign(&self) -> bool {
        self.trading.can_sign()
    }

    /// See [`Trading::buy`]
    pub async fn buy(
        &self,
        instrument: &str,
        currency: &str,
        price: f64,
        volume: f64,
        order_type: &str,
        client_request_id: &str,
    ) -> Result<ApiOutcome<PlacedOrder>, ExchangeError> {
        self.trading
            .buy(instrument, currency, price, volume, order_type, client_request_id)
            .await
    }

    /// See [`Trading::sell`]
    pub async fn sell(
        &self,
        instrument: &str,
        currency: &str,
        price: f64,
        volume: f64,
        order_type: &str,
        client_request_id: &str,
    ) -> Result<ApiOutcome<PlacedOrder>, ExchangeError> {
        self.trading
            .sell(instrument, currency, price, volume, order_type, client_request_id)
            .await
    }

    /// See [`Account::get_trading_fee_for`]
    pub async fn get_trading_fee_for(
        &self,
        instrument: &str,
        currency: &str,
    ) -> Result<ApiOutcome<f64>, ExchangeError> {
        self.account.get_trading_fee_for(instrument, currency).await
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for BtcMarketsConnector<R> {
    async fn get_price(
        &self,
        instrument: &str,
        currency: &str,
    ) -> Result<ApiOutcome<Price>, ExchangeError> {
        self.market.get_price(instrument, currency).await
    }

    async fn get_order_book(
        &self,
        instrument: &str,
        currency: &str,
    ) -> Result<ApiOutcome<OrderBook>, ExchangeError> {
        self.market.get_order_book(instrument, currency).await
    }

    async fn get_trades(
        &self,
        instrument: &str,
        currency: &str,
        since: Option<u64>,
    ) -> Result<ApiOutcome<Vec<Trade>>, ExchangeError> {
        self.market.get_trades(instrument, currency, since).await
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for BtcMarketsConnector<R> {
    async fn place_order(
        &self,
        order: &Order,
        order_type: OrderType,
        client_request_id: &str,
    ) -> Result<ApiOutcome<PlacedOrder>, ExchangeError> {
        self.trading
            .place_order(order, order_type, client_request_id)
            .await
    }

    async fn cancel_orders(&self, order_ids: &[u64]) -> Result<Vec<bool>, ExchangeError> {
        self.trading.cancel_orders(order_ids).await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for BtcMarketsConnector<R> {
    async fn get_account_balances(&self) -> Result<ApiOutcome<AccountBalances>, ExchangeError> {
        self.account.get_account_balances().await
    }

    async fn get_trading_fee(&self) -> Result<ApiOutcome<f64>, ExchangeError> {
        self.account.get_trading_fee().await
    }
}

impl<R: RestClient> ExchangeConnector for BtcMarketsConnector<R> {}
