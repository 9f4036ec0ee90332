use crate::core::{
    errors::ExchangeError,
    types::{Account, ApiOutcome, Order, OrderBook, OrderType, PlacedOrder, Price, Trade},
};
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataSource {
    /// Latest ticker for an instrument quoted in `currency`
    async fn get_price(
        &self,
        instrument: &str,
        currency: &str,
    ) -> Result<ApiOutcome<Price>, ExchangeError>;

    /// Order book snapshot
    async fn get_order_book(
        &self,
        instrument: &str,
        currency: &str,
    ) -> Result<ApiOutcome<OrderBook>, ExchangeError>;

    /// Recent trades, optionally only those after the trade id `since`
    async fn get_trades(
        &self,
        instrument: &str,
        currency: &str,
        since: Option<u64>,
    ) -> Result<ApiOutcome<Vec<Trade>>, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Submit a new order
    async fn place_order(
        &self,
        order: &Order,
        order_type: OrderType,
        client_request_id: &str,
    ) -> Result<ApiOutcome<PlacedOrder>, ExchangeError>;

    /// Cancel a batch of orders, reporting success per id in input order
    async fn cancel_orders(&self, order_ids: &[u64]) -> Result<Vec<bool>, ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    async fn get_account_balances(&self) -> Result<ApiOutcome<Account>, ExchangeError>;

    async fn get_trading_fee(&self) -> Result<ApiOutcome<f64>, ExchangeError>;
}

#[async_trait]
pub trait ExchangeConnector: MarketDataSource + OrderPlacer + AccountInfo {}
