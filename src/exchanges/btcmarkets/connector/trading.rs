use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::OrderPlacer;
use crate::core::types::{
    ApiOutcome, Order, OrderSide, OrderType, PlacedOrder, MIN_ORDER_VOLUME,
};
use crate::exchanges::btcmarkets::codec::WireCodec;
use crate::exchanges::btcmarkets::conversions;
use crate::exchanges::btcmarkets::rest::BtcMarketsRest;
use crate::exchanges::btcmarkets::types::BtcMarketsCancelRequest;
use async_trait::async_trait;
use tracing::instrument;

/// Order entry for BTC Markets
pub struct Trading<R: RestClient> {
    rest: BtcMarketsRest<R>,
    codec: WireCodec,
}

impl<R: RestClient> Trading<R> {
    pub fn new(rest: BtcMarketsRest<R>, codec: WireCodec) -> Self {
        Self { rest, codec }
    }

    pub fn can_sign(&self) -> bool {
        self.rest.can_sign()
    }

    /// Buy `volume` of `instrument` paid in `currency` at `price`.
    ///
    /// `order_type` must be `"Limit"` or `"Market"`.
    pub async fn buy(
        &self,
        instrument: &str,
        currency: &str,
        price: f64,
        volume: f64,
        order_type: &str,
        client_request_id: &str,
    ) -> Result<ApiOutcome<PlacedOrder>, ExchangeError> {
        let order_type: OrderType = order_type.parse()?;
        let order = Order::new(instrument, currency, price, volume, OrderSide::Bid);
        self.place_order(&order, order_type, client_request_id)
            .await
    }

    /// Sell `volume` of `instrument` for `currency` at `price`.
    ///
    /// `order_type` must be `"Limit"` or `"Market"`.
    pub async fn sell(
        &self,
        instrument: &str,
        currency: &str,
        price: f64,
        volume: f64,
        order_type: &str,
        client_request_id: &str,
    ) -> Result<ApiOutcome<PlacedOrder>, ExchangeError> {
        let order_type: OrderType = order_type.parse()?;
        let order = Order::new(instrument, currency, price, volume, OrderSide::Ask);
        self.place_order(&order, order_type, client_request_id)
            .await
    }
}

fn validate_order(order: &Order) -> Result<(), ExchangeError> {
    if !order.volume.is_finite() || order.volume < MIN_ORDER_VOLUME {
        return Err(ExchangeError::InvalidParameters(format!(
            "Volume must be at least {}, got {}",
            MIN_ORDER_VOLUME, order.volume
        )));
    }
    if !order.price.is_finite() || order.price < 0.0 {
        return Err(ExchangeError::InvalidParameters(format!(
            "Price must be a non-negative number, got {}",
            order.price
        )));
    }
    Ok(())
}

#[async_trait]
impl<R: RestClient> OrderPlacer for Trading<R> {
    /// The returned id always comes from this call's own create response
    #[instrument(skip(self, order), fields(exchange = "btcmarkets", side = %order.side, instrument = %order.instrument))]
    async fn place_order(
        &self,
        order: &Order,
        order_type: OrderType,
        client_request_id: &str,
    ) -> Result<ApiOutcome<PlacedOrder>, ExchangeError> {
        validate_order(order)?;

        let request =
            conversions::convert_order_request(order, order_type, client_request_id, &self.codec)?;

        self.rest
            .create_order(&request)
            .await?
            .and_then(|value| conversions::convert_placed_order(&value, order))
    }

    /// A rejected batch reports every id as not cancelled
    #[instrument(skip(self), fields(exchange = "btcmarkets"))]
    async fn cancel_orders(&self, order_ids: &[u64]) -> Result<Vec<bool>, ExchangeError> {
        if order_ids.is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "There must be at least one order id".to_string(),
            ));
        }

        let request = BtcMarketsCancelRequest {
            order_ids: order_ids.to_vec(),
        };

        match self.rest.cancel_orders(&request).await? {
            ApiOutcome::Success(value) => conversions::convert_cancel_results(&value, order_ids),
            ApiOutcome::Rejected(_) => Ok(vec![false; order_ids.len()]),
        }
    }
}
