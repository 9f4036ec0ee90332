use super::codec::WireCodec;
use super::types as btcmarkets_types;
use crate::core::errors::ExchangeError;
use crate::core::types::{
    Account, ApiRejection, Balance, Order, OrderBook, OrderSide, OrderType, PlacedOrder, Price,
    Trade,
};
use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

fn decode<T: DeserializeOwned>(value: &Value, context: &str) -> Result<T, ExchangeError> {
    T::deserialize(value).map_err(|e| ExchangeError::schema(context, e))
}

/// Rejection described by an explicit `"success": false` in a response body
pub fn convert_rejection(value: &Value) -> Option<ApiRejection> {
    let envelope = btcmarkets_types::BtcMarketsEnvelope::deserialize(value).ok()?;
    if envelope.success != Some(false) {
        return None;
    }

    Some(ApiRejection {
        status: None,
        error_code: envelope.error_code,
        message: envelope
            .error_message
            .unwrap_or_else(|| "Request was not successful".to_string()),
    })
}

/// Rejection for a transport-level non-2xx response; the body is parsed for
/// exchange error fields when it is JSON
pub fn convert_http_rejection(status: i32, body: &str) -> ApiRejection {
    let envelope = serde_json::from_str::<btcmarkets_types::BtcMarketsEnvelope>(body)
        .unwrap_or_default();

    ApiRejection {
        status: u16::try_from(status).ok(),
        error_code: envelope.error_code,
        message: envelope.error_message.unwrap_or_else(|| body.to_string()),
    }
}

pub fn convert_tick(value: &Value) -> Result<Price, ExchangeError> {
    let tick: btcmarkets_types::BtcMarketsTick = decode(value, "tick")?;

    Ok(Price {
        instrument: tick.instrument,
        currency: tick.currency,
        best_bid: tick.best_bid,
        best_ask: tick.best_ask,
        last_price: tick.last_price,
        volume_24h: tick.volume_24h,
        timestamp: tick.timestamp,
    })
}

/// Order book levels keep the order the exchange sent them in
pub fn convert_order_book(
    value: &Value,
    instrument: &str,
    currency: &str,
) -> Result<OrderBook, ExchangeError> {
    let book: btcmarkets_types::BtcMarketsOrderBook = decode(value, "orderbook")?;

    let to_orders = |levels: Vec<(f64, f64)>, side: OrderSide| -> Vec<Order> {
        levels
            .into_iter()
            .map(|(price, volume)| Order::new(instrument, currency, price, volume, side))
            .collect()
    };

    Ok(OrderBook {
        instrument: instrument.to_string(),
        currency: currency.to_string(),
        bids: to_orders(book.bids, OrderSide::Bid),
        asks: to_orders(book.asks, OrderSide::Ask),
    })
}

pub fn convert_trades(
    value: &Value,
    instrument: &str,
    currency: &str,
) -> Result<Vec<Trade>, ExchangeError> {
    let trades: Vec<btcmarkets_types::BtcMarketsTrade> = decode(value, "trades")?;

    trades
        .into_iter()
        .map(|trade| {
            let timestamp = DateTime::from_timestamp(trade.date, 0).ok_or_else(|| {
                ExchangeError::SchemaError(format!(
                    "trades: date {} of trade {} is out of range",
                    trade.date, trade.tid
                ))
            })?;

            Ok(Trade {
                id: trade.tid,
                instrument: instrument.to_string(),
                currency: currency.to_string(),
                amount: trade.amount,
                price: trade.price,
                timestamp,
            })
        })
        .collect()
}

pub fn convert_balances(value: &Value, codec: &WireCodec) -> Result<Account, ExchangeError> {
    let balances: Vec<btcmarkets_types::BtcMarketsBalance> = decode(value, "balance")?;

    Ok(Account {
        balances: balances
            .into_iter()
            .map(|b| Balance {
                currency: b.currency,
                balance: codec.from_wire(b.balance),
                pending_funds: codec.from_wire(b.pending_funds),
            })
            .collect(),
    })
}

pub fn convert_trading_fee(value: &Value, codec: &WireCodec) -> Result<f64, ExchangeError> {
    let fee: btcmarkets_types::BtcMarketsTradingFee = decode(value, "tradingfee")?;
    Ok(codec.from_wire(fee.trading_fee_rate))
}

/// Wire body for `/order/create`
pub fn convert_order_request(
    order: &Order,
    order_type: OrderType,
    client_request_id: &str,
    codec: &WireCodec,
) -> Result<btcmarkets_types::BtcMarketsOrderRequest, ExchangeError> {
    Ok(btcmarkets_types::BtcMarketsOrderRequest {
        currency: order.currency.clone(),
        instrument: order.instrument.clone(),
        price: codec.to_wire(order.price)?,
        volume: codec.to_wire(order.volume)?,
        order_side: order.side.as_str().to_string(),
        order_type: order_type.as_str().to_string(),
        client_request_id: client_request_id.to_string(),
    })
}

/// The requested order paired with the id from the create response
pub fn convert_placed_order(value: &Value, order: &Order) -> Result<PlacedOrder, ExchangeError> {
    let response: btcmarkets_types::BtcMarketsOrderResponse = decode(value, "order/create")?;

    Ok(PlacedOrder {
        order: order.clone(),
        id: response.id,
    })
}

/// Per-id cancellation results, in the order of `order_ids`.
///
/// Results are matched by `id` when the exchange reports ids, otherwise by
/// position; ids the response does not mention count as not cancelled.
pub fn convert_cancel_results(
    value: &Value,
    order_ids: &[u64],
) -> Result<Vec<bool>, ExchangeError> {
    let response: btcmarkets_types::BtcMarketsCancelResponse = decode(value, "order/cancel")?;

    if !response.responses.is_empty() && response.responses.iter().all(|r| r.id.is_some()) {
        let by_id: HashMap<u64, bool> = response
            .responses
            .iter()
            .filter_map(|r| r.id.map(|id| (id, r.success)))
            .collect();

        return Ok(order_ids
            .iter()
            .map(|id| by_id.get(id).copied().unwrap_or(false))
            .collect());
    }

    Ok((0..order_ids.len())
        .map(|i| response.responses.get(i).is_some_and(|r| r.success))
        .collect())
}
