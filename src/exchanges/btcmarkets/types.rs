use serde::{Deserialize, Serialize};

/// Error fields BTC Markets attaches to most responses
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BtcMarketsEnvelope {
    pub success: Option<bool>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}

/// `/market/{instrument}/{currency}/tick`
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BtcMarketsTick {
    pub best_bid: f64,
    pub best_ask: f64,
    pub last_price: f64,
    pub currency: String,
    pub instrument: String,
    pub timestamp: i64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
}

/// `/market/{instrument}/{currency}/orderbook`; levels are `[price, volume]`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BtcMarketsOrderBook {
    pub bids: Vec<(f64, f64)>,
    pub asks: Vec<(f64, f64)>,
}

/// One entry of `/market/{instrument}/{currency}/trades`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BtcMarketsTrade {
    pub tid: u64,
    pub amount: f64,
    pub price: f64,
    /// Unix epoch seconds
    pub date: i64,
}

/// One entry of `/account/balance`, amounts scaled by the wire scale
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BtcMarketsBalance {
    pub currency: String,
    pub balance: i64,
    pub pending_funds: i64,
}

/// `/account/{instrument}/{currency}/tradingfee`
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BtcMarketsTradingFee {
    pub trading_fee_rate: i64,
    pub volume_30_day: Option<i64>,
}

/// Body of `POST /order/create`
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BtcMarketsOrderRequest {
    pub currency: String,
    pub instrument: String,
    pub price: i64,
    pub volume: i64,
    pub order_side: String,
    #[serde(rename = "ordertype")]
    pub order_type: String,
    pub client_request_id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BtcMarketsOrderResponse {
    pub id: u64,
    pub client_request_id: Option<String>,
}

/// Body of `POST /order/cancel`
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BtcMarketsCancelRequest {
    pub order_ids: Vec<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BtcMarketsCancelResponse {
    pub responses: Vec<BtcMarketsCancelResult>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BtcMarketsCancelResult {
    pub success: bool,
    pub id: Option<u64>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}
