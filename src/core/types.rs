use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::ExchangeError;

/// Smallest volume the exchange accepts on a new order
pub const MIN_ORDER_VOLUME: f64 = 0.001;

/// Side of an order, named the way the exchange names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Bid,
    Ask,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bid => "Bid",
            Self::Ask => "Ask",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order types accepted by `/order/create`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "Limit",
            Self::Market => "Market",
        }
    }
}

impl FromStr for OrderType {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Limit" => Ok(Self::Limit),
            "Market" => Ok(Self::Market),
            other => Err(ExchangeError::InvalidParameters(format!(
                "Order type must be either Limit or Market, got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticker snapshot for one market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub instrument: String,
    pub currency: String,
    pub best_bid: f64,
    pub best_ask: f64,
    pub last_price: f64,
    pub volume_24h: f64,
    pub timestamp: i64,
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.instrument)?;
        writeln!(f, "Last Price: {} {}", self.last_price, self.currency)?;
        writeln!(f, "Best Bid: {} {}", self.best_bid, self.currency)?;
        writeln!(f, "Best Ask: {} {}", self.best_ask, self.currency)?;
        write!(f, "24 Hour Volume: {} {}", self.volume_24h, self.instrument)
    }
}

/// A resting book entry, or an order that is about to be submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub instrument: String,
    pub currency: String,
    pub price: f64,
    pub volume: f64,
    pub side: OrderSide,
}

impl Order {
    pub fn new(
        instrument: impl Into<String>,
        currency: impl Into<String>,
        price: f64,
        volume: f64,
        side: OrderSide,
    ) -> Self {
        Self {
            instrument: instrument.into(),
            currency: currency.into(),
            price,
            volume,
            side,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for {} {} @ {} {}",
            self.side, self.volume, self.instrument, self.price, self.currency
        )
    }
}

/// An order the exchange has accepted, with the id it assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order: Order,
    pub id: u64,
}

impl fmt::Display for PlacedOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.order)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub instrument: String,
    pub currency: String,
    /// Best (highest) bid first, as supplied by the exchange
    pub bids: Vec<Order>,
    /// Best (lowest) ask first, as supplied by the exchange
    pub asks: Vec<Order>,
}

impl fmt::Display for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Order book for {}/{} exchange",
            self.instrument, self.currency
        )?;
        writeln!(f, "Bids")?;
        for bid in &self.bids {
            writeln!(f, "{}", bid)?;
        }
        writeln!(f, "Asks")?;
        for ask in &self.asks {
            writeln!(f, "{}", ask)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub currency: String,
    pub balance: f64,
    pub pending_funds: f64,
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Balance: {} {}    Pending Funds: {} {}",
            self.balance, self.currency, self.pending_funds, self.currency
        )
    }
}

/// Balances held on the exchange, one entry per currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub balances: Vec<Balance>,
}

impl Account {
    pub fn balance(&self, currency: &str) -> Option<&Balance> {
        self.balances.iter().find(|b| b.currency == currency)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Account Balances:")?;
        for balance in &self.balances {
            writeln!(f, "{}", balance)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: u64,
    pub instrument: String,
    pub currency: String,
    pub amount: f64,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}  {} {} bought @ {} {} at {}",
            self.id, self.amount, self.instrument, self.price, self.currency, self.timestamp
        )
    }
}

/// Why the exchange declined a request that did reach it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRejection {
    /// HTTP status, when the rejection came back as a non-2xx response
    pub status: Option<u16>,
    pub error_code: Option<i64>,
    pub message: String,
}

impl fmt::Display for ApiRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, self.error_code) {
            (Some(status), _) => write!(f, "HTTP {}: {}", status, self.message),
            (None, Some(code)) => write!(f, "error {}: {}", code, self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}

/// Result of a request the exchange answered.
///
/// Hard faults (bad credentials, malformed responses, network failures) are
/// reported through `Err(ExchangeError)` instead; a `Rejected` outcome means the
/// request was delivered and the exchange said no.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApiOutcome<T> {
    Success(T),
    Rejected(ApiRejection),
}

impl<T> ApiOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The value if the exchange accepted the request
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&ApiRejection> {
        match self {
            Self::Success(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiOutcome<U> {
        match self {
            Self::Success(value) => ApiOutcome::Success(f(value)),
            Self::Rejected(rejection) => ApiOutcome::Rejected(rejection),
        }
    }

    /// Map a successful value through a fallible conversion, keeping rejections as they are
    pub fn and_then<U, F>(self, f: F) -> Result<ApiOutcome<U>, ExchangeError>
    where
        F: FnOnce(T) -> Result<U, ExchangeError>,
    {
        match self {
            Self::Success(value) => f(value).map(ApiOutcome::Success),
            Self::Rejected(rejection) => Ok(ApiOutcome::Rejected(rejection)),
        }
    }
}
