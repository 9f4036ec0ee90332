use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::core::types::{Account as AccountBalances, ApiOutcome};
use crate::exchanges::btcmarkets::codec::WireCodec;
use crate::exchanges::btcmarkets::conversions;
use crate::exchanges::btcmarkets::rest::BtcMarketsRest;
use async_trait::async_trait;
use tracing::instrument;

/// Pair used by `get_trading_fee` when none is configured
pub const DEFAULT_FEE_PAIR: (&str, &str) = ("AUD", "AUD");

/// Authenticated account queries for BTC Markets
pub struct Account<R: RestClient> {
    rest: BtcMarketsRest<R>,
    codec: WireCodec,
    fee_pair: (String, String),
}

impl<R: RestClient> Account<R> {
    pub fn new(rest: BtcMarketsRest<R>, codec: WireCodec) -> Self {
        Self {
            rest,
            codec,
            fee_pair: (DEFAULT_FEE_PAIR.0.to_string(), DEFAULT_FEE_PAIR.1.to_string()),
        }
    }

    /// Use a different instrument/currency pair for `get_trading_fee`
    pub fn with_fee_pair(mut self, instrument: String, currency: String) -> Self {
        self.fee_pair = (instrument, currency);
        self
    }

    pub fn can_sign(&self) -> bool {
        self.rest.can_sign()
    }

    /// Trading fee rate for an explicit pair, e.g. `0.0085` for 0.85%
    #[instrument(skip(self), fields(exchange = "btcmarkets"))]
    pub async fn get_trading_fee_for(
        &self,
        instrument: &str,
        currency: &str,
    ) -> Result<ApiOutcome<f64>, ExchangeError> {
        self.rest
            .get_trading_fee(instrument, currency)
            .await?
            .and_then(|value| conversions::convert_trading_fee(&value, &self.codec))
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for Account<R> {
    #[instrument(skip(self), fields(exchange = "btcmarkets"))]
    async fn get_account_balances(&self) -> Result<ApiOutcome<AccountBalances>, ExchangeError> {
        self.rest
            .get_balances()
            .await?
            .and_then(|value| conversions::convert_balances(&value, &self.codec))
    }

    async fn get_trading_fee(&self) -> Result<ApiOutcome<f64>, ExchangeError> {
        self.get_trading_fee_for(&self.fee_pair.0, &self.fee_pair.1)
            .await
    }
}
