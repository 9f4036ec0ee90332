use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, Signer};
use crate::exchanges::btcmarkets::codec::WireCodec;
use crate::exchanges::btcmarkets::connector::{
    account::DEFAULT_FEE_PAIR, Account, BtcMarketsConnector, MarketData, Trading,
};
use crate::exchanges::btcmarkets::rest::BtcMarketsRest;
use crate::exchanges::btcmarkets::signer::BtcMarketsSigner;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://api.btcmarkets.net";

/// Builder for creating BTC Markets connectors
///
/// Credentials are optional: without them only public market data works and
/// signed calls fail with `ExchangeError::AuthError`.
pub struct BtcMarketsBuilder {
    config: ExchangeConfig,
    rest_timeout: u64,
    user_agent: Option<String>,
    fee_pair: (String, String),
    codec: WireCodec,
}

impl Default for BtcMarketsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BtcMarketsBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
            rest_timeout: 20,
            user_agent: None,
            fee_pair: (DEFAULT_FEE_PAIR.0.to_string(), DEFAULT_FEE_PAIR.1.to_string()),
            codec: WireCodec::new(),
        }
    }

    /// Set the exchange configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set API key and Base64 secret
    pub fn with_credentials(mut self, api_key: String, secret_key: String) -> Self {
        let base_url = self.config.base_url.take();
        self.config = ExchangeConfig::new(api_key, secret_key);
        self.config.base_url = base_url;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    /// Set REST client timeout in seconds
    pub fn with_rest_timeout(mut self, timeout: u64) -> Self {
        self.rest_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = Some(user_agent);
        self
    }

    /// Pair queried by `get_trading_fee`
    pub fn with_fee_pair(mut self, instrument: String, currency: String) -> Self {
        self.fee_pair = (instrument, currency);
        self
    }

    pub fn with_codec(mut self, codec: WireCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn build_signer(&self) -> Result<Option<Arc<dyn Signer>>, ExchangeError> {
        if !self.config.has_credentials() {
            return Ok(None);
        }

        let signer = BtcMarketsSigner::new(
            self.config.api_key().to_string(),
            self.config.secret_key(),
        )?;
        Ok(Some(Arc::new(signer)))
    }

    /// Build a connector on the default reqwest transport
    pub fn build(self) -> Result<BtcMarketsConnector<ReqwestRest>, ExchangeError> {
        let mut rest_config =
            RestClientConfig::new(self.base_url().to_string(), "btcmarkets".to_string())
                .with_timeout(self.rest_timeout);
        if let Some(user_agent) = self.user_agent.clone() {
            rest_config = rest_config.with_user_agent(user_agent);
        }

        let client = RestClientBuilder::new(rest_config).build()?;
        self.build_with_client(client)
    }

    /// Build a connector on a caller-supplied transport
    pub fn build_with_client<R: RestClient + Clone>(
        self,
        client: R,
    ) -> Result<BtcMarketsConnector<R>, ExchangeError> {
        let signer = self.build_signer()?;
        let rest = BtcMarketsRest::new(client, signer);
        let (fee_instrument, fee_currency) = self.fee_pair;

        Ok(BtcMarketsConnector {
            market: MarketData::new(rest.clone()),
            trading: Trading::new(rest.clone(), self.codec),
            account: Account::new(rest, self.codec).with_fee_pair(fee_instrument, fee_currency),
        })
    }
}

/// Create a BTC Markets connector from configuration
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<BtcMarketsConnector<ReqwestRest>, ExchangeError> {
    BtcMarketsBuilder::new().with_config(config).build()
}
