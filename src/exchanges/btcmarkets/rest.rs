use crate::core::errors::ExchangeError;
use crate::core::kernel::{MonotonicClock, RestClient, Signer};
use crate::core::types::{ApiOutcome, ApiRejection};
use crate::exchanges::btcmarkets::codec::WireCodec;
use crate::exchanges::btcmarkets::conversions;
use crate::exchanges::btcmarkets::types::{BtcMarketsCancelRequest, BtcMarketsOrderRequest};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub const ORDER_CREATE_PATH: &str = "/order/create";
pub const ORDER_CANCEL_PATH: &str = "/order/cancel";
pub const ACCOUNT_BALANCE_PATH: &str = "/account/balance";

/// BTC Markets endpoints on top of a generic `RestClient`.
///
/// Signs authenticated calls and sorts every answer into success, exchange
/// rejection (`Ok(ApiOutcome::Rejected)`) or hard failure (`Err`).
#[derive(Clone)]
pub struct BtcMarketsRest<R: RestClient> {
    client: R,
    signer: Option<Arc<dyn Signer>>,
    clock: Arc<MonotonicClock>,
}

impl<R: RestClient> BtcMarketsRest<R> {
    pub fn new(client: R, signer: Option<Arc<dyn Signer>>) -> Self {
        Self {
            client,
            signer,
            clock: Arc::new(MonotonicClock::new()),
        }
    }

    pub fn can_sign(&self) -> bool {
        self.signer.is_some()
    }

    fn auth_headers(
        &self,
        method: &str,
        endpoint: &str,
        body: &[u8],
    ) -> Result<HashMap<String, String>, ExchangeError> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            ExchangeError::AuthError("Authentication required but no signer provided".to_string())
        })?;

        let timestamp = self.clock.now_millis()?;
        let (headers, _params) = signer.sign_request(method, endpoint, "", body, timestamp)?;
        debug!(endpoint, timestamp, "signed request");
        Ok(headers)
    }

    /// Sort a transport result into the three outcome classes.
    ///
    /// `require_success` is set for POSTs, which only count as accepted when
    /// the body says `"success": true`.
    fn classify(
        endpoint: &str,
        result: Result<Value, ExchangeError>,
        require_success: bool,
    ) -> Result<ApiOutcome<Value>, ExchangeError> {
        let rejection = match result {
            Ok(Value::Null) => ApiRejection {
                status: None,
                error_code: None,
                message: "Empty response".to_string(),
            },
            Ok(value) => match conversions::convert_rejection(&value) {
                Some(rejection) => rejection,
                None if require_success
                    && value.get("success").and_then(Value::as_bool) != Some(true) =>
                {
                    ApiRejection {
                        status: None,
                        error_code: None,
                        message: "Response did not report success".to_string(),
                    }
                }
                None => return Ok(ApiOutcome::Success(value)),
            },
            Err(ExchangeError::ApiError { code, message }) => {
                conversions::convert_http_rejection(code, &message)
            }
            Err(e) => return Err(e),
        };

        warn!(endpoint, %rejection, "request rejected by exchange");
        Ok(ApiOutcome::Rejected(rejection))
    }

    async fn public_get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> Result<ApiOutcome<Value>, ExchangeError> {
        let result = self
            .client
            .get(endpoint, query_params, &HashMap::new())
            .await;
        Self::classify(endpoint, result, false)
    }

    async fn signed_get(&self, endpoint: &str) -> Result<ApiOutcome<Value>, ExchangeError> {
        let headers = self.auth_headers("GET", endpoint, &[])?;
        let result = self.client.get(endpoint, &[], &headers).await;
        Self::classify(endpoint, result, false)
    }

    async fn signed_post<T: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<ApiOutcome<Value>, ExchangeError> {
        // Signed and sent from the same buffer
        let body = WireCodec::serialize_compact(body)?;
        let headers = self.auth_headers("POST", endpoint, body.as_bytes())?;
        let result = self.client.post(endpoint, &headers, body.as_bytes()).await;
        Self::classify(endpoint, result, true)
    }

    #[instrument(skip(self), fields(exchange = "btcmarkets"))]
    pub async fn get_tick(
        &self,
        instrument: &str,
        currency: &str,
    ) -> Result<ApiOutcome<Value>, ExchangeError> {
        let endpoint = format!("/market/{}/{}/tick", instrument, currency);
        self.public_get(&endpoint, &[]).await
    }

    #[instrument(skip(self), fields(exchange = "btcmarkets"))]
    pub async fn get_order_book(
        &self,
        instrument: &str,
        currency: &str,
    ) -> Result<ApiOutcome<Value>, ExchangeError> {
        let endpoint = format!("/market/{}/{}/orderbook", instrument, currency);
        self.public_get(&endpoint, &[]).await
    }

    #[instrument(skip(self), fields(exchange = "btcmarkets"))]
    pub async fn get_trades(
        &self,
        instrument: &str,
        currency: &str,
        since: Option<u64>,
    ) -> Result<ApiOutcome<Value>, ExchangeError> {
        let endpoint = format!("/market/{}/{}/trades", instrument, currency);
        let since_str = since.map(|s| s.to_string());
        let mut params = Vec::new();
        if let Some(ref since) = since_str {
            params.push(("since", since.as_str()));
        }
        self.public_get(&endpoint, &params).await
    }

    #[instrument(skip(self), fields(exchange = "btcmarkets"))]
    pub async fn get_balances(&self) -> Result<ApiOutcome<Value>, ExchangeError> {
        self.signed_get(ACCOUNT_BALANCE_PATH).await
    }

    #[instrument(skip(self), fields(exchange = "btcmarkets"))]
    pub async fn get_trading_fee(
        &self,
        instrument: &str,
        currency: &str,
    ) -> Result<ApiOutcome<Value>, ExchangeError> {
        let endpoint = format!("/account/{}/{}/tradingfee", instrument, currency);
        self.signed_get(&endpoint).await
    }

    #[instrument(skip(self, order), fields(exchange = "btcmarkets", instrument = %order.instrument, side = %order.order_side))]
    pub async fn create_order(
        &self,
        order: &BtcMarketsOrderRequest,
    ) -> Result<ApiOutcome<Value>, ExchangeError> {
        self.signed_post(ORDER_CREATE_PATH, order).await
    }

    #[instrument(skip(self, request), fields(exchange = "btcmarkets", count = request.order_ids.len()))]
    pub async fn cancel_orders(
        &self,
        request: &BtcMarketsCancelRequest,
    ) -> Result<ApiOutcome<Value>, ExchangeError> {
        self.signed_post(ORDER_CANCEL_PATH, request).await
    }
}
