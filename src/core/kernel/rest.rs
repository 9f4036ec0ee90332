use crate::core::errors::ExchangeError;
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{instrument, trace};

/// REST transport used by the exchange layer
///
/// Implementations only move bytes: authentication headers and the exact body
/// are prepared by the caller, which keeps signing independent of the HTTP stack.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Make a GET request
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path
    /// * `query_params` - Query parameters as key-value pairs
    /// * `headers` - Extra headers, e.g. authentication headers
    ///
    /// # Returns
    /// The response body as a JSON value (`Value::Null` for an empty body)
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        headers: &HashMap<String, String>,
    ) -> Result<Value, ExchangeError>;

    /// Make a POST request
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path
    /// * `headers` - Extra headers, e.g. authentication headers
    /// * `body` - Serialized request body, sent unchanged
    ///
    /// # Returns
    /// The response body as a JSON value (`Value::Null` for an empty body)
    async fn post(
        &self,
        endpoint: &str,
        headers: &HashMap<String, String>,
        body: &[u8],
    ) -> Result<Value, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    /// Create a new configuration
    ///
    /// # Arguments
    /// * `base_url` - Base URL for the API
    /// * `exchange_name` - Name of the exchange
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url,
            exchange_name,
            timeout_seconds: 20,
            user_agent: "btcmx rust client".to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self { config }
    }

    /// Build the REST client
    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone, Debug)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
}

impl ReqwestRest {
    /// Create a client with default timeout and user agent
    pub fn new(base_url: String, exchange_name: String) -> Result<Self, ExchangeError> {
        RestClientBuilder::new(RestClientConfig::new(base_url, exchange_name)).build()
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    /// Handle the response and extract JSON
    #[instrument(skip(self, response), fields(exchange = %self.config.exchange_name, status = %response.status()))]
    async fn handle_response(&self, response: Response) -> Result<Value, ExchangeError> {
        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        trace!("Response body: {}", response_text);

        if !status.is_success() {
            return Err(ExchangeError::ApiError {
                code: i32::from(status.as_u16()),
                message: response_text,
            });
        }

        if response_text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_text).map_err(|e| {
            ExchangeError::SchemaError(format!("Failed to parse JSON response: {}", e))
        })
    }

    #[instrument(skip(self, headers, body), fields(exchange = %self.config.exchange_name, method = %method, endpoint = %endpoint))]
    async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        headers: &HashMap<String, String>,
        body: &[u8],
    ) -> Result<Value, ExchangeError> {
        let url = self.build_url(endpoint);
        let mut request = self.client.request(method, &url);

        if !query_params.is_empty() {
            request = request.query(query_params);
        }

        for (key, value) in headers {
            request = request.header(key.as_str(), value.as_str());
        }

        if !body.is_empty() {
            request = request.body(body.to_vec());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("Request failed: {}", e)))?;

        self.handle_response(response).await
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        headers: &HashMap<String, String>,
    ) -> Result<Value, ExchangeError> {
        self.make_request(Method::GET, endpoint, query_params, headers, &[])
            .await
    }

    async fn post(
        &self,
        endpoint: &str,
        headers: &HashMap<String, String>,
        body: &[u8],
    ) -> Result<Value, ExchangeError> {
        self.make_request(Method::POST, endpoint, &[], headers, body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RestClientConfig::new(
            "https://api.btcmarkets.net".to_string(),
            "btcmarkets".to_string(),
        );
        assert_eq!(config.timeout_seconds, 20);

        let config = config
            .with_timeout(5)
            .with_user_agent("custom/1.0".to_string());
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.user_agent, "custom/1.0");
    }

    #[test]
    fn test_build_url() {
        let rest = ReqwestRest::new(
            "https://api.btcmarkets.net".to_string(),
            "btcmarkets".to_string(),
        )
        .unwrap();
        assert_eq!(
            rest.build_url("/market/BTC/AUD/tick"),
            "https://api.btcmarkets.net/market/BTC/AUD/tick"
        );
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Nothing listens on port 9 locally; the request must fail before any response
        let rest = RestClientBuilder::new(
            RestClientConfig::new("http://127.0.0.1:9".to_string(), "btcmarkets".to_string())
                .with_timeout(2),
        )
        .build()
        .unwrap();

        let result = rest.get("/market/BTC/AUD/tick", &[], &HashMap::new()).await;
        assert!(matches!(result, Err(ExchangeError::NetworkError(_))));
    }
}
