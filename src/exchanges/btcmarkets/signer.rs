use crate::core::errors::ExchangeError;
use crate::core::kernel::{SignatureResult, Signer};
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::collections::HashMap;
use std::fmt;
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

pub const HEADER_API_KEY: &str = "apikey";
pub const HEADER_SIGNATURE: &str = "signature";
pub const HEADER_TIMESTAMP: &str = "timestamp";

/// HMAC-SHA512 request signer for BTC Markets
pub struct BtcMarketsSigner {
    api_key: String,
    secret: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for BtcMarketsSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BtcMarketsSigner")
            .field("api_key", &self.api_key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl BtcMarketsSigner {
    /// Create a signer from the API key and the Base64 private key issued by the exchange
    pub fn new(api_key: String, secret_key: &str) -> Result<Self, ExchangeError> {
        let secret = general_purpose::STANDARD
            .decode(secret_key.trim())
            .map_err(|e| {
                ExchangeError::DecodingError(format!("Secret key is not valid Base64: {}", e))
            })?;

        Ok(Self {
            api_key,
            secret: Zeroizing::new(secret),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The string that gets signed: `path \n timestamp \n body`.
    ///
    /// `body` must be the exact bytes that are transmitted; it is not reformatted here.
    pub fn canonical_string(endpoint: &str, timestamp: u64, body: Option<&str>) -> String {
        match body {
            Some(body) if !body.is_empty() => format!("{}\n{}\n{}", endpoint, timestamp, body),
            _ => format!("{}\n{}\n", endpoint, timestamp),
        }
    }

    /// Base64(HMAC-SHA512(secret, canonical))
    pub fn generate_signature(&self, canonical: &str) -> Result<String, ExchangeError> {
        let mut mac = HmacSha512::new_from_slice(&self.secret)
            .map_err(|e| ExchangeError::AuthError(format!("Failed to create HMAC: {}", e)))?;
        mac.update(canonical.as_bytes());
        Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Authentication and content negotiation headers for one request
    pub fn sign(
        &self,
        endpoint: &str,
        body: Option<&str>,
        timestamp: u64,
    ) -> Result<HashMap<String, String>, ExchangeError> {
        let canonical = Self::canonical_string(endpoint, timestamp, body);
        let signature = self.generate_signature(&canonical)?;

        let mut headers = HashMap::new();
        headers.insert("accept".to_string(), "application/json".to_string());
        headers.insert("accept-charset".to_string(), "utf-8".to_string());
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert(HEADER_API_KEY.to_string(), self.api_key.clone());
        headers.insert(HEADER_SIGNATURE.to_string(), signature);
        headers.insert(HEADER_TIMESTAMP.to_string(), timestamp.to_string());
        Ok(headers)
    }
}

impl Signer for BtcMarketsSigner {
    fn sign_request(
        &self,
        _method: &str,
        endpoint: &str,
        _query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult {
        let body = if body.is_empty() {
            None
        } else {
            Some(std::str::from_utf8(body).map_err(|e| {
                ExchangeError::SerializationError(format!("Invalid body encoding: {}", e))
            })?)
        };

        let headers = self.sign(endpoint, body, timestamp)?;

        // Authentication lives entirely in headers
        Ok((headers, Vec::new()))
    }
}
