use crate::core::errors::ExchangeError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Result type for signing operations: (headers, `query_params`)
pub type SignatureResult = Result<(HashMap<String, String>, Vec<(String, String)>), ExchangeError>;

/// Signer trait for request authentication
///
/// Implementations own the venue-specific canonical string and header names.
pub trait Signer: Send + Sync {
    /// Sign a request and return headers and query parameters
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `endpoint` - API endpoint path, without host
    /// * `query_string` - Query string (without leading '?')
    /// * `body` - Raw request body bytes, exactly as they will be sent
    /// * `timestamp` - Request timestamp in milliseconds
    ///
    /// # Returns
    /// Tuple of (headers, signed_query_params) to include in the request
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult;
}

/// Millisecond wall clock that never runs backwards.
///
/// Exchanges that reject stale or repeated timestamps see a non-decreasing
/// sequence even if the system clock is stepped back between two calls.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: AtomicU64,
}

impl MonotonicClock {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Current Unix time in milliseconds, clamped to the last value handed out
    pub fn now_millis(&self) -> Result<u64, ExchangeError> {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .map_err(|e| ExchangeError::Other(format!("System time error: {}", e)))?;

        let previous = self.last.fetch_max(wall, Ordering::AcqRel);
        Ok(previous.max(wall))
    }

    /// Last timestamp handed out, or 0 if none yet
    pub fn last_millis(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }
}
