/// Transport kernel shared by exchange connectors
///
/// The kernel holds only exchange-agnostic pieces:
///
/// - `RestClient`: HTTP transport interface, with `ReqwestRest` as the default implementation
/// - `Signer`: pluggable request authentication
/// - `MonotonicClock`: non-decreasing millisecond timestamps for request signing
///
/// Exchange modules supply the canonical string, header names and response
/// envelopes; the kernel never inspects response contents.
///
/// # Example
/// ```rust,no_run
/// use btcmx::core::kernel::{RestClient, RestClientBuilder, RestClientConfig};
/// use std::collections::HashMap;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RestClientConfig::new(
///     "https://api.btcmarkets.net".to_string(),
///     "btcmarkets".to_string(),
/// )
/// .with_timeout(10);
/// let rest = RestClientBuilder::new(config).build()?;
///
/// let tick = rest.get("/market/BTC/AUD/tick", &[], &HashMap::new()).await?;
/// println!("{}", tick);
/// # Ok(())
/// # }
/// ```
pub mod rest;
pub mod signer;

pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{MonotonicClock, SignatureResult, Signer};
