use crate::core::errors::ExchangeError;
use serde::Serialize;

/// Fixed-point scale of amounts on the wire: 1.0 in domain units is `100_000_000` on the wire
pub const WIRE_SCALE: i64 = 100_000_000;

/// Converts between the exchange's scaled integers and domain floats.
///
/// Outbound values are rounded half away from zero, so `0.29` becomes `29_000_000`
/// rather than the truncated `28_999_999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireCodec {
    scale: i64,
}

impl Default for WireCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl WireCodec {
    pub const fn new() -> Self {
        Self { scale: WIRE_SCALE }
    }

    /// Codec for a venue that uses a different fixed-point scale
    pub fn with_scale(scale: i64) -> Result<Self, ExchangeError> {
        if scale <= 0 {
            return Err(ExchangeError::InvalidParameters(format!(
                "Wire scale must be positive, got {}",
                scale
            )));
        }
        Ok(Self { scale })
    }

    /// Scaled integer for `amount`.
    ///
    /// Fails instead of saturating when the scaled value does not fit in an `i64`.
    pub fn to_wire(&self, amount: f64) -> Result<i64, ExchangeError> {
        let scaled = (amount * self.scale as f64).round();
        // i64::MAX as f64 rounds up to 2^63, which is itself out of range
        if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
            return Err(ExchangeError::InvalidParameters(format!(
                "Amount {} does not fit the wire format at scale {}",
                amount, self.scale
            )));
        }
        Ok(scaled as i64)
    }

    pub fn from_wire(&self, raw: i64) -> f64 {
        raw as f64 / self.scale as f64
    }

    /// Serialize a request body with no inserted whitespace.
    ///
    /// The returned text is both signed and sent, so callers must not re-serialize it.
    pub fn serialize_compact<T: Serialize + ?Sized>(body: &T) -> Result<String, ExchangeError> {
        serde_json::to_string(body).map_err(|e| {
            ExchangeError::SerializationError(format!("Failed to serialize request body: {}", e))
        })
    }
}
