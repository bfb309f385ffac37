use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values (Nepalese rupees). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual interest rate expressed as a percentage (10.00 = 10% p.a.).
pub type Percent = Decimal;

/// Fractional rates (0.01 = 1%).
pub type Rate = Decimal;

/// Number of decimal places every stored currency amount carries.
pub const CURRENCY_DP: u32 = 2;

/// Quantize to paisa using banker's rounding (round-half-even).
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointNearestEven);
    // round_dp never adds scale; 100000 must come out as 100000.00
    rounded.rescale(CURRENCY_DP);
    rounded
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit_half_even_2dp".to_string(),
        },
    }
}
