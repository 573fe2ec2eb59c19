use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages expressed on a 0-100 scale (48.5 = 48.5%).
pub type Percent = Decimal;

/// A test offered by a lab, as held in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabTest {
    /// Catalog identifier, e.g. "T-001"
    pub id: String,
    pub name: String,
    /// Consumables cost of running the test once
    pub reagent_cost: Money,
    /// Undiscounted price charged when the test is sold alone
    pub list_price: Money,
    #[serde(default)]
    pub category: String,
    /// Owning organization
    #[serde(default)]
    pub org_id: String,
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
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Decimal arithmetic that saturates at `Decimal::MAX` / `Decimal::MIN`
/// instead of panicking, and records whether any step left the range.
#[derive(Debug, Default)]
pub struct DecimalGuard {
    overflowed: bool,
}

impl DecimalGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once any operation saturated.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    fn saturate(&mut self, negative: bool) -> Decimal {
        self.overflowed = true;
        if negative {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    }

    pub fn add(&mut self, a: Decimal, b: Decimal) -> Decimal {
        match a.checked_add(b) {
            Some(v) => v,
            None => self.saturate(a.is_sign_negative()),
        }
    }

    pub fn sub(&mut self, a: Decimal, b: Decimal) -> Decimal {
        match a.checked_sub(b) {
            Some(v) => v,
            None => self.saturate(a.is_sign_negative()),
        }
    }

    pub fn mul(&mut self, a: Decimal, b: Decimal) -> Decimal {
        match a.checked_mul(b) {
            Some(v) => v,
            None => self.saturate(a.is_sign_negative() != b.is_sign_negative()),
        }
    }

    /// Callers guard against a zero divisor; a zero divisor saturates.
    pub fn div(&mut self, a: Decimal, b: Decimal) -> Decimal {
        match a.checked_div(b) {
            Some(v) => v,
            None => self.saturate(a.is_sign_negative() != b.is_sign_negative()),
        }
    }

    pub fn sum(&mut self, values: impl IntoIterator<Item = Decimal>) -> Decimal {
        values
            .into_iter()
            .fold(Decimal::ZERO, |acc, v| self.add(acc, v))
    }
}
