use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::LabPricingError;
use crate::types::{with_metadata, ComputationOutput, DecimalGuard, LabTest, Money};
use crate::LabPricingResult;

// ---------------------------------------------------------------------------
// Pricing constants
// ---------------------------------------------------------------------------

/// Fixed per-test handling overhead on top of reagents.
pub const MARGINAL_OVERHEAD: Money = dec!(5.0);

/// Add-ons are offered at this fraction of their list price.
pub const DISCOUNT_FACTOR: Decimal = dec!(0.5);

/// Add-ons never sell below this multiple of their marginal cost.
pub const FLOOR_MULTIPLIER: Decimal = dec!(3);

/// Flat donation charged once per panel request.
pub const DONATION_PER_REQUEST: Money = dec!(2.0);

/// Flat revenue share charged once per panel request.
pub const REVENUE_SHARE_PER_REQUEST: Money = dec!(3.0);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How a test is priced inside a panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PricingRole {
    /// Highest list price in the panel, sold at full list price
    Anchor,
    /// Every other test, sold at a discount bounded by the cost floor
    AddOn,
}

/// Priced breakdown of a single test within a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPricingDetail {
    pub test: LabTest,
    pub role: PricingRole,
    pub list_price: Money,
    pub reagent_cost: Money,
    /// Recorded for every test; only add-ons fold it into their floor
    pub marginal_overhead: Money,
    /// list_price * DISCOUNT_FACTOR (add-ons only)
    pub discounted_price: Option<Money>,
    /// FLOOR_MULTIPLIER * (reagent_cost + MARGINAL_OVERHEAD) (add-ons only)
    pub floor_price: Option<Money>,
    pub final_price: Money,
}

impl TestPricingDetail {
    fn new(test: &LabTest, role: PricingRole, guard: &mut DecimalGuard) -> Self {
        let (discounted_price, floor_price, final_price) = match role {
            PricingRole::Anchor => (None, None, test.list_price),
            PricingRole::AddOn => {
                let discounted = guard.mul(test.list_price, DISCOUNT_FACTOR);
                let marginal_cost = guard.add(test.reagent_cost, MARGINAL_OVERHEAD);
                let floor = guard.mul(FLOOR_MULTIPLIER, marginal_cost);
                (Some(discounted), Some(floor), discounted.max(floor))
            }
        };

        TestPricingDetail {
            test: test.clone(),
            role,
            list_price: test.list_price,
            reagent_cost: test.reagent_cost,
            marginal_overhead: MARGINAL_OVERHEAD,
            discounted_price,
            floor_price,
            final_price,
        }
    }

    /// True when an add-on's cost floor beat its discounted price.
    pub fn priced_at_floor(&self) -> bool {
        match (self.role, self.discounted_price, self.floor_price) {
            (PricingRole::AddOn, Some(discounted), Some(floor)) => floor > discounted,
            _ => false,
        }
    }
}

/// Full panel pricing breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Anchor first, then add-ons by descending list price
    pub tests: Vec<TestPricingDetail>,
    /// Sum of final prices
    pub subtotal: Money,
    pub donation: Money,
    pub revenue_share: Money,
    /// subtotal + donation + revenue_share
    pub total_price: Money,
    pub total_reagent_cost: Money,
    /// test count * MARGINAL_OVERHEAD
    pub total_overhead: Money,
}

impl PricingResult {
    /// The all-zero result for an empty selection. No flat fees apply.
    pub fn empty() -> Self {
        PricingResult {
            tests: Vec::new(),
            subtotal: Decimal::ZERO,
            donation: Decimal::ZERO,
            revenue_share: Decimal::ZERO,
            total_price: Decimal::ZERO,
            total_reagent_cost: Decimal::ZERO,
            total_overhead: Decimal::ZERO,
        }
    }

    pub fn anchor(&self) -> Option<&TestPricingDetail> {
        self.tests.iter().find(|d| d.role == PricingRole::Anchor)
    }

    pub fn add_ons(&self) -> impl Iterator<Item = &TestPricingDetail> {
        self.tests.iter().filter(|d| d.role == PricingRole::AddOn)
    }
}

/// Input for the enveloped panel pricing call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelPriceInput {
    /// Selected tests in selection order. Duplicates are priced independently.
    pub tests: Vec<LabTest>,
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Price a panel: the test with the highest list price is the anchor and sells
/// at list; every other test sells at half list, floored at three times its
/// marginal cost.
///
/// Ties on list price keep input order, so the first of several equally
/// priced tests becomes the anchor.
///
/// Amounts beyond the decimal range saturate at `Decimal::MAX` / `Decimal::MIN`;
/// `calculate_panel_price` rejects such input instead.
pub fn price_panel(tests: &[LabTest]) -> PricingResult {
    price_panel_guarded(tests, &mut DecimalGuard::new())
}

/// `price_panel` that fails with `InvalidInput` instead of saturating.
pub fn try_price_panel(tests: &[LabTest]) -> LabPricingResult<PricingResult> {
    let mut guard = DecimalGuard::new();
    let result = price_panel_guarded(tests, &mut guard);
    if guard.overflowed() {
        return Err(LabPricingError::InvalidInput {
            field: "tests".into(),
            reason: "panel amounts exceed the representable decimal range".into(),
        });
    }
    Ok(result)
}

fn price_panel_guarded(tests: &[LabTest], guard: &mut DecimalGuard) -> PricingResult {
    if tests.is_empty() {
        return PricingResult::empty();
    }

    let mut sorted: Vec<&LabTest> = tests.iter().collect();
    // sort_by is stable
    sorted.sort_by(|a, b| b.list_price.cmp(&a.list_price));

    let details: Vec<TestPricingDetail> = sorted
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let role = if i == 0 {
                PricingRole::Anchor
            } else {
                PricingRole::AddOn
            };
            TestPricingDetail::new(t, role, guard)
        })
        .collect();

    let anchor = &details[0];
    debug!(
        anchor = %anchor.test.id,
        anchor_price = %anchor.final_price,
        add_ons = details.len() - 1,
        "selected panel anchor"
    );

    let subtotal = guard.sum(details.iter().map(|d| d.final_price));
    let total_reagent_cost = guard.sum(details.iter().map(|d| d.reagent_cost));
    let total_overhead = guard.mul(Decimal::from(details.len()), MARGINAL_OVERHEAD);
    let with_donation = guard.add(subtotal, DONATION_PER_REQUEST);
    let total_price = guard.add(with_donation, REVENUE_SHARE_PER_REQUEST);

    PricingResult {
        tests: details,
        subtotal,
        donation: DONATION_PER_REQUEST,
        revenue_share: REVENUE_SHARE_PER_REQUEST,
        total_price,
        total_reagent_cost,
        total_overhead,
    }
}

/// Price a panel and wrap the result in the standard output envelope, with
/// warnings for suspicious but accepted input. Amounts whose totals leave the
/// decimal range are rejected as `InvalidInput`.
pub fn calculate_panel_price(
    input: &PanelPriceInput,
) -> LabPricingResult<ComputationOutput<PricingResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.tests.is_empty() {
        warnings.push("No tests selected; panel priced at zero with no flat fees".to_string());
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for t in &input.tests {
        if t.reagent_cost < Decimal::ZERO {
            warnings.push(format!(
                "Test {} has negative reagent cost ({})",
                t.id, t.reagent_cost
            ));
        }
        if t.list_price < Decimal::ZERO {
            warnings.push(format!(
                "Test {} has negative list price ({})",
                t.id, t.list_price
            ));
        }
        if !seen.insert(t.id.as_str()) {
            warnings.push(format!(
                "Test {} appears more than once and is priced per occurrence",
                t.id
            ));
        }
    }

    let result = try_price_panel(&input.tests)?;

    let at_floor = result.add_ons().filter(|d| d.priced_at_floor()).count();
    if at_floor > 0 {
        warnings.push(format!(
            "{} add-on test(s) priced at the cost floor instead of the discount",
            at_floor
        ));
    }

    for w in &warnings {
        warn!("{}", w);
    }

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Anchor/add-on tiered panel pricing with cost floor",
        &serde_json::json!({
            "test_count": input.tests.len(),
            "marginal_overhead": MARGINAL_OVERHEAD.to_string(),
            "discount_factor": DISCOUNT_FACTOR.to_string(),
            "floor_multiplier": FLOOR_MULTIPLIER.to_string(),
            "donation_per_request": DONATION_PER_REQUEST.to_string(),
            "revenue_share_per_request": REVENUE_SHARE_PER_REQUEST.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
