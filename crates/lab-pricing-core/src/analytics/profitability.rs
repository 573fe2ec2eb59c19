use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::LabPricingError;
use crate::pricing::{try_price_panel, PricingResult};
use crate::types::{with_metadata, ComputationOutput, DecimalGuard, LabTest, Money, Percent};
use crate::LabPricingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Operating assumptions for today and for the projected state.
///
/// Every field defaults to zero when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsInputs {
    #[serde(default)]
    pub current_daily_overhead: Money,
    #[serde(default)]
    pub current_panels_per_day: Decimal,
    #[serde(default)]
    pub future_daily_overhead: Money,
    #[serde(default)]
    pub future_panels_per_day: Decimal,
}

impl AnalyticsInputs {
    /// (daily overhead, panels per day) for a scenario.
    pub fn scenario(&self, scenario: Scenario) -> (Money, Decimal) {
        match scenario {
            Scenario::Current => (self.current_daily_overhead, self.current_panels_per_day),
            Scenario::Future => (self.future_daily_overhead, self.future_panels_per_day),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Current,
    Future,
}

impl Scenario {
    pub const ALL: [Scenario; 2] = [Scenario::Current, Scenario::Future];

    pub fn label(&self) -> &'static str {
        match self {
            Scenario::Current => "current",
            Scenario::Future => "future",
        }
    }
}

/// Unit economics of one panel under one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProfitability {
    pub scenario: Scenario,
    /// daily_overhead / panels_per_day, zero when no panels are run
    pub overhead_per_panel: Money,
    /// total_reagent_cost + overhead_per_panel
    pub total_cost: Money,
    /// panel_price - total_cost
    pub gross_margin: Money,
    /// gross_margin / panel_price * 100, zero when the panel is free
    pub gross_margin_pct: Percent,
    /// gross_margin > 0
    pub profitable: bool,
}

/// Profitability of a priced panel under current and projected assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    /// Same as the pricing total
    pub panel_price: Money,
    pub total_reagent_cost: Money,
    pub current: ScenarioProfitability,
    pub future: ScenarioProfitability,
}

impl AnalyticsResult {
    pub fn scenario(&self, scenario: Scenario) -> &ScenarioProfitability {
        match scenario {
            Scenario::Current => &self.current,
            Scenario::Future => &self.future,
        }
    }
}

/// Input for the enveloped profitability call: a test selection plus
/// operating assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitabilityInput {
    pub tests: Vec<LabTest>,
    #[serde(default)]
    pub assumptions: AnalyticsInputs,
}

/// Pricing and the profitability derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitabilityOutput {
    pub pricing: PricingResult,
    pub analytics: AnalyticsResult,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

fn overhead_per_panel(
    daily_overhead: Money,
    panels_per_day: Decimal,
    guard: &mut DecimalGuard,
) -> Money {
    if panels_per_day > Decimal::ZERO {
        guard.div(daily_overhead, panels_per_day)
    } else {
        Decimal::ZERO
    }
}

fn margin_pct(gross_margin: Money, panel_price: Money, guard: &mut DecimalGuard) -> Percent {
    if panel_price > Decimal::ZERO {
        let ratio = guard.div(gross_margin, panel_price);
        guard.mul(ratio, dec!(100))
    } else {
        Decimal::ZERO
    }
}

fn evaluate_scenario(
    pricing: &PricingResult,
    inputs: &AnalyticsInputs,
    scenario: Scenario,
    guard: &mut DecimalGuard,
) -> ScenarioProfitability {
    let (daily_overhead, panels_per_day) = inputs.scenario(scenario);
    let overhead_per_panel = overhead_per_panel(daily_overhead, panels_per_day, guard);
    let total_cost = guard.add(pricing.total_reagent_cost, overhead_per_panel);
    let gross_margin = guard.sub(pricing.total_price, total_cost);

    debug!(
        scenario = scenario.label(),
        %overhead_per_panel,
        %total_cost,
        %gross_margin,
        "evaluated profitability scenario"
    );

    ScenarioProfitability {
        scenario,
        overhead_per_panel,
        total_cost,
        gross_margin,
        gross_margin_pct: margin_pct(gross_margin, pricing.total_price, guard),
        profitable: gross_margin > Decimal::ZERO,
    }
}

/// Derive per-panel overhead, cost, margin and profitability for the current
/// and projected scenarios. `pricing` is only read.
///
/// Out-of-range amounts saturate at `Decimal::MAX` / `Decimal::MIN`.
pub fn analyze_profitability(pricing: &PricingResult, inputs: &AnalyticsInputs) -> AnalyticsResult {
    analyze_guarded(pricing, inputs, &mut DecimalGuard::new())
}

fn analyze_guarded(
    pricing: &PricingResult,
    inputs: &AnalyticsInputs,
    guard: &mut DecimalGuard,
) -> AnalyticsResult {
    AnalyticsResult {
        panel_price: pricing.total_price,
        total_reagent_cost: pricing.total_reagent_cost,
        current: evaluate_scenario(pricing, inputs, Scenario::Current, guard),
        future: evaluate_scenario(pricing, inputs, Scenario::Future, guard),
    }
}

/// Price the selection, run profitability on it, and wrap both in the
/// standard output envelope. Amounts that leave the decimal range are
/// rejected as `InvalidInput`.
pub fn calculate_profitability(
    input: &ProfitabilityInput,
) -> LabPricingResult<ComputationOutput<ProfitabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let pricing = try_price_panel(&input.tests)?;

    let mut guard = DecimalGuard::new();
    let analytics = analyze_guarded(&pricing, &input.assumptions, &mut guard);
    if guard.overflowed() {
        return Err(LabPricingError::InvalidInput {
            field: "assumptions".into(),
            reason: "overhead per panel or margin exceeds the representable decimal range".into(),
        });
    }

    if pricing.total_price == Decimal::ZERO {
        warnings.push("Panel price is zero; margin percentages reported as 0".to_string());
    }

    for scenario in Scenario::ALL {
        let (daily_overhead, panels_per_day) = input.assumptions.scenario(scenario);
        if daily_overhead < Decimal::ZERO {
            warnings.push(format!(
                "{} daily overhead is negative ({})",
                scenario.label(),
                daily_overhead
            ));
        }
        if panels_per_day <= Decimal::ZERO {
            warnings.push(format!(
                "{} panels per day is {}; overhead per panel set to 0",
                scenario.label(),
                panels_per_day
            ));
        }
        let result = analytics.scenario(scenario);
        if !pricing.tests.is_empty() && !result.profitable {
            warnings.push(format!(
                "Panel is not profitable under {} assumptions (margin {})",
                scenario.label(),
                result.gross_margin.round_dp(2)
            ));
        }
    }

    for w in &warnings {
        warn!("{}", w);
    }

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Per-panel overhead allocation and gross margin, current vs projected",
        &serde_json::json!({
            "test_count": input.tests.len(),
            "current_daily_overhead": input.assumptions.current_daily_overhead.to_string(),
            "current_panels_per_day": input.assumptions.current_panels_per_day.to_string(),
            "future_daily_overhead": input.assumptions.future_daily_overhead.to_string(),
            "future_panels_per_day": input.assumptions.future_panels_per_day.to_string(),
        }),
        warnings,
        elapsed,
        ProfitabilityOutput { pricing, analytics },
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
