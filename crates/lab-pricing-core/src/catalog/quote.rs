use tracing::info;

use super::store::Catalog;
use crate::analytics::{calculate_profitability, AnalyticsInputs, ProfitabilityInput, ProfitabilityOutput};
use crate::pricing::{calculate_panel_price, PanelPriceInput, PricingResult};
use crate::types::ComputationOutput;
use crate::LabPricingResult;

/// Price an ad-hoc selection of an org's tests.
pub fn quote_selection<S: AsRef<str>>(
    catalog: &Catalog,
    org_id: &str,
    test_ids: &[S],
) -> LabPricingResult<ComputationOutput<PricingResult>> {
    let tests = catalog.select_tests(org_id, test_ids)?;
    info!(org_id, tests = tests.len(), "quoting test selection");
    calculate_panel_price(&PanelPriceInput { tests })
}

/// Price a saved panel.
pub fn quote_panel(
    catalog: &Catalog,
    panel_id: &str,
) -> LabPricingResult<ComputationOutput<PricingResult>> {
    let tests = catalog.panel_tests(panel_id)?;
    info!(panel_id, tests = tests.len(), "quoting panel");
    calculate_panel_price(&PanelPriceInput { tests })
}

/// Price a saved panel and project its profitability.
pub fn analyze_panel(
    catalog: &Catalog,
    panel_id: &str,
    assumptions: &AnalyticsInputs,
) -> LabPricingResult<ComputationOutput<ProfitabilityOutput>> {
    let tests = catalog.panel_tests(panel_id)?;
    info!(panel_id, tests = tests.len(), "analyzing panel profitability");
    calculate_profitability(&ProfitabilityInput {
        tests,
        assumptions: assumptions.clone(),
    })
}

/// Price an ad-hoc selection and project its profitability.
pub fn analyze_selection<S: AsRef<str>>(
    catalog: &Catalog,
    org_id: &str,
    test_ids: &[S],
    assumptions: &AnalyticsInputs,
) -> LabPricingResult<ComputationOutput<ProfitabilityOutput>> {
    let tests = catalog.select_tests(org_id, test_ids)?;
    info!(org_id, tests = tests.len(), "analyzing selection profitability");
    calculate_profitability(&ProfitabilityInput {
        tests,
        assumptions: assumptions.clone(),
    })
}
