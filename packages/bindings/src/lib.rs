use napi::Result as NapiResult;
use napi_derive::napi;

use lab_pricing_core::analytics::{self, ProfitabilityInput};
use lab_pricing_core::audit_log::{self, LogQuery};
use lab_pricing_core::catalog::{quote, Catalog};
use lab_pricing_core::pricing::{self, PanelPriceInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// `{"tests": [...]}` -> enveloped panel pricing
#[napi]
pub fn price_panel(input_json: String) -> NapiResult<String> {
    let input: PanelPriceInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = pricing::calculate_panel_price(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Price a saved panel from a catalog document.
#[napi]
pub fn quote_panel(catalog_json: String, panel_id: String) -> NapiResult<String> {
    let catalog: Catalog = serde_json::from_str(&catalog_json).map_err(to_napi_error)?;
    let output = quote::quote_panel(&catalog, &panel_id).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// `{"tests": [...], "assumptions": {...}}` -> pricing plus profitability
#[napi]
pub fn analyze_profitability(input_json: String) -> NapiResult<String> {
    let input: ProfitabilityInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analytics::calculate_profitability(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

#[napi]
pub fn search_audit_log(
    catalog_json: String,
    org_id: String,
    query_json: String,
) -> NapiResult<String> {
    let catalog: Catalog = serde_json::from_str(&catalog_json).map_err(to_napi_error)?;
    let query: LogQuery = serde_json::from_str(&query_json).map_err(to_napi_error)?;
    let output = audit_log::search_audit_log(&catalog, &org_id, &query).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
