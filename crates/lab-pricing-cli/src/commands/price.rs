use clap::Args;
use serde_json::Value;

use lab_pricing_core::catalog::quote;
use lab_pricing_core::pricing::{self, PanelPriceInput};

use super::load_catalog;
use crate::input;
use crate::GlobalOpts;

/// Arguments for panel pricing
#[derive(Args)]
pub struct PriceArgs {
    /// Path to JSON input file: {"tests": [...]}
    #[arg(long)]
    pub input: Option<String>,

    /// Catalog test ids (comma-separated, e.g. "T-001,T-002,T-004")
    #[arg(long, value_delimiter = ',', conflicts_with = "panel")]
    pub tests: Option<Vec<String>>,

    /// Saved panel id from the catalog, e.g. "P-001"
    #[arg(long)]
    pub panel: Option<String>,
}

pub fn run_price(args: PriceArgs, opts: &GlobalOpts) -> Result<Value, Box<dyn std::error::Error>> {
    let output = if let Some(ref path) = args.input {
        let price_input: PanelPriceInput = input::file::read_json(path)?;
        pricing::calculate_panel_price(&price_input)?
    } else if let Some(ref panel_id) = args.panel {
        let catalog = load_catalog(opts)?;
        quote::quote_panel(&catalog, panel_id)?
    } else if let Some(ref ids) = args.tests {
        let catalog = load_catalog(opts)?;
        quote::quote_selection(&catalog, &opts.org, ids.as_slice())?
    } else if let Some(price_input) = input::stdin::read_stdin::<PanelPriceInput>()? {
        pricing::calculate_panel_price(&price_input)?
    } else {
        return Err(
            "--input <file.json>, --tests <ids>, --panel <id> or stdin required for panel pricing"
                .into(),
        );
    };
    Ok(serde_json::to_value(output)?)
}
