use clap::Args;
use serde_json::Value;

use lab_pricing_core::analytics::{self, ProfitabilityInput};
use lab_pricing_core::catalog::quote;

use super::load_catalog;
use crate::input;
use crate::input::assumptions::AssumptionArgs;
use crate::GlobalOpts;

/// Arguments for profitability analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON input file: {"tests": [...], "assumptions": {...}}
    #[arg(long)]
    pub input: Option<String>,

    /// Catalog test ids (comma-separated)
    #[arg(long, value_delimiter = ',', conflicts_with = "panel")]
    pub tests: Option<Vec<String>>,

    /// Saved panel id from the catalog
    #[arg(long)]
    pub panel: Option<String>,

    #[command(flatten)]
    pub assumptions: AssumptionArgs,
}

pub fn run_analyze(
    args: AnalyzeArgs,
    opts: &GlobalOpts,
) -> Result<Value, Box<dyn std::error::Error>> {
    let output = if let Some(ref path) = args.input {
        let pa_input: ProfitabilityInput = input::file::read_json(path)?;
        analytics::calculate_profitability(&pa_input)?
    } else if let Some(ref panel_id) = args.panel {
        let catalog = load_catalog(opts)?;
        quote::analyze_panel(&catalog, panel_id, &args.assumptions.to_inputs())?
    } else if let Some(ref ids) = args.tests {
        let catalog = load_catalog(opts)?;
        quote::analyze_selection(
            &catalog,
            &opts.org,
            ids.as_slice(),
            &args.assumptions.to_inputs(),
        )?
    } else if let Some(pa_input) = input::stdin::read_stdin::<ProfitabilityInput>()? {
        analytics::calculate_profitability(&pa_input)?
    } else {
        return Err(
            "--input <file.json>, --tests <ids>, --panel <id> or stdin required for profitability analysis"
                .into(),
        );
    };
    Ok(serde_json::to_value(output)?)
}
