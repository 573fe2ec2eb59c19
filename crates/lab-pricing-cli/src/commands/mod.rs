pub mod analyze;
pub mod catalog;
pub mod logs;
pub mod price;

use lab_pricing_core::catalog::Catalog;

use crate::input;
use crate::GlobalOpts;

/// Load the catalog named by `--catalog` / `LABPRICE_CATALOG`.
pub fn load_catalog(opts: &GlobalOpts) -> Result<Catalog, Box<dyn std::error::Error>> {
    let path = opts
        .catalog
        .as_deref()
        .ok_or("--catalog <file.yaml> is required for catalog lookups")?;
    let catalog: Catalog = input::file::read_structured(path)?;

    if catalog.org_by_id(&opts.org).is_none() {
        tracing::warn!(org = %opts.org, "organization not found in catalog");
    }
    tracing::debug!(
        tests = catalog.tests.len(),
        panels = catalog.panels.len(),
        logs = catalog.logs.len(),
        "catalog loaded"
    );
    Ok(catalog)
}
