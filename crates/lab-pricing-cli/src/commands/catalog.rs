use clap::Args;
use serde_json::{json, Value};

use lab_pricing_core::catalog::quote;

use super::load_catalog;
use crate::GlobalOpts;

/// Arguments for listing catalog tests
#[derive(Args)]
pub struct TestsArgs {
    /// Case-insensitive filter on test id or name
    #[arg(long)]
    pub search: Option<String>,
}

/// Arguments for listing saved panels
#[derive(Args)]
pub struct PanelsArgs {
    /// Case-insensitive filter on panel name
    #[arg(long)]
    pub search: Option<String>,

    /// Include each panel's computed total price
    #[arg(long)]
    pub priced: bool,
}

/// Arguments for listing directory users
#[derive(Args)]
pub struct UsersArgs {
    /// List every user in the directory instead of only the org's
    #[arg(long)]
    pub all: bool,
}

/// Organizations with their live user counts, plus directory totals.
pub fn run_orgs(opts: &GlobalOpts) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(opts)?;
    let organizations: Vec<Value> = catalog
        .organizations
        .iter()
        .map(|org| {
            json!({
                "id": org.id,
                "name": org.name,
                "code": org.code,
                "created_at": org.created_at,
                "tests_count": org.tests_count,
                "users": catalog.users_for_org(&org.id).len(),
            })
        })
        .collect();

    Ok(json!({
        "summary": catalog.directory_summary(),
        "organizations": organizations,
    }))
}

pub fn run_users(args: UsersArgs, opts: &GlobalOpts) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(opts)?;
    let users: Vec<_> = if args.all {
        catalog.users.iter().collect()
    } else {
        catalog.users_for_org(&opts.org)
    };

    let rows: Vec<Value> = users
        .into_iter()
        .map(|u| {
            json!({
                "id": u.id,
                "name": u.name,
                "email": u.email,
                "role": u.role.label(),
                "org_id": u.org_id,
            })
        })
        .collect();
    Ok(Value::Array(rows))
}

pub fn run_tests(args: TestsArgs, opts: &GlobalOpts) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(opts)?;
    let tests = catalog.search_tests(&opts.org, args.search.as_deref().unwrap_or_default());
    Ok(serde_json::to_value(tests)?)
}

pub fn run_panels(args: PanelsArgs, opts: &GlobalOpts) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(opts)?;
    let panels = catalog.search_panels(&opts.org, args.search.as_deref().unwrap_or_default());

    let mut rows: Vec<Value> = Vec::with_capacity(panels.len());
    for panel in panels {
        let mut row = json!({
            "id": panel.id,
            "name": panel.name,
            "tests": panel.test_ids,
        });
        if args.priced {
            let priced = quote::quote_panel(&catalog, &panel.id)?;
            row["total_price"] = serde_json::to_value(priced.result.total_price)?;
        }
        rows.push(row);
    }
    Ok(Value::Array(rows))
}
