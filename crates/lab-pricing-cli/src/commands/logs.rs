use clap::{Args, ValueEnum};
use serde_json::Value;

use lab_pricing_core::audit_log::{self, LogQuery};
use lab_pricing_core::catalog::LogSource;

use super::load_catalog;
use crate::GlobalOpts;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Calculator,
    Api,
}

impl From<SourceArg> for LogSource {
    fn from(s: SourceArg) -> Self {
        match s {
            SourceArg::Calculator => LogSource::Calculator,
            SourceArg::Api => LogSource::Api,
        }
    }
}

/// Arguments for audit log search
#[derive(Args)]
pub struct LogsArgs {
    /// Test ids or names, separated by spaces or commas
    #[arg(long)]
    pub search: Option<String>,

    /// First day included (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day included (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Only entries from this source
    #[arg(long)]
    pub source: Option<SourceArg>,
}

pub fn run_logs(args: LogsArgs, opts: &GlobalOpts) -> Result<Value, Box<dyn std::error::Error>> {
    let query = LogQuery {
        search: args.search.filter(|s| !s.trim().is_empty()),
        date_from: args.from.as_deref().map(audit_log::parse_day).transpose()?,
        date_to: args.to.as_deref().map(audit_log::parse_day).transpose()?,
        source: args.source.map(LogSource::from),
    };

    let catalog = load_catalog(opts)?;
    let result = audit_log::search_audit_log(&catalog, &opts.org, &query)?;
    Ok(serde_json::to_value(result)?)
}
