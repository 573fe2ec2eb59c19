pub mod search;

pub use search::{
    parse_day, search_audit_log, search_logs, LogMatch, LogQuery, LogSearchOutput, MatchRelevance,
};
