use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

use crate::catalog::{Catalog, LogEntry, LogSource};
use crate::types::{with_metadata, ComputationOutput, LabTest};
use crate::LabPricingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Filters applied to the audit trail. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogQuery {
    /// Free text matched against test ids and names. Terms are separated by
    /// whitespace or commas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// First day included (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    /// Last day included (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<LogSource>,
}

/// How well a log entry's panel matches the search terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRelevance {
    /// At least one term matched
    Partial,
    /// Every term matched and the panel has extra tests
    Superset,
    /// Every term matched and the panel has exactly one test per term
    Exact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMatch {
    pub entry: LogEntry,
    /// Number of search terms found in the panel
    pub match_count: usize,
    /// None when no search text was given
    pub relevance: Option<MatchRelevance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSearchOutput {
    pub count: usize,
    pub matches: Vec<LogMatch>,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Parse a `YYYY-MM-DD` day.
pub fn parse_day(raw: &str) -> LabPricingResult<NaiveDate> {
    Ok(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")?)
}

fn split_terms(search: &str) -> Vec<String> {
    search
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn score(
    entry: &LogEntry,
    terms: &[String],
    names: &HashMap<&str, &str>,
) -> (usize, Option<MatchRelevance>) {
    let text: Vec<String> = entry
        .panel_tests
        .iter()
        .map(|id| id.to_lowercase())
        .chain(entry.panel_tests.iter().map(|id| {
            names
                .get(id.as_str())
                .map(|n| n.to_lowercase())
                .unwrap_or_else(|| id.to_lowercase())
        }))
        .collect();

    let match_count = terms
        .iter()
        .filter(|term| text.iter().any(|t| t.contains(term.as_str())))
        .count();

    let all_matched = match_count == terms.len();
    let relevance = if all_matched && entry.panel_tests.len() == terms.len() {
        Some(MatchRelevance::Exact)
    } else if all_matched && entry.panel_tests.len() > terms.len() {
        Some(MatchRelevance::Superset)
    } else if match_count > 0 {
        Some(MatchRelevance::Partial)
    } else {
        None
    };

    (match_count, relevance)
}

/// Filter and rank log entries.
///
/// Source and day range filters apply first. With search text, entries
/// matching no term are dropped and the rest are ranked by relevance, then
/// newest first. Without search text, entries are newest first.
///
/// `tests` supplies display names for the text search; ids without a known
/// test are matched on the id alone.
pub fn search_logs(logs: &[LogEntry], tests: &[LabTest], query: &LogQuery) -> Vec<LogMatch> {
    let filtered = logs.iter().filter(|l| {
        query.source.map_or(true, |s| l.source == s)
            && query.date_from.map_or(true, |from| l.timestamp.date_naive() >= from)
            && query.date_to.map_or(true, |to| l.timestamp.date_naive() <= to)
    });

    let terms = query.search.as_deref().map(split_terms).unwrap_or_default();

    let mut matches: Vec<LogMatch> = if terms.is_empty() {
        filtered
            .map(|l| LogMatch {
                entry: l.clone(),
                match_count: 0,
                relevance: None,
            })
            .collect()
    } else {
        let names: HashMap<&str, &str> = tests
            .iter()
            .map(|t| (t.id.as_str(), t.name.as_str()))
            .collect();
        filtered
            .filter_map(|l| {
                let (match_count, relevance) = score(l, &terms, &names);
                relevance.map(|r| LogMatch {
                    entry: l.clone(),
                    match_count,
                    relevance: Some(r),
                })
            })
            .collect()
    };

    matches.sort_by(|a, b| {
        b.relevance
            .cmp(&a.relevance)
            .then_with(|| b.entry.timestamp.cmp(&a.entry.timestamp))
    });

    debug!(terms = terms.len(), matches = matches.len(), "searched audit log");
    matches
}

/// Search one org's audit trail and wrap the matches in the standard output
/// envelope.
pub fn search_audit_log(
    catalog: &Catalog,
    org_id: &str,
    query: &LogQuery,
) -> LabPricingResult<ComputationOutput<LogSearchOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let (Some(from), Some(to)) = (query.date_from, query.date_to) {
        if from > to {
            warnings.push(format!(
                "date_from {} is after date_to {}; no entries can match",
                from, to
            ));
        }
    }

    if catalog.org_by_id(org_id).is_none() {
        warnings.push(format!("Organization {} is not in the catalog", org_id));
    }

    let org_logs: Vec<LogEntry> = catalog.logs_for_org(org_id).into_iter().cloned().collect();
    let matches = search_logs(&org_logs, &catalog.tests, query);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Audit log filter by source and day range, ranked by panel composition match",
        &serde_json::json!({
            "org_id": org_id,
            "query": query,
            "entries_scanned": org_logs.len(),
        }),
        warnings,
        elapsed,
        LogSearchOutput {
            count: matches.len(),
            matches,
        },
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabPricingError;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn entry(id: &str, day: u32, hour: u32, tests: &[&str], source: LogSource) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 2, day, hour, 0, 0).unwrap(),
            panel_tests: tests.iter().map(|s| s.to_string()).collect(),
            final_price: dec!(100),
            source,
            org_id: "org-1".to_string(),
        }
    }

    fn lab_test(id: &str, name: &str) -> LabTest {
        LabTest {
            id: id.to_string(),
            name: name.to_string(),
            reagent_cost: dec!(1),
            list_price: dec!(10),
            category: String::new(),
            org_id: "org-1".to_string(),
        }
    }

    fn ids(matches: &[LogMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.entry.id.as_str()).collect()
    }

    #[test]
    fn test_no_query_sorts_newest_first() {
        let logs = vec![
            entry("a", 20, 8, &["T-001"], LogSource::Calculator),
            entry("b", 25, 8, &["T-002"], LogSource::Api),
            entry("c", 22, 8, &["T-003"], LogSource::Calculator),
        ];
        let result = search_logs(&logs, &[], &LogQuery::default());
        assert_eq!(ids(&result), vec!["b", "c", "a"]);
        assert!(result.iter().all(|m| m.relevance.is_none()));
    }

    #[test]
    fn test_source_filter() {
        let logs = vec![
            entry("a", 20, 8, &["T-001"], LogSource::Calculator),
            entry("b", 25, 8, &["T-002"], LogSource::Api),
        ];
        let query = LogQuery {
            source: Some(LogSource::Api),
            ..LogQuery::default()
        };
        assert_eq!(ids(&search_logs(&logs, &[], &query)), vec!["b"]);
    }

    #[test]
    fn test_date_range_is_inclusive_of_whole_days() {
        let logs = vec![
            entry("a", 20, 0, &["T-001"], LogSource::Calculator),
            entry("b", 22, 23, &["T-002"], LogSource::Calculator),
            entry("c", 23, 0, &["T-003"], LogSource::Calculator),
        ];
        let query = LogQuery {
            date_from: Some(NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()),
            date_to: Some(NaiveDate::from_ymd_opt(2026, 2, 22).unwrap()),
            ..LogQuery::default()
        };
        assert_eq!(ids(&search_logs(&logs, &[], &query)), vec!["b", "a"]);
    }

    #[test]
    fn test_relevance_ranking() {
        let logs = vec![
            entry("exact", 20, 8, &["T-001", "T-002"], LogSource::Calculator),
            entry("superset", 25, 8, &["T-001", "T-002", "T-004"], LogSource::Api),
            entry("partial", 24, 8, &["T-001"], LogSource::Calculator),
            entry("miss", 26, 8, &["T-016"], LogSource::Calculator),
        ];
        let query = LogQuery {
            search: Some("t-001, t-002".to_string()),
            ..LogQuery::default()
        };
        let result = search_logs(&logs, &[], &query);
        assert_eq!(ids(&result), vec!["exact", "superset", "partial"]);
        assert_eq!(result[0].relevance, Some(MatchRelevance::Exact));
        assert_eq!(result[1].relevance, Some(MatchRelevance::Superset));
        assert_eq!(result[2].relevance, Some(MatchRelevance::Partial));
        assert_eq!(result[2].match_count, 1);
    }

    #[test]
    fn test_search_matches_test_names() {
        let logs = vec![entry("a", 20, 8, &["T-004"], LogSource::Calculator)];
        let tests = vec![lab_test("T-004", "Lipid Panel")];
        let query = LogQuery {
            search: Some("LIPID".to_string()),
            ..LogQuery::default()
        };
        let result = search_logs(&logs, &tests, &query);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].relevance, Some(MatchRelevance::Exact));
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(
            parse_day("2026-02-20").unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
        );
        assert!(matches!(parse_day("20/02/2026"), Err(LabPricingError::DateError(_))));
    }

    #[test]
    fn test_inverted_range_matches_nothing_and_warns() {
        let catalog = Catalog {
            logs: vec![
                entry("a", 20, 8, &["T-001"], LogSource::Calculator),
                entry("b", 22, 8, &["T-002"], LogSource::Calculator),
            ],
            ..Catalog::default()
        };
        let query = LogQuery {
            date_from: Some(NaiveDate::from_ymd_opt(2026, 2, 22).unwrap()),
            date_to: Some(NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()),
            ..LogQuery::default()
        };
        let output = search_audit_log(&catalog, "org-1", &query).unwrap();
        assert_eq!(output.result.count, 0);
        assert!(output.result.matches.is_empty());
        assert!(output.warnings.iter().any(|w| w.contains("after date_to")));
    }
}
