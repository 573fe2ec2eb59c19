use lab_pricing_core::analytics::AnalyticsInputs;
use lab_pricing_core::audit_log::{search_audit_log, LogQuery, MatchRelevance};
use lab_pricing_core::catalog::quote::{analyze_panel, quote_panel, quote_selection};
use lab_pricing_core::catalog::{Catalog, DirectorySummary, LogSource, Role};
use lab_pricing_core::LabPricingError;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const CATALOG_JSON: &str = r#"{
  "organizations": [
    {"id": "org-1", "name": "LabCorp East", "code": "LCE", "created_at": "2025-09-15",
     "tests_count": 5, "users_count": 8},
    {"id": "org-2", "name": "Metro Diagnostics", "code": "MTD", "created_at": "2025-11-02",
     "tests_count": 15}
  ],
  "users": [
    {"id": "u-1", "name": "Sarah Chen", "email": "sarah@pricengine.com", "role": "super_admin"},
    {"id": "u-2", "name": "Dr. James Rivera", "email": "jrivera@labcorpeast.com", "role": "lab_manager", "org_id": "org-1"},
    {"id": "u-3", "name": "Lab Staff", "email": "staff@labcorpeast.com", "role": "lab_employee", "org_id": "org-1"},
    {"id": "u-4", "name": "Dr. Aisha Patel", "email": "apatel@metrodiag.com", "role": "lab_manager", "org_id": "org-2"}
  ],
  "tests": [
    {"id": "T-001", "name": "Complete Blood Count (CBC)", "reagent_cost": "4.5", "list_price": "45.0", "category": "Hematology", "org_id": "org-1"},
    {"id": "T-002", "name": "Basic Metabolic Panel (BMP)", "reagent_cost": "6.2", "list_price": "65.0", "category": "Chemistry", "org_id": "org-1"},
    {"id": "T-004", "name": "Lipid Panel", "reagent_cost": "5.3", "list_price": "55.0", "category": "Chemistry", "org_id": "org-1"},
    {"id": "T-016", "name": "Troponin I", "reagent_cost": "22.5", "list_price": "220.0", "category": "Cardiac", "org_id": "org-1"},
    {"id": "T-017", "name": "B-Type Natriuretic Peptide (BNP)", "reagent_cost": "25.0", "list_price": "245.0", "category": "Cardiac", "org_id": "org-1"}
  ],
  "panels": [
    {"id": "P-001", "name": "Basic Panel", "test_ids": ["T-001", "T-002", "T-004"], "org_id": "org-1"},
    {"id": "P-002", "name": "Cardiac Panel", "test_ids": ["T-016", "T-017"], "org_id": "org-1"}
  ],
  "logs": [
    {"id": "log-01", "timestamp": "2026-02-25T14:32:00Z", "panel_tests": ["T-001", "T-002", "T-004"], "final_price": "112.85", "source": "calculator", "org_id": "org-1"},
    {"id": "log-02", "timestamp": "2026-02-25T11:15:00Z", "panel_tests": ["T-016", "T-017"], "final_price": "378.50", "source": "api", "org_id": "org-1"},
    {"id": "log-04", "timestamp": "2026-02-24T09:20:00Z", "panel_tests": ["T-001"], "final_price": "45.00", "source": "calculator", "org_id": "org-1"},
    {"id": "log-07", "timestamp": "2026-02-22T13:10:00Z", "panel_tests": ["T-001", "T-002"], "final_price": "87.50", "source": "calculator", "org_id": "org-1"},
    {"id": "log-99", "timestamp": "2026-02-23T10:00:00Z", "panel_tests": ["T-001"], "final_price": "45.00", "source": "api", "org_id": "org-2"}
  ]
}"#;

fn catalog() -> Catalog {
    serde_json::from_str(CATALOG_JSON).unwrap()
}

// ===========================================================================
// Quoting
// ===========================================================================

#[test]
fn test_quote_saved_panel() {
    let output = quote_panel(&catalog(), "P-001").unwrap();
    assert_eq!(output.result.total_price, dec!(129.4));
    assert_eq!(output.result.anchor().unwrap().test.id, "T-002");
}

#[test]
fn test_quote_selection_matches_saved_panel() {
    let c = catalog();
    let by_ids = quote_selection(&c, "org-1", &["T-004", "T-002", "T-001"]).unwrap();
    let by_panel = quote_panel(&c, "P-001").unwrap();
    assert_eq!(by_ids.result, by_panel.result);
}

#[test]
fn test_quote_unknown_test_is_not_found() {
    let err = quote_selection(&catalog(), "org-1", &["T-001", "T-404"]).unwrap_err();
    match err {
        LabPricingError::NotFound { kind, id } => {
            assert_eq!(kind, "Test");
            assert_eq!(id, "T-404");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_analyze_saved_panel() {
    let assumptions = AnalyticsInputs {
        current_daily_overhead: dec!(2500),
        current_panels_per_day: dec!(50),
        future_daily_overhead: dec!(3500),
        future_panels_per_day: dec!(80),
    };
    let output = analyze_panel(&catalog(), "P-002", &assumptions).unwrap();
    // BNP anchor 245 + troponin 110 + 5 = 360; reagents 47.5
    assert_eq!(output.result.pricing.total_price, dec!(360));
    assert_eq!(output.result.analytics.current.total_cost, dec!(97.5));
    assert_eq!(output.result.analytics.current.gross_margin, dec!(262.5));
    assert!(output.result.analytics.future.profitable);
}

// ===========================================================================
// Directory
// ===========================================================================

#[test]
fn test_org_users_and_roles() {
    let c = catalog();
    let users: Vec<(&str, Role)> = c
        .users_for_org("org-1")
        .iter()
        .map(|u| (u.id.as_str(), u.role))
        .collect();
    assert_eq!(users, vec![("u-2", Role::LabManager), ("u-3", Role::LabEmployee)]);
    assert_eq!(c.user_by_id("u-1").unwrap().org_id, None);
}

#[test]
fn test_directory_summary() {
    assert_eq!(
        catalog().directory_summary(),
        DirectorySummary {
            organizations: 2,
            users: 3,
            tests: 20,
        }
    );
}

// ===========================================================================
// Audit log
// ===========================================================================

#[test]
fn test_logs_scoped_to_org_newest_first() {
    let output = search_audit_log(&catalog(), "org-1", &LogQuery::default()).unwrap();
    let ids: Vec<&str> = output
        .result
        .matches
        .iter()
        .map(|m| m.entry.id.as_str())
        .collect();
    assert_eq!(ids, vec!["log-01", "log-02", "log-04", "log-07"]);
    assert_eq!(output.result.count, 4);
}

#[test]
fn test_log_search_by_test_name() {
    let query = LogQuery {
        search: Some("cbc bmp".to_string()),
        source: Some(LogSource::Calculator),
        ..LogQuery::default()
    };
    let output = search_audit_log(&catalog(), "org-1", &query).unwrap();
    let ranked: Vec<(&str, Option<MatchRelevance>)> = output
        .result
        .matches
        .iter()
        .map(|m| (m.entry.id.as_str(), m.relevance))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("log-07", Some(MatchRelevance::Exact)),
            ("log-01", Some(MatchRelevance::Superset)),
            ("log-04", Some(MatchRelevance::Partial)),
        ]
    );
}

#[test]
fn test_log_search_unknown_org_warns() {
    let output = search_audit_log(&catalog(), "org-9", &LogQuery::default()).unwrap();
    assert_eq!(output.result.count, 0);
    assert_eq!(output.warnings.len(), 1);
}
