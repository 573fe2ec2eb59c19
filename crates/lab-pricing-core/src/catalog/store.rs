use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::model::{DirectorySummary, LogEntry, Organization, Panel, Role, User};
use crate::error::LabPricingError;
use crate::types::LabTest;
use crate::LabPricingResult;

/// In-memory catalog of organizations, their users, tests and panels, and
/// the audit trail. Read-only once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tests: Vec<LabTest>,
    #[serde(default)]
    pub panels: Vec<Panel>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

impl Catalog {
    pub fn org_by_id(&self, org_id: &str) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.id == org_id)
    }

    pub fn test_by_id(&self, test_id: &str) -> Option<&LabTest> {
        self.tests.iter().find(|t| t.id == test_id)
    }

    pub fn panel_by_id(&self, panel_id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == panel_id)
    }

    pub fn tests_for_org(&self, org_id: &str) -> Vec<&LabTest> {
        self.tests.iter().filter(|t| t.org_id == org_id).collect()
    }

    pub fn panels_for_org(&self, org_id: &str) -> Vec<&Panel> {
        self.panels.iter().filter(|p| p.org_id == org_id).collect()
    }

    pub fn logs_for_org(&self, org_id: &str) -> Vec<&LogEntry> {
        self.logs.iter().filter(|l| l.org_id == org_id).collect()
    }

    pub fn user_by_id(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Users belonging to an org. Platform-wide users are never included.
    pub fn users_for_org(&self, org_id: &str) -> Vec<&User> {
        self.users
            .iter()
            .filter(|u| u.org_id.as_deref() == Some(org_id))
            .collect()
    }

    /// Organization, user and test totals across the directory.
    pub fn directory_summary(&self) -> DirectorySummary {
        DirectorySummary {
            organizations: self.organizations.len(),
            users: self
                .users
                .iter()
                .filter(|u| u.role != Role::SuperAdmin)
                .count(),
            tests: self.organizations.iter().map(|o| o.tests_count).sum(),
        }
    }

    /// Org tests whose id or name contains `query`, ignoring case. A blank
    /// query returns every org test.
    pub fn search_tests(&self, org_id: &str, query: &str) -> Vec<&LabTest> {
        let q = query.trim().to_lowercase();
        self.tests_for_org(org_id)
            .into_iter()
            .filter(|t| q.is_empty() || contains_ci(&t.id, &q) || contains_ci(&t.name, &q))
            .collect()
    }

    /// Org panels whose name contains `query`, ignoring case.
    pub fn search_panels(&self, org_id: &str, query: &str) -> Vec<&Panel> {
        let q = query.trim().to_lowercase();
        self.panels_for_org(org_id)
            .into_iter()
            .filter(|p| q.is_empty() || contains_ci(&p.name, &q))
            .collect()
    }

    /// Resolve a set of selected test ids against an org's tests.
    ///
    /// Selection is a set: repeated ids collapse and the result follows
    /// catalog order, not the order of `ids`.
    pub fn select_tests<S: AsRef<str>>(
        &self,
        org_id: &str,
        ids: &[S],
    ) -> LabPricingResult<Vec<LabTest>> {
        let wanted: HashSet<&str> = ids.iter().map(|s| s.as_ref()).collect();
        let org_tests = self.tests_for_org(org_id);

        for id in ids {
            let id = id.as_ref();
            if !org_tests.iter().any(|t| t.id == id) {
                return Err(LabPricingError::not_found("Test", id));
            }
        }

        Ok(org_tests
            .into_iter()
            .filter(|t| wanted.contains(t.id.as_str()))
            .cloned()
            .collect())
    }

    /// Tests of a panel's org that the panel contains, in catalog order.
    /// Ids the org does not carry are skipped.
    pub fn panel_tests(&self, panel_id: &str) -> LabPricingResult<Vec<LabTest>> {
        let panel = self
            .panel_by_id(panel_id)
            .ok_or_else(|| LabPricingError::not_found("Panel", panel_id))?;

        Ok(self
            .tests_for_org(&panel.org_id)
            .into_iter()
            .filter(|t| panel.test_ids.iter().any(|id| *id == t.id))
            .cloned()
            .collect())
    }

    /// Next sequential test id for an org, e.g. "T-021".
    pub fn next_test_id(&self, org_id: &str) -> String {
        format!("T-{:03}", self.tests_for_org(org_id).len() + 1)
    }
}
