use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// A lab tenant. Tests, panels and log entries are scoped to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    /// Short code, e.g. "LCE"
    pub code: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub tests_count: u32,
    #[serde(default)]
    pub users_count: u32,
}

/// Access level of a directory user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator, not tied to any organization
    SuperAdmin,
    LabManager,
    LabEmployee,
}

impl Role {
    /// Display name, e.g. "Lab Manager".
    pub fn label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::LabManager => "Lab Manager",
            Role::LabEmployee => "Lab Employee",
        }
    }
}

/// A person in the organization directory. Credentials are not held here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// None for platform-wide users
    #[serde(default)]
    pub org_id: Option<String>,
}

/// Directory-wide totals shown on the admin overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySummary {
    pub organizations: usize,
    /// Users excluding super admins
    pub users: usize,
    /// Sum of each organization's declared test count
    pub tests: u32,
}

/// A named, reusable selection of tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: String,
    pub name: String,
    pub test_ids: Vec<String>,
    pub org_id: String,
}

/// Where a priced panel request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSource {
    Calculator,
    Api,
}

/// One priced panel request in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Test ids making up the priced panel
    pub panel_tests: Vec<String>,
    pub final_price: Money,
    pub source: LogSource,
    pub org_id: String,
}
