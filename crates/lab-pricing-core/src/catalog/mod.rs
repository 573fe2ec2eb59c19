pub mod model;
pub mod quote;
pub mod store;

pub use model::{DirectorySummary, LogEntry, LogSource, Organization, Panel, Role, User};
pub use store::Catalog;
