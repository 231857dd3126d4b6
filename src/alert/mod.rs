//! Budget alerts: at most one per user, category and month, raised when
//! spending crosses 80% or 100% of the category's monthly limit.

mod db;
mod domain;
mod endpoints;
mod engine;

pub use db::{create_alert_table, delete_category_alerts};
pub use domain::{Alert, AlertLevel, AlertOutcome};
pub use endpoints::{check_alerts_endpoint, get_alerts_endpoint};
pub use engine::{reconcile, reconcile_within};
