//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// Identifies the user who owns categories, budgets, transactions and alerts.
///
/// Users are authenticated outside of this crate, so the ID is taken as given.
pub type UserId = i64;
