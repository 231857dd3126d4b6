//! Monthly spending limits per category.

mod db;
mod endpoints;

pub use db::{
    Budget, BudgetUsage, create_budget_table, delete_budget, get_budget, get_budget_usage,
    set_budget, spend_percentage,
};
pub use endpoints::{delete_budget_endpoint, get_budget_usage_endpoint, set_budget_endpoint};
