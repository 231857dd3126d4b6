//! Budget model and database queries.

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::{CategoryId, get_category},
    database_id::{DatabaseId, UserId},
    month::YearMonth,
    transaction::get_monthly_spend,
};

/// A monthly spending limit for one of a user's categories.
///
/// There is at most one budget per user and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: DatabaseId,
    /// The user the budget belongs to.
    pub user_id: UserId,
    /// The category the limit applies to.
    pub category_id: CategoryId,
    /// The most that should be spent in the category each month.
    pub monthly_limit: f64,
}

/// How much of a budget has been spent in a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUsage {
    /// The total amount of the category's transactions in the month.
    pub used: f64,
    /// The budget's monthly limit, zero when there is no budget.
    pub limit: f64,
    /// `used` as a percentage of `limit`, rounded to two decimal places.
    pub percentage: f64,
}

/// Express `spend` as a percentage of `monthly_limit`, rounded to two decimal places.
///
/// A zero limit yields zero rather than dividing by zero.
pub fn spend_percentage(spend: f64, monthly_limit: f64) -> f64 {
    if monthly_limit == 0.0 {
        return 0.0;
    }

    (spend / monthly_limit * 100.0 * 100.0).round() / 100.0
}

/// Set the monthly limit for one of the user's categories, replacing any existing limit.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidBudgetLimit] if `monthly_limit` is negative or not finite,
/// - [Error::NotFound] if the category does not exist for the user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn set_budget(
    user_id: UserId,
    category_id: CategoryId,
    monthly_limit: f64,
    connection: &Connection,
) -> Result<Budget, Error> {
    if !monthly_limit.is_finite() || monthly_limit < 0.0 {
        return Err(Error::InvalidBudgetLimit(monthly_limit));
    }

    get_category(user_id, category_id, connection)?;

    connection
        .prepare(
            "INSERT INTO budget (user_id, category_id, monthly_limit) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, category_id) DO UPDATE SET monthly_limit = excluded.monthly_limit
             RETURNING id, user_id, category_id, monthly_limit",
        )?
        .query_row((user_id, category_id, monthly_limit), map_row)
        .map_err(|error| error.into())
}

/// Retrieve the budget for one of the user's categories, if there is one.
pub fn get_budget(
    user_id: UserId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Option<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, monthly_limit FROM budget
             WHERE user_id = ?1 AND category_id = ?2",
        )?
        .query_row((user_id, category_id), map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Remove the budget for one of the user's categories.
///
/// # Errors
/// Returns [Error::DeleteMissingBudget] if the category has no budget.
pub fn delete_budget(
    user_id: UserId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE user_id = ?1 AND category_id = ?2",
        (user_id, category_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// Get how much of the category's budget was spent in `month`.
///
/// Without a budget, all fields are zero.
pub fn get_budget_usage(
    user_id: UserId,
    category_id: CategoryId,
    month: YearMonth,
    connection: &Connection,
) -> Result<BudgetUsage, Error> {
    let Some(budget) = get_budget(user_id, category_id, connection)? else {
        return Ok(BudgetUsage {
            used: 0.0,
            limit: 0.0,
            percentage: 0.0,
        });
    };

    let used = get_monthly_spend(user_id, category_id, month, connection)?;

    Ok(BudgetUsage {
        used,
        limit: budget.monthly_limit,
        percentage: spend_percentage(used, budget.monthly_limit),
    })
}

/// Initialize the budget table.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            monthly_limit REAL NOT NULL CHECK (monthly_limit >= 0),
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE,
            UNIQUE(user_id, category_id)
        );",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        monthly_limit: row.get(3)?,
    })
}
