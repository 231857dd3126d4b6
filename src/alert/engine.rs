//! Keeps the stored alert for a category and month in step with spending.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    alert::{
        AlertOutcome,
        db::{delete_alerts, upsert_alert},
        domain::evaluate,
    },
    budget::get_budget,
    category::{CategoryId, CategoryType, get_category},
    database_id::UserId,
    month::YearMonth,
    transaction::get_monthly_spend,
};

/// Bring the alert for `category_id` in `month` up to date and report the outcome.
///
/// The alert is created when spending first crosses 80% of the budget,
/// updated in place while it stays over, and deleted once spending drops under
/// 80%, the budget is removed or the category is an income category.
/// Reconciling twice without any change in between leaves the store as it was.
///
/// The reads and the write happen inside one immediate SQLite transaction.
/// Use [reconcile_within] to reconcile as part of a transaction that is already open.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the category does not exist for the user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn reconcile(
    user_id: UserId,
    category_id: CategoryId,
    month: YearMonth,
    connection: &Connection,
) -> Result<AlertOutcome, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let outcome = reconcile_within(user_id, category_id, month, &transaction)?;

    transaction.commit()?;

    Ok(outcome)
}

/// Like [reconcile], but inside the caller's open SQLite transaction.
///
/// Nothing is committed here, so the alert change lands or rolls back together
/// with whatever else the caller wrote in `transaction`.
pub fn reconcile_within(
    user_id: UserId,
    category_id: CategoryId,
    month: YearMonth,
    transaction: &SqlTransaction,
) -> Result<AlertOutcome, Error> {
    let category = get_category(user_id, category_id, transaction)?;

    let outcome = match category.kind {
        CategoryType::Income => AlertOutcome::IncomeCategory,
        CategoryType::Expense => {
            let monthly_limit =
                get_budget(user_id, category_id, transaction)?.map(|budget| budget.monthly_limit);
            let spend = get_monthly_spend(user_id, category_id, month, transaction)?;

            evaluate(category.kind, monthly_limit, spend)
        }
    };

    match outcome {
        AlertOutcome::AlertTriggered { level } => {
            let alert = upsert_alert(user_id, category_id, month, level, transaction)?;
            tracing::info!(
                "Set {level} alert {} for user {user_id}, category {category_id}, {month}",
                alert.id
            );
        }
        AlertOutcome::NoBudget | AlertOutcome::IncomeCategory | AlertOutcome::WithinLimit => {
            let deleted = delete_alerts(user_id, category_id, month, transaction)?;
            if deleted > 0 {
                tracing::info!(
                    "Removed alert for user {user_id}, category {category_id}, {month}: {outcome:?}"
                );
            }
        }
    }

    Ok(outcome)
}
