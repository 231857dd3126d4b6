//! Budget route handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
};
use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    alert::{AlertOutcome, delete_category_alerts, reconcile_within},
    budget::{Budget, BudgetUsage, delete_budget, get_budget_usage, set_budget},
    category::CategoryId,
    database_id::UserId,
    month::{MonthQuery, YearMonth},
};

/// The state needed for the budget endpoints.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The database connection shared by every request.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The canonical timezone used to work out the current month.
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Request body for setting a budget.
#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetFormData {
    /// The category to limit.
    pub category_id: CategoryId,
    /// The most that should be spent in the category each month.
    pub monthly_limit: f64,
}

/// A budget together with the alert state of the current month under the new limit.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetBudgetResponse {
    /// The stored budget.
    pub budget: Budget,
    /// The alert state of the current month.
    pub alert: AlertOutcome,
}

/// Set the monthly limit for a category and reconcile the current month's alert.
pub async fn set_budget_endpoint(
    Path(user_id): Path<UserId>,
    State(state): State<BudgetState>,
    Json(form): Json<BudgetFormData>,
) -> Result<Json<SetBudgetResponse>, Error> {
    let month = YearMonth::current(&state.local_timezone)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transaction = SqlTransaction::new_unchecked(&connection, TransactionBehavior::Immediate)?;
    let budget = set_budget(user_id, form.category_id, form.monthly_limit, &transaction)?;
    let alert = reconcile_within(user_id, form.category_id, month, &transaction)?;
    transaction.commit()?;

    Ok(Json(SetBudgetResponse { budget, alert }))
}

/// Remove a category's budget along with its alerts for every month.
pub async fn delete_budget_endpoint(
    Path((user_id, category_id)): Path<(UserId, CategoryId)>,
    State(state): State<BudgetState>,
) -> Result<Json<AlertOutcome>, Error> {
    let month = YearMonth::current(&state.local_timezone)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transaction = SqlTransaction::new_unchecked(&connection, TransactionBehavior::Immediate)?;
    delete_budget(user_id, category_id, &transaction)?;
    let cleared = delete_category_alerts(user_id, category_id, &transaction)?;
    let outcome = reconcile_within(user_id, category_id, month, &transaction)?;
    transaction.commit()?;

    if cleared > 0 {
        tracing::info!(
            "Removed {cleared} alerts for user {user_id}, category {category_id} with its budget"
        );
    }

    Ok(Json(outcome))
}

/// Get how much of a category's budget was used in `?month=YYYY-MM` (default: this month).
pub async fn get_budget_usage_endpoint(
    Path((user_id, category_id)): Path<(UserId, CategoryId)>,
    Query(query): Query<MonthQuery>,
    State(state): State<BudgetState>,
) -> Result<Json<BudgetUsage>, Error> {
    let month = query.resolve(&state.local_timezone)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_budget_usage(user_id, category_id, month, &connection).map(Json)
}
