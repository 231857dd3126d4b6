//! Route handlers for listing, creating, re-categorizing and deleting transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    alert::{AlertOutcome, reconcile_within},
    categorizer::{Categorizer, CategoryLabel, ClassificationResult},
    category::{Category, CategoryId, find_category_by_name, find_income_category},
    database_id::UserId,
    endpoints::{self, format_endpoint},
    month::YearMonth,
    transaction::{
        NewTransaction, Transaction, TransactionId, create_transaction, delete_transaction,
        get_transaction, get_transactions, update_transaction_category,
    },
};

/// The state needed to manage transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection shared by every request.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Suggests a category for transactions created without one.
    pub categorizer: Arc<Categorizer>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            categorizer: state.categorizer.clone(),
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionFormData {
    /// The value of the transaction.
    pub amount: f64,
    /// The date when the transaction occurred, e.g. "2025-10-05".
    pub date: Date,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: Option<String>,
    /// The category to file the transaction under.
    ///
    /// When omitted the category is suggested from the description.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// A created transaction with the category suggestion (if one was made) and
/// the alert state of its category for the transaction's month.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    /// The stored transaction.
    pub transaction: Transaction,
    /// The suggested category, only present when no category was given.
    pub suggestion: Option<ClassificationResult>,
    /// The alert state of the transaction's category and month.
    pub alert: AlertOutcome,
}

/// The request body for moving a transaction to another category.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryUpdateData {
    /// The category to move the transaction to.
    pub category_id: CategoryId,
}

/// The updated transaction with the alert state of the category it left and
/// the category it joined.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCategoryResponse {
    /// The transaction after the move.
    pub transaction: Transaction,
    /// The alert state of the category the transaction left.
    pub previous_category_alert: AlertOutcome,
    /// The alert state of the category the transaction joined.
    pub alert: AlertOutcome,
}

/// A route handler for listing the user's transactions, newest first.
pub async fn get_transactions_endpoint(
    Path(user_id): Path<UserId>,
    State(state): State<TransactionState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_transactions(user_id, &connection).map(Json)
}

/// A route handler for getting one of the user's transactions.
pub async fn get_transaction_endpoint(
    Path((user_id, transaction_id)): Path<(UserId, TransactionId)>,
    State(state): State<TransactionState>,
) -> Result<Json<Transaction>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_transaction(user_id, transaction_id, &connection).map(Json)
}

/// A route handler for creating a new transaction.
///
/// Responds with 201 Created and a Location header pointing at the new transaction.
pub async fn create_transaction_endpoint(
    Path(user_id): Path<UserId>,
    State(state): State<TransactionState>,
    Json(form): Json<TransactionFormData>,
) -> Result<Response, Error> {
    let description = form.description.unwrap_or_default();

    // Inference does not touch the database, so do it before taking the lock.
    let suggestion = match form.category_id {
        Some(_) => None,
        None => Some(state.categorizer.categorize(&description)),
    };

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let category_id = match (form.category_id, &suggestion) {
        (Some(category_id), _) => category_id,
        (None, Some(suggestion)) => {
            find_category_for_label(user_id, suggestion.category, &connection)?
                .map(|category| category.id)
                .ok_or_else(|| {
                    tracing::debug!("User {user_id} has no category for {}", suggestion.category);
                    Error::InvalidCategory(None)
                })?
        }
        (None, None) => return Err(Error::InvalidCategory(None)),
    };

    let sql_transaction =
        SqlTransaction::new_unchecked(&connection, TransactionBehavior::Immediate)?;
    let transaction = create_transaction(
        NewTransaction {
            user_id,
            category_id,
            amount: form.amount,
            date: form.date,
            description,
        },
        &sql_transaction,
    )?;
    let alert = reconcile_within(
        user_id,
        transaction.category_id,
        YearMonth::containing(transaction.date),
        &sql_transaction,
    )?;
    sql_transaction.commit()?;

    let location = format_endpoint(endpoints::TRANSACTION, &[user_id, transaction.id]);

    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(CreateTransactionResponse {
            transaction,
            suggestion,
            alert,
        }),
    )
        .into_response())
}

/// The user's category for a suggested label.
///
/// Labels match category names ignoring case, except `Income` which maps to the
/// user's general income category (see [find_income_category]).
fn find_category_for_label(
    user_id: UserId,
    label: CategoryLabel,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    match label {
        CategoryLabel::Income => find_income_category(user_id, connection),
        label => find_category_by_name(user_id, label.as_str(), connection),
    }
}

/// A route handler for moving a transaction to another of the user's categories.
pub async fn update_transaction_category_endpoint(
    Path((user_id, transaction_id)): Path<(UserId, TransactionId)>,
    State(state): State<TransactionState>,
    Json(form): Json<CategoryUpdateData>,
) -> Result<Json<UpdateCategoryResponse>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let sql_transaction =
        SqlTransaction::new_unchecked(&connection, TransactionBehavior::Immediate)?;
    let previous =
        update_transaction_category(user_id, transaction_id, form.category_id, &sql_transaction)?;
    let transaction = get_transaction(user_id, transaction_id, &sql_transaction)?;
    let month = YearMonth::containing(transaction.date);

    let previous_category_alert =
        reconcile_within(user_id, previous.category_id, month, &sql_transaction)?;
    let alert = reconcile_within(user_id, transaction.category_id, month, &sql_transaction)?;
    sql_transaction.commit()?;

    Ok(Json(UpdateCategoryResponse {
        transaction,
        previous_category_alert,
        alert,
    }))
}

/// A route handler for deleting a transaction.
///
/// Responds with the alert state of the transaction's category after the deletion.
pub async fn delete_transaction_endpoint(
    Path((user_id, transaction_id)): Path<(UserId, TransactionId)>,
    State(state): State<TransactionState>,
) -> Result<Json<AlertOutcome>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let sql_transaction =
        SqlTransaction::new_unchecked(&connection, TransactionBehavior::Immediate)?;
    let deleted = delete_transaction(user_id, transaction_id, &sql_transaction)?;
    let outcome = reconcile_within(
        user_id,
        deleted.category_id,
        YearMonth::containing(deleted.date),
        &sql_transaction,
    )?;
    sql_transaction.commit()?;

    Ok(Json(outcome))
}
