//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::{CategoryId, get_category},
    database_id::{DatabaseId, UserId},
    month::YearMonth,
};

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Whether it is income or an expense is decided by the type of its category,
/// the amount itself is a positive money value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user the transaction belongs to.
    pub user_id: UserId,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for, possibly empty.
    pub description: String,
}

/// The fields needed to create a [Transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The user the transaction belongs to.
    pub user_id: UserId,
    /// One of the user's categories.
    pub category_id: CategoryId,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// What the transaction was for, possibly empty.
    pub description: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to one of the user's categories,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    ensure_users_category(
        new_transaction.user_id,
        new_transaction.category_id,
        connection,
    )?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, category_id, amount, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, category_id, amount, date, description",
        )?
        .query_row(
            (
                new_transaction.user_id,
                new_transaction.category_id,
                new_transaction.amount,
                new_transaction.date,
                new_transaction.description,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve one of the user's transactions by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to one of the user's transactions,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    user_id: UserId,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, category_id, amount, date, description FROM \"transaction\"
             WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row((id, user_id), map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve all of the user's transactions, newest first.
///
/// Transactions on the same date are ordered by most recently created first.
pub fn get_transactions(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, amount, date, description FROM \"transaction\"
             WHERE user_id = ?1
             ORDER BY date DESC, id DESC",
        )?
        .query_map([user_id], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Move one of the user's transactions to another of their categories.
///
/// Returns the transaction as it was before the update, so callers can tell
/// which category it left.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if the transaction does not exist for the user,
/// - [Error::InvalidCategory] if the new category is not one of the user's categories,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction_category(
    user_id: UserId,
    id: TransactionId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let previous = match get_transaction(user_id, id, connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction(id)),
        Err(error) => return Err(error),
    };

    ensure_users_category(user_id, category_id, connection)?;

    connection.execute(
        "UPDATE \"transaction\" SET category_id = ?1 WHERE id = ?2 AND user_id = ?3",
        (category_id, id, user_id),
    )?;

    Ok(previous)
}

/// Delete one of the user's transactions and return it.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if the transaction does not exist for the user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    user_id: UserId,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2
             RETURNING id, user_id, category_id, amount, date, description",
        )?
        .query_row((id, user_id), map_transaction_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingTransaction,
            error => error.into(),
        })
}

/// Sum the amounts of the user's transactions in a category during `month`.
///
/// Returns zero when there are no such transactions.
pub fn get_monthly_spend(
    user_id: UserId,
    category_id: CategoryId,
    month: YearMonth,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM \"transaction\"
             WHERE user_id = ?1 AND category_id = ?2
             AND date >= ?3 AND date < date(?3, '+1 month')",
            (user_id, category_id, month.first_day()),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Used by the monthly spend query.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_category_date
         ON \"transaction\"(user_id, category_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        description: row.get(5)?,
    })
}

fn ensure_users_category(
    user_id: UserId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    match get_category(user_id, category_id, connection) {
        Ok(_) => Ok(()),
        Err(Error::NotFound) => Err(Error::InvalidCategory(Some(category_id))),
        Err(error) => Err(error),
    }
}

// ============================================================================
// TESTS
// ============================================================================
