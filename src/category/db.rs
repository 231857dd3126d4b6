//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName, CategoryType},
    database_id::UserId,
};

/// The categories every new user starts with.
const DEFAULT_CATEGORIES: [(&str, CategoryType); 17] = [
    ("Food", CategoryType::Expense),
    ("Groceries", CategoryType::Expense),
    ("Transport", CategoryType::Expense),
    ("Rent", CategoryType::Expense),
    ("Bills", CategoryType::Expense),
    ("Entertainment", CategoryType::Expense),
    ("Healthcare", CategoryType::Expense),
    ("Education", CategoryType::Expense),
    ("Shopping", CategoryType::Expense),
    ("Travel", CategoryType::Expense),
    ("Other", CategoryType::Expense),
    ("Salary", CategoryType::Income),
    ("Freelance", CategoryType::Income),
    ("Business", CategoryType::Income),
    ("Interest", CategoryType::Income),
    ("Gift", CategoryType::Income),
    ("Other", CategoryType::Income),
];

/// Create a category for `user_id` and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategory] if the user already has a category with the same name and type,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    user_id: UserId,
    name: CategoryName,
    kind: CategoryType,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (user_id, name, type) VALUES (?1, ?2, ?3)
             RETURNING id, user_id, name, type",
        )?
        .query_row((user_id, name.as_ref(), kind), map_row)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategory(name.to_string()),
            error => error.into(),
        })
}

/// Retrieve one of the user's categories by ID.
///
/// # Errors
/// Returns [Error::NotFound] if the category does not exist or belongs to another user.
pub fn get_category(
    user_id: UserId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, user_id, name, type FROM category WHERE id = ?1 AND user_id = ?2")?
        .query_row((category_id, user_id), map_row)
        .map_err(|error| error.into())
}

/// Retrieve all of the user's categories, expenses first, then by name.
pub fn get_all_categories(user_id: UserId, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type FROM category WHERE user_id = ?1
             ORDER BY type ASC, name ASC",
        )?
        .query_map([user_id], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Find the user's category whose name equals `name`, ignoring ASCII case.
///
/// If both an expense and an income category share the name, the expense is
/// returned.
pub fn find_category_by_name(
    user_id: UserId,
    name: &str,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type FROM category
             WHERE user_id = ?1 AND name = ?2 COLLATE NOCASE
             ORDER BY type ASC, id ASC
             LIMIT 1",
        )?
        .query_row((user_id, name), map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Find the user's income category that general income should be filed under.
///
/// Prefers a category named "Income", then "Salary", then the oldest income category.
pub fn find_income_category(
    user_id: UserId,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type FROM category
             WHERE user_id = ?1 AND type = 'income'
             ORDER BY CASE
                 WHEN name = 'Income' COLLATE NOCASE THEN 0
                 WHEN name = 'Salary' COLLATE NOCASE THEN 1
                 ELSE 2
             END, id ASC
             LIMIT 1",
        )?
        .query_row([user_id], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Delete one of the user's categories along with its budget, transactions and alerts.
///
/// # Errors
/// Returns [Error::DeleteMissingCategory] if the category does not exist for the user.
pub fn delete_category(
    user_id: UserId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Give `user_id` the default set of categories if they have none.
///
/// Returns the number of categories created.
pub fn seed_default_categories(user_id: UserId, connection: &Connection) -> Result<usize, Error> {
    let existing: i64 = connection.query_row(
        "SELECT COUNT(id) FROM category WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;

    if existing > 0 {
        tracing::debug!("User {user_id} already has {existing} categories, skipping seeding.");
        return Ok(0);
    }

    let mut statement =
        connection.prepare("INSERT INTO category (user_id, name, type) VALUES (?1, ?2, ?3)")?;

    for (name, kind) in DEFAULT_CATEGORIES {
        statement.execute((user_id, name, kind))?;
    }

    tracing::info!(
        "Seeded {} default categories for user {user_id}",
        DEFAULT_CATEGORIES.len()
    );

    Ok(DEFAULT_CATEGORIES.len())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            UNIQUE(user_id, name, type)
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = row.get(1)?;
    let raw_name: String = row.get(2)?;
    let kind = row.get(3)?;

    Ok(Category {
        id,
        user_id,
        name: CategoryName::new_unchecked(&raw_name),
        kind,
    })
}
