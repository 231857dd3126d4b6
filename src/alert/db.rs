//! Database queries for budget alerts.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    alert::{Alert, AlertLevel},
    category::CategoryId,
    database_id::UserId,
    month::YearMonth,
};

/// Insert the alert for a user, category and month, or update the level and
/// message of the existing one.
pub fn upsert_alert(
    user_id: UserId,
    category_id: CategoryId,
    month: YearMonth,
    level: AlertLevel,
    connection: &Connection,
) -> Result<Alert, Error> {
    connection
        .prepare(
            "INSERT INTO alert (user_id, category_id, year, month, level, message)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id, category_id, year, month)
             DO UPDATE SET level = excluded.level, message = excluded.message
             RETURNING id, user_id, category_id, year, month, level, message",
        )?
        .query_row(
            (
                user_id,
                category_id,
                month.year(),
                month.month(),
                level,
                level.message(),
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Get the alert for a user, category and month, if there is one.
pub fn get_alert(
    user_id: UserId,
    category_id: CategoryId,
    month: YearMonth,
    connection: &Connection,
) -> Result<Option<Alert>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, year, month, level, message FROM alert
             WHERE user_id = ?1 AND category_id = ?2 AND year = ?3 AND month = ?4",
        )?
        .query_row(
            (user_id, category_id, month.year(), month.month()),
            map_row,
        )
        .optional()
        .map_err(|error| error.into())
}

/// Delete the alerts for a user, category and month.
///
/// Returns the number of rows deleted, which is zero when there was no alert.
pub fn delete_alerts(
    user_id: UserId,
    category_id: CategoryId,
    month: YearMonth,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM alert
             WHERE user_id = ?1 AND category_id = ?2 AND year = ?3 AND month = ?4",
            (user_id, category_id, month.year(), month.month()),
        )
        .map_err(|error| error.into())
}

/// Delete every alert of a user's category, whatever the month.
///
/// Returns the number of rows deleted.
pub fn delete_category_alerts(
    user_id: UserId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM alert WHERE user_id = ?1 AND category_id = ?2",
            (user_id, category_id),
        )
        .map_err(|error| error.into())
}

/// Get all of the user's alerts for `month`, most severe first.
pub fn get_alerts_for_month(
    user_id: UserId,
    month: YearMonth,
    connection: &Connection,
) -> Result<Vec<Alert>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, year, month, level, message FROM alert
             WHERE user_id = ?1 AND year = ?2 AND month = ?3
             ORDER BY CASE level WHEN 'danger' THEN 0 ELSE 1 END, category_id ASC",
        )?
        .query_map((user_id, month.year(), month.month()), map_row)?
        .map(|maybe_alert| maybe_alert.map_err(|error| error.into()))
        .collect()
}

/// Initialize the alert table.
///
/// There is at most one alert per user, category and month.
pub fn create_alert_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS alert (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            level TEXT NOT NULL CHECK (level IN ('warning', 'danger')),
            message TEXT NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE,
            UNIQUE(user_id, category_id, year, month)
        );

        CREATE INDEX IF NOT EXISTS idx_alert_user_month ON alert(user_id, year, month);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Alert, rusqlite::Error> {
    Ok(Alert {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        year: row.get(3)?,
        month: row.get(4)?,
        level: row.get(5)?,
        message: row.get(6)?,
    })
}

#[cfg(test)]
mod alert_query_tests {
    use rusqlite::Connection;

    use crate::{
        alert::{
            AlertLevel,
            db::{
                delete_alerts, delete_category_alerts, get_alert, get_alerts_for_month,
                upsert_alert,
            },
        },
        category::{Category, CategoryName, CategoryType, create_category},
        db::initialize,
        month::YearMonth,
    };

    fn get_test_connection_and_categories() -> (Connection, Category, Category) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        let food = create_category(
            1,
            CategoryName::new_unchecked("Food"),
            CategoryType::Expense,
            &connection,
        )
        .unwrap();
        let rent = create_category(
            1,
            CategoryName::new_unchecked("Rent"),
            CategoryType::Expense,
            &connection,
        )
        .unwrap();

        (connection, food, rent)
    }

    #[test]
    fn upsert_updates_existing_row() {
        let (connection, food, _) = get_test_connection_and_categories();
        let month = YearMonth::new(2025, 10).unwrap();

        let first = upsert_alert(1, food.id, month, AlertLevel::Warning, &connection).unwrap();
        let second = upsert_alert(1, food.id, month, AlertLevel::Danger, &connection).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.level, AlertLevel::Danger);
        assert_eq!(second.message, AlertLevel::Danger.message());
        assert_eq!(get_alert(1, food.id, month, &connection), Ok(Some(second)));
    }

    #[test]
    fn alerts_are_keyed_by_month() {
        let (connection, food, _) = get_test_connection_and_categories();
        let october = YearMonth::new(2025, 10).unwrap();
        let november = YearMonth::new(2025, 11).unwrap();

        upsert_alert(1, food.id, october, AlertLevel::Warning, &connection).unwrap();

        assert_eq!(get_alert(1, food.id, november, &connection), Ok(None));
        assert_eq!(delete_alerts(1, food.id, november, &connection), Ok(0));
        assert_eq!(delete_alerts(1, food.id, october, &connection), Ok(1));
    }

    #[test]
    fn delete_category_alerts_clears_every_month() {
        let (connection, food, rent) = get_test_connection_and_categories();
        let september = YearMonth::new(2025, 9).unwrap();
        let october = YearMonth::new(2025, 10).unwrap();
        upsert_alert(1, food.id, september, AlertLevel::Danger, &connection).unwrap();
        upsert_alert(1, food.id, october, AlertLevel::Warning, &connection).unwrap();
        upsert_alert(1, rent.id, october, AlertLevel::Warning, &connection).unwrap();

        assert_eq!(delete_category_alerts(1, food.id, &connection), Ok(2));

        assert_eq!(get_alert(1, food.id, september, &connection), Ok(None));
        assert_eq!(get_alert(1, food.id, october, &connection), Ok(None));
        assert!(get_alert(1, rent.id, october, &connection).unwrap().is_some());
    }

    #[test]
    fn list_puts_danger_first() {
        let (connection, food, rent) = get_test_connection_and_categories();
        let month = YearMonth::new(2025, 10).unwrap();
        upsert_alert(1, food.id, month, AlertLevel::Warning, &connection).unwrap();
        upsert_alert(1, rent.id, month, AlertLevel::Danger, &connection).unwrap();

        let alerts = get_alerts_for_month(1, month, &connection).unwrap();

        let levels: Vec<_> = alerts.iter().map(|alert| alert.level).collect();
        assert_eq!(levels, vec![AlertLevel::Danger, AlertLevel::Warning]);
    }

    #[test]
    fn deleting_category_deletes_its_alerts() {
        let (connection, food, _) = get_test_connection_and_categories();
        let month = YearMonth::new(2025, 10).unwrap();
        upsert_alert(1, food.id, month, AlertLevel::Warning, &connection).unwrap();

        connection
            .execute("DELETE FROM category WHERE id = ?1", [food.id])
            .unwrap();

        assert_eq!(get_alerts_for_month(1, month, &connection), Ok(vec![]));
    }
}
