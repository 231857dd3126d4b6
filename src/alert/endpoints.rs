//! Budget alert route handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::{Alert, AlertOutcome, db::get_alerts_for_month, reconcile},
    category::CategoryId,
    database_id::UserId,
    month::MonthQuery,
};

/// The state needed for the alert endpoints.
#[derive(Debug, Clone)]
pub struct AlertState {
    /// The database connection shared by every request.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The canonical timezone used to work out the current month.
    pub local_timezone: String,
}

impl FromRef<AppState> for AlertState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Reconcile the alert of a category for `?month=YYYY-MM` (default: this month).
pub async fn check_alerts_endpoint(
    Path((user_id, category_id)): Path<(UserId, CategoryId)>,
    Query(query): Query<MonthQuery>,
    State(state): State<AlertState>,
) -> Result<Json<AlertOutcome>, Error> {
    // Reject a malformed month before touching the database.
    let month = query.resolve(&state.local_timezone)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    reconcile(user_id, category_id, month, &connection).map(Json)
}

/// List the user's alerts for `?month=YYYY-MM` (default: this month).
pub async fn get_alerts_endpoint(
    Path(user_id): Path<UserId>,
    Query(query): Query<MonthQuery>,
    State(state): State<AlertState>,
) -> Result<Json<Vec<Alert>>, Error> {
    let month = query.resolve(&state.local_timezone)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_alerts_for_month(user_id, month, &connection).map(Json)
}

#[cfg(test)]
mod alert_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Router,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;
    use time::macros::date;

    use crate::{
        alert::{Alert, AlertLevel, AlertOutcome},
        budget::set_budget,
        category::{CategoryName, CategoryType, create_category},
        db::initialize,
        endpoints::{self, format_endpoint},
        transaction::{NewTransaction, create_transaction},
    };

    use super::{AlertState, check_alerts_endpoint, get_alerts_endpoint};

    /// Creates a server whose user 1 has spent 900 of a 1000 Food budget in October 2025.
    fn get_test_server() -> (TestServer, i64) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let food = create_category(
            1,
            CategoryName::new_unchecked("Food"),
            CategoryType::Expense,
            &connection,
        )
        .unwrap();
        set_budget(1, food.id, 1000.0, &connection).unwrap();
        create_transaction(
            NewTransaction {
                user_id: 1,
                category_id: food.id,
                amount: 900.0,
                date: date!(2025 - 10 - 02),
                description: "groceries".to_owned(),
            },
            &connection,
        )
        .unwrap();

        let state = AlertState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let app = Router::new()
            .route(endpoints::CHECK_ALERTS, post(check_alerts_endpoint))
            .route(endpoints::ALERTS, get(get_alerts_endpoint))
            .with_state(state);

        (
            TestServer::new(app).expect("Could not create test server."),
            food.id,
        )
    }

    #[tokio::test]
    async fn check_then_list_alerts() {
        let (server, category_id) = get_test_server();

        let response = server
            .post(&format_endpoint(endpoints::CHECK_ALERTS, &[1, category_id]))
            .add_query_param("month", "2025-10")
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({"status": "alert_triggered", "level": "warning"}));

        let alerts: Vec<Alert> = server
            .get(&format_endpoint(endpoints::ALERTS, &[1]))
            .add_query_param("month", "2025-10")
            .await
            .json();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Warning);
        assert_eq!(alerts[0].year, 2025);
        assert_eq!(alerts[0].month, 10);
    }

    #[tokio::test]
    async fn check_other_month_is_within_limit() {
        let (server, category_id) = get_test_server();

        let outcome: AlertOutcome = server
            .post(&format_endpoint(endpoints::CHECK_ALERTS, &[1, category_id]))
            .add_query_param("month", "2025-09")
            .await
            .json();

        assert_eq!(outcome, AlertOutcome::WithinLimit);
    }

    #[tokio::test]
    async fn malformed_month_is_bad_request() {
        let (server, category_id) = get_test_server();

        server
            .post(&format_endpoint(endpoints::CHECK_ALERTS, &[1, category_id]))
            .add_query_param("month", "October")
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn missing_category_is_not_found() {
        let (server, _) = get_test_server();

        server
            .post(&format_endpoint(endpoints::CHECK_ALERTS, &[1, 999]))
            .add_query_param("month", "2025-10")
            .await
            .assert_status_not_found();
    }
}
