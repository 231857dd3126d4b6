//! Category route handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        Category, CategoryId, CategoryName, CategoryType,
        db::{create_category, delete_category, get_all_categories, seed_default_categories},
        domain::CategoryFormData,
    },
    database_id::UserId,
};

/// The state needed for the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection shared by every request.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the user's categories.
pub async fn get_categories_endpoint(
    Path(user_id): Path<UserId>,
    State(state): State<CategoryState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_all_categories(user_id, &connection).map(Json)
}

/// Create a category from a JSON body `{"name": ..., "type": "income" | "expense"}`.
pub async fn create_category_endpoint(
    Path(user_id): Path<UserId>,
    State(state): State<CategoryState>,
    Json(form): Json<CategoryFormData>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let name = CategoryName::new(&form.name)?;
    let kind: CategoryType = form.kind.parse()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let category = create_category(user_id, name, kind, &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Delete one of the user's categories.
pub async fn delete_category_endpoint(
    Path((user_id, category_id)): Path<(UserId, CategoryId)>,
    State(state): State<CategoryState>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    delete_category(user_id, category_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Give the user the default categories if they have none, then list their categories.
pub async fn seed_default_categories_endpoint(
    Path(user_id): Path<UserId>,
    State(state): State<CategoryState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    seed_default_categories(user_id, &connection)?;

    get_all_categories(user_id, &connection).map(Json)
}

#[cfg(test)]
mod category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Router,
        routing::{delete, get, post},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        category::{Category, CategoryType},
        db::initialize,
        endpoints,
    };

    use super::{
        CategoryState, create_category_endpoint, delete_category_endpoint,
        get_categories_endpoint, seed_default_categories_endpoint,
    };

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        let state = CategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let app = Router::new()
            .route(
                endpoints::CATEGORIES,
                get(get_categories_endpoint).post(create_category_endpoint),
            )
            .route(endpoints::CATEGORY, delete(delete_category_endpoint))
            .route(
                endpoints::DEFAULT_CATEGORIES,
                post(seed_default_categories_endpoint),
            )
            .with_state(state);

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn create_then_list_categories() {
        let server = get_test_server();

        let response = server
            .post("/api/users/1/categories")
            .json(&json!({"name": "Food", "type": "expense"}))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let created: Category = response.json();

        let categories: Vec<Category> = server.get("/api/users/1/categories").await.json();

        assert_eq!(categories, vec![created]);
    }

    #[tokio::test]
    async fn create_category_rejects_invalid_type() {
        let server = get_test_server();

        server
            .post("/api/users/1/categories")
            .json(&json!({"name": "Savings", "type": "savings"}))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn create_category_rejects_empty_name() {
        let server = get_test_server();

        server
            .post("/api/users/1/categories")
            .json(&json!({"name": "  ", "type": "expense"}))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn delete_missing_category_returns_not_found() {
        let server = get_test_server();

        server
            .delete("/api/users/1/categories/42")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn seeding_creates_income_and_expense_categories() {
        let server = get_test_server();

        let categories: Vec<Category> = server.post("/api/users/7/categories/defaults").await.json();

        assert_eq!(categories.len(), 17);
        assert!(categories.iter().all(|category| category.user_id == 7));
        assert!(
            categories
                .iter()
                .any(|category| category.kind == CategoryType::Income)
        );
    }
}
