//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::{
    AppState, Error,
    alert::{check_alerts_endpoint, get_alerts_endpoint},
    budget::{delete_budget_endpoint, get_budget_usage_endpoint, set_budget_endpoint},
    categorizer::categorize_endpoint,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        seed_default_categories_endpoint,
    },
    endpoints,
    logging::logging_middleware,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, update_transaction_category_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::CATEGORIZE, post(categorize_endpoint))
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::DEFAULT_CATEGORIES,
            post(seed_default_categories_endpoint),
        )
        .route(endpoints::CATEGORY, delete(delete_category_endpoint))
        .route(endpoints::BUDGETS, put(set_budget_endpoint))
        .route(endpoints::BUDGET, delete(delete_budget_endpoint))
        .route(endpoints::BUDGET_USAGE, get(get_budget_usage_endpoint))
        .route(endpoints::CHECK_ALERTS, post(check_alerts_endpoint))
        .route(endpoints::ALERTS, get(get_alerts_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_CATEGORY,
            put(update_transaction_category_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

#[cfg(test)]
mod router_tests {
    use axum::http::{StatusCode, header::LOCATION};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState,
        alert::{AlertLevel, AlertOutcome},
        budget::BudgetUsage,
        categorizer::{Categorizer, TrainedClassifier},
        category::Category,
        endpoints::{self, format_endpoint},
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        let classifier = TrainedClassifier::train_default().expect("Could not train classifier");
        let state = AppState::new(
            Connection::open_in_memory().expect("Could not open in-memory SQLite database"),
            Categorizer::new(classifier),
            "Etc/UTC",
        )
        .expect("Could not create app state");

        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server();

        let response = server.get("/api/nope").expect_failure().await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn categorize_route_is_wired() {
        let server = get_test_server();

        let response = server
            .post(endpoints::CATEGORIZE)
            .json(&json!({"text": "Swiggy order for dinner"}))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"category": "Food", "source": "rule", "confidence": 1.0}));
    }

    #[tokio::test]
    async fn budget_flow_raises_and_clears_alerts() {
        let server = get_test_server();
        let categories: Vec<Category> = server
            .post(&format_endpoint(endpoints::DEFAULT_CATEGORIES, &[1]))
            .await
            .json();
        let food = categories
            .iter()
            .find(|category| category.name.as_ref() == "Food")
            .expect("Expected a Food category");

        server
            .put(&format_endpoint(endpoints::BUDGETS, &[1]))
            .json(&json!({"category_id": food.id, "monthly_limit": 1000.0}))
            .await
            .assert_status_ok();

        let response = server
            .post(&format_endpoint(endpoints::TRANSACTIONS, &[1]))
            .json(&json!({"amount": 1200.0, "date": "2025-10-05", "description": "Zomato party order"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        assert_eq!(created["transaction"]["category_id"], json!(food.id));
        let location = response.header(LOCATION);
        let fetched: Value = server.get(location.to_str().unwrap()).await.json();
        assert_eq!(fetched, created["transaction"]);
        assert_eq!(
            serde_json::from_value::<AlertOutcome>(created["alert"].clone()).unwrap(),
            AlertOutcome::AlertTriggered {
                level: AlertLevel::Danger
            }
        );

        let usage: BudgetUsage = server
            .get(&format_endpoint(endpoints::BUDGET_USAGE, &[1, food.id]))
            .add_query_param("month", "2025-10")
            .await
            .json();
        assert_eq!(usage.percentage, 120.0);

        let alerts: Vec<Value> = server
            .get(&format_endpoint(endpoints::ALERTS, &[1]))
            .add_query_param("month", "2025-10")
            .await
            .json();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0]["message"], "Budget exceeded! Please reduce spending.");

        let transaction_id = created["transaction"]["id"]
            .as_i64()
            .expect("Expected a transaction ID");
        let outcome: AlertOutcome = server
            .delete(&format_endpoint(endpoints::TRANSACTION, &[1, transaction_id]))
            .await
            .json();
        assert_eq!(outcome, AlertOutcome::WithinLimit);

        let alerts: Vec<Value> = server
            .get(&format_endpoint(endpoints::ALERTS, &[1]))
            .add_query_param("month", "2025-10")
            .await
            .json();
        assert!(alerts.is_empty());
    }
}
