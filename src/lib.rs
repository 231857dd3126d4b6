//! FinSmart is a personal finance tracker.
//!
//! This library provides a JSON REST API around two engines:
//! - a transaction categorizer that assigns a spending category to free-text
//!   descriptions using keyword rules with a statistical fallback,
//! - a budget alert engine that keeps one alert per user, category and month
//!   in step with how much of the budget has been spent.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod alert;
mod app_state;
mod budget;
mod categorizer;
mod category;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod month;
mod routing;
mod transaction;

pub use alert::{Alert, AlertLevel, AlertOutcome, reconcile};
pub use app_state::AppState;
pub use categorizer::{
    Categorizer, CategoryLabel, ClassificationResult, ClassificationSource, DEFAULT_CORPUS,
    TrainedClassifier, TrainingSample, load_corpus_csv,
};
pub use category::{CategoryId, CategoryType};
pub use database_id::{DatabaseId, UserId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::YearMonth;
pub use routing::build_router;

use crate::transaction::TransactionId;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The trained classifier could not be loaded or is inconsistent.
    ///
    /// This is a start-up failure: the server must not serve categorization
    /// requests without a classifier.
    #[error("the trained classifier is unavailable: {0}")]
    ClassifierUnavailable(String),

    /// The training corpus is empty or could not be parsed.
    #[error("invalid training corpus: {0}")]
    InvalidCorpus(String),

    /// A month specifier was not a valid `YYYY-MM` string.
    #[error("month must be in YYYY-MM format, got \"{0}\"")]
    InvalidMonth(String),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A category type other than "income" or "expense" was given.
    #[error("category type must be 'income' or 'expense', got \"{0}\"")]
    InvalidCategoryType(String),

    /// The user already has a category with the same name and type.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategory(String),

    /// A budget limit that is negative or not a finite number was given.
    #[error("{0} is not a valid monthly limit")]
    InvalidBudgetLimit(f64),

    /// The category ID used to create or update a transaction did not refer to
    /// one of the user's categories.
    ///
    /// `None` means no category was given and the suggested category does not
    /// exist for the user.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory(Option<CategoryId>),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update transaction {0} which is not in the database")]
    UpdateMissingTransaction(TransactionId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidMonth(_)
            | Error::EmptyCategoryName
            | Error::InvalidCategoryType(_)
            | Error::InvalidBudgetLimit(_)
            | Error::InvalidCategory(_)
            | Error::InvalidCorpus(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateCategory(_) => StatusCode::CONFLICT,
            Error::NotFound
            | Error::DeleteMissingCategory
            | Error::DeleteMissingBudget
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingTransaction(_) => StatusCode::NOT_FOUND,
            Error::ClassifierUnavailable(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::JSONSerializationError(_)
            | Error::InvalidTimezoneError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side errors are logged in full but not shown to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let response = Error::InvalidMonth("2024-13".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_category_is_not_found() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn lock_error_is_internal_server_error() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
