//! A small REST service for recording financial transactions.
//!
//! Transactions can be created, fetched by ID and listed. They are stored in a
//! SQLite table and exchanged with clients as JSON.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod database_id;
mod db;
mod endpoints;
mod extract;
mod logging;
mod not_found;
mod routing;
mod transaction;

pub use app_state::AppState;
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    NewTransaction, SQLiteTransactionStore, Transaction, TransactionBuilder, TransactionDto,
    TransactionService, TransactionStatus, TransactionStore, to_internal, to_wire,
};

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
    /// The status text did not match any of the known transaction statuses.
    ///
    /// Valid statuses are `PENDING`, `COMPLETED`, `FAILED` and `CANCELED`.
    #[error("\"{0}\" is not a valid transaction status")]
    InvalidStatus(String),

    /// The currency code was not exactly three characters long.
    #[error("\"{0}\" is not a three letter currency code")]
    InvalidCurrency(String),

    /// The description was longer than 255 characters. Holds the length of the
    /// rejected description.
    #[error("the description is {0} characters long, the limit is 255")]
    DescriptionTooLong(usize),

    /// The request could not be parsed, e.g. malformed JSON or a non-integer
    /// ID in the path.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND.into_response(),
            Error::UpdateMissingTransaction | Error::DeleteMissingTransaction => {
                StatusCode::NOT_FOUND.into_response()
            }
            Error::InvalidStatus(_)
            | Error::InvalidCurrency(_)
            | Error::DescriptionTooLong(_)
            | Error::BadRequest(_) => {
                tracing::debug!("Rejecting request: {self}");
                error_response(StatusCode::BAD_REQUEST, &self.to_string())
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details.",
                )
            }
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod error_response_tests {
    use std::sync::{Arc, Mutex};

    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
    use tracing::{Level, Subscriber};
    use tracing_subscriber::{
        Layer,
        layer::{Context, SubscriberExt},
    };

    use crate::Error;

    /// Records the metadata name of every `ERROR` event.
    #[derive(Clone)]
    struct CaptureErrorLayer {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl<S> Layer<S> for CaptureErrorLayer
    where
        S: Subscriber,
    {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.events
                    .lock()
                    .unwrap()
                    .push(event.metadata().name().to_owned());
            }
        }
    }

    #[tokio::test]
    async fn not_found_has_empty_body() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty(), "got body {body:?}, want empty body");
    }

    #[tokio::test]
    async fn invalid_status_is_bad_request() {
        let response = Error::InvalidStatus("UNKNOWN".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body["error"],
            "\"UNKNOWN\" is not a valid transaction status"
        );
    }

    #[tokio::test]
    async fn sql_error_hides_details() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8_lossy(&body);
        assert!(!body.contains("InvalidQuery"), "SQL details leaked: {body}");
    }

    #[test]
    fn sql_error_is_logged_once() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(CaptureErrorLayer {
            events: errors.clone(),
        });
        let _guard = tracing::subscriber::set_default(subscriber);

        let response = Error::from(rusqlite::Error::InvalidQuery).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(errors.lock().unwrap().len(), 1, "got {errors:?}");
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
