//! Application router configuration.

use axum::{Router, routing::get};

use crate::{
    AppState, endpoints,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, get_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION_API, get(get_transaction_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, build_router, endpoints};

    fn get_test_server() -> TestServer {
        let conn = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(conn).expect("Could not create app state.");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/api/accounts").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn delete_is_not_exposed() {
        let server = get_test_server();

        let response = server.delete("/api/transactions/1").await;

        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn update_is_not_exposed() {
        let server = get_test_server();

        let response = server.put(endpoints::TRANSACTIONS_API).await;

        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }
}
