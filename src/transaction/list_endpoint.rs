//! Defines the endpoint for listing all transactions.

use axum::{Json, extract::State};

use crate::{
    Error,
    app_state::TransactionState,
    transaction::{TransactionDto, to_wire},
};

/// A route handler that responds with every transaction as a JSON array.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
) -> Result<Json<Vec<TransactionDto>>, Error> {
    let transactions = state.service.list_all()?;

    Ok(Json(transactions.iter().map(to_wire).collect()))
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use serde_json::Value;

    use crate::{
        AppState, build_router, endpoints,
        transaction::{SQLiteTransactionStore, Transaction, TransactionService},
    };

    fn get_test_state_and_server() -> (AppState, TestServer) {
        let conn = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(conn).expect("Could not create app state.");
        let server =
            TestServer::try_new(build_router(state.clone())).expect("Could not create test server.");

        (state, server)
    }

    #[tokio::test]
    async fn lists_all_transactions() {
        let (state, server) = get_test_state_and_server();
        let service =
            TransactionService::new(SQLiteTransactionStore::new(state.db_connection.clone()));
        service
            .create(Transaction::build(dec!(1.00), "USD"))
            .unwrap();
        service
            .create(Transaction::build(dec!(2.00), "EUR"))
            .unwrap();

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "application/json");
        let body: Vec<Value> = response.json();
        assert_eq!(body.len(), 2);
        assert_eq!(body[0]["id"], 1);
        assert_eq!(body[1]["id"], 2);
        assert_eq!(body[1]["currency"], "EUR");
    }

    #[tokio::test]
    async fn lists_empty_array_when_there_are_no_transactions() {
        let (_, server) = get_test_state_and_server();

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status_ok();
        let body: Vec<Value> = response.json();
        assert!(body.is_empty(), "got {body:?}, want empty array");
    }
}
