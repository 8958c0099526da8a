//! Defines the endpoint for fetching a single transaction.

use axum::{Json, extract::State};

use crate::{
    Error,
    app_state::TransactionState,
    database_id::TransactionId,
    extract::ApiPath,
    transaction::{TransactionDto, to_wire},
};

/// A route handler for getting a transaction by its database ID.
///
/// Responds with 404 Not Found and an empty body if the transaction does not exist.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<Json<TransactionDto>, Error> {
    state
        .service
        .get_by_id(transaction_id)?
        .map(|transaction| Json(to_wire(&transaction)))
        .ok_or(Error::NotFound)
}
