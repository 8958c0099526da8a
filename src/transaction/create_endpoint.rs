//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    app_state::TransactionState,
    endpoints::{self, format_endpoint},
    extract::ApiJson,
    transaction::{TransactionDto, to_internal, to_wire},
};

/// A route handler for creating a new transaction.
///
/// Any ID or timestamps in the request body are ignored. Responds with
/// 201 Created, a `Location` header pointing at the new transaction and the
/// transaction as it was saved.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    ApiJson(dto): ApiJson<TransactionDto>,
) -> Result<Response, Error> {
    let candidate = to_internal(dto)?;
    let transaction = state.service.create(candidate)?;

    let location = format_endpoint(endpoints::TRANSACTION_API, transaction.id);

    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(to_wire(&transaction)),
    )
        .into_response())
}
