//! Converts transactions to and from the JSON representation used by the API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{Transaction, TransactionBuilder, TransactionStatus},
};

/// A transaction as it is sent to and received from API clients.
///
/// The status is plain text here so that any string can be deserialized and
/// then rejected with a helpful message by [to_internal].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    /// Assigned by the server, ignored when creating a transaction.
    #[serde(default)]
    pub id: Option<TransactionId>,
    /// Accepted as either a JSON number or a decimal string, always sent as an
    /// exact JSON number.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Free text, at most 255 characters.
    #[serde(default)]
    pub description: Option<String>,
    /// One of `PENDING`, `COMPLETED`, `FAILED` or `CANCELED`.
    #[serde(default)]
    pub status: Option<String>,
    /// Assigned by the server, ignored when creating a transaction.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    /// Assigned by the server, ignored when creating a transaction.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Convert a stored transaction into its wire representation.
pub fn to_wire(transaction: &Transaction) -> TransactionDto {
    TransactionDto {
        id: Some(transaction.id),
        amount: transaction.amount,
        currency: transaction.currency.clone(),
        description: transaction.description.clone(),
        status: Some(transaction.status.to_string()),
        created_at: Some(transaction.created_at),
        updated_at: Some(transaction.updated_at),
    }
}

/// Convert a wire transaction into a [TransactionBuilder] for creating a new
/// transaction.
///
/// The ID and timestamps are dropped since they are assigned by the system.
/// A missing status is left unset so that the creation default applies.
///
/// # Errors
/// Returns an [Error::InvalidStatus] if the status text is not a known status.
pub fn to_internal(dto: TransactionDto) -> Result<TransactionBuilder, Error> {
    let status = parse_status(dto.status.as_deref())?;

    Ok(Transaction::build(dto.amount, &dto.currency)
        .description(dto.description)
        .status(status))
}

impl TryFrom<TransactionDto> for Transaction {
    type Error = Error;

    /// Convert a complete wire transaction back into a [Transaction], keeping
    /// every field.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidStatus] if the status text is not a known status,
    /// - or [Error::BadRequest] if the ID, status or either timestamp is missing.
    fn try_from(dto: TransactionDto) -> Result<Self, Self::Error> {
        let status = parse_status(dto.status.as_deref())?.ok_or_else(|| missing("status"))?;

        Ok(Transaction {
            id: dto.id.ok_or_else(|| missing("id"))?,
            amount: dto.amount,
            currency: dto.currency,
            description: dto.description,
            status,
            created_at: dto.created_at.ok_or_else(|| missing("createdAt"))?,
            updated_at: dto.updated_at.ok_or_else(|| missing("updatedAt"))?,
        })
    }
}

fn parse_status(text: Option<&str>) -> Result<Option<TransactionStatus>, Error> {
    text.map(str::parse::<TransactionStatus>).transpose()
}

fn missing(field: &str) -> Error {
    Error::BadRequest(format!("missing field `{field}`"))
}
