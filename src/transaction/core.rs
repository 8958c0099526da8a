//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId};

/// The maximum number of characters allowed in a transaction description.
pub const MAX_DESCRIPTION_LENGTH: usize = 255;

/// The number of fractional digits kept for transaction amounts.
pub const AMOUNT_SCALE: u32 = 4;

/// The number of characters in a currency code, e.g. "USD".
const CURRENCY_CODE_LENGTH: usize = 3;

// ============================================================================
// MODELS
// ============================================================================

/// The processing state of a transaction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    /// The transaction has been recorded but not settled yet.
    #[default]
    Pending,
    /// The transaction went through.
    Completed,
    /// The transaction was attempted and did not go through.
    Failed,
    /// The transaction was called off before it completed.
    Canceled,
}

impl TransactionStatus {
    /// All statuses in declaration order.
    pub const ALL: [TransactionStatus; 4] = [
        TransactionStatus::Pending,
        TransactionStatus::Completed,
        TransactionStatus::Failed,
        TransactionStatus::Canceled,
    ];

    /// The textual name of the status as used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Canceled => "CANCELED",
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    /// Parse a status from its exact, upper case name.
    ///
    /// # Errors
    /// Returns an [Error::InvalidStatus] if `s` is not one of `PENDING`,
    /// `COMPLETED`, `FAILED` or `CANCELED`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::InvalidStatus(s.to_owned()))
    }
}

impl ToSql for TransactionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A financial transaction that has been saved to the database.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database.
    pub id: TransactionId,
    /// The amount of money moved in this transaction.
    pub amount: Decimal,
    /// The ISO 4217 code of the currency the amount is in, e.g. "USD".
    pub currency: String,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// Where the transaction is in its lifecycle.
    pub status: TransactionStatus,
    /// When the transaction was first saved.
    pub created_at: OffsetDateTime,
    /// When the transaction was last saved.
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: Decimal, currency: &str) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            currency: currency.to_owned(),
            description: None,
            status: None,
        }
    }
}

/// The client supplied part of a transaction, before it has been saved.
///
/// There is no ID or timestamp field, both are assigned by the
/// system when the transaction is created.
///
/// # Examples
///
/// ```ignore
/// use rust_decimal_macros::dec;
/// use time::OffsetDateTime;
///
/// let new_transaction = Transaction::build(dec!(12.50), "NZD")
///     .description(Some("Lunch".to_owned()))
///     .finalize(OffsetDateTime::now_utc())
///     .unwrap();
///
/// assert_eq!(new_transaction.status, TransactionStatus::Pending);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction.
    pub amount: Decimal,
    /// The currency code, must be exactly three characters.
    pub currency: String,
    /// An optional description of at most [MAX_DESCRIPTION_LENGTH] characters.
    pub description: Option<String>,
    /// The initial status, [TransactionStatus::Pending] if `None`.
    pub status: Option<TransactionStatus>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Set the initial status for the transaction.
    pub fn status(mut self, status: Option<TransactionStatus>) -> Self {
        self.status = status;
        self
    }

    /// Apply the creation defaults and stamp both timestamps with `now`.
    ///
    /// The amount is rounded to [AMOUNT_SCALE] decimal places and a missing
    /// status becomes [TransactionStatus::Pending].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidCurrency] if the currency is not three characters long,
    /// - or [Error::DescriptionTooLong] if the description is longer than [MAX_DESCRIPTION_LENGTH].
    pub fn finalize(self, now: OffsetDateTime) -> Result<NewTransaction, Error> {
        if self.currency.chars().count() != CURRENCY_CODE_LENGTH {
            return Err(Error::InvalidCurrency(self.currency));
        }

        if let Some(description) = &self.description {
            let length = description.chars().count();

            if length > MAX_DESCRIPTION_LENGTH {
                return Err(Error::DescriptionTooLong(length));
            }
        }

        Ok(NewTransaction {
            amount: self.amount.round_dp(AMOUNT_SCALE),
            currency: self.currency,
            description: self.description,
            status: self.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }
}

impl From<&Transaction> for TransactionBuilder {
    fn from(transaction: &Transaction) -> Self {
        Transaction::build(transaction.amount, &transaction.currency)
            .description(transaction.description.clone())
            .status(Some(transaction.status))
    }
}

/// A transaction that is ready to be inserted into the database.
///
/// Use [TransactionBuilder::finalize] to create one so that the creation
/// defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The monetary amount of the transaction.
    pub amount: Decimal,
    /// The currency code.
    pub currency: String,
    /// An optional description.
    pub description: Option<String>,
    /// The initial status.
    pub status: TransactionStatus,
    /// The creation time.
    pub created_at: OffsetDateTime,
    /// Equal to `created_at` for a new transaction.
    pub updated_at: OffsetDateTime,
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod builder_tests {
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use super::MAX_DESCRIPTION_LENGTH;
    use crate::{
        Error,
        transaction::{Transaction, TransactionStatus},
    };

    #[test]
    fn finalize_defaults_status_to_pending() {
        let now = datetime!(2025-10-05 12:00 UTC);

        let new_transaction = Transaction::build(dec!(10.00), "USD")
            .finalize(now)
            .unwrap();

        assert_eq!(new_transaction.status, TransactionStatus::Pending);
    }

    #[test]
    fn finalize_keeps_given_status() {
        let now = datetime!(2025-10-05 12:00 UTC);

        let new_transaction = Transaction::build(dec!(10.00), "USD")
            .status(Some(TransactionStatus::Failed))
            .finalize(now)
            .unwrap();

        assert_eq!(new_transaction.status, TransactionStatus::Failed);
    }

    #[test]
    fn finalize_stamps_both_timestamps() {
        let now = datetime!(2025-10-05 12:00 +13);

        let new_transaction = Transaction::build(dec!(10.00), "NZD")
            .finalize(now)
            .unwrap();

        assert_eq!(new_transaction.created_at, now);
        assert_eq!(new_transaction.updated_at, now);
    }

    #[test]
    fn finalize_rounds_amount_to_four_places() {
        let now = datetime!(2025-10-05 12:00 UTC);

        let new_transaction = Transaction::build(dec!(1.234567), "USD")
            .finalize(now)
            .unwrap();

        assert_eq!(new_transaction.amount, dec!(1.2346));
    }

    #[test]
    fn finalize_rejects_long_currency() {
        let now = datetime!(2025-10-05 12:00 UTC);

        let result = Transaction::build(dec!(1), "EURO").finalize(now);

        assert_eq!(result, Err(Error::InvalidCurrency("EURO".to_owned())));
    }

    #[test]
    fn finalize_rejects_empty_currency() {
        let now = datetime!(2025-10-05 12:00 UTC);

        let result = Transaction::build(dec!(1), "").finalize(now);

        assert_eq!(result, Err(Error::InvalidCurrency(String::new())));
    }

    #[test]
    fn finalize_accepts_description_at_limit() {
        let now = datetime!(2025-10-05 12:00 UTC);
        let description = "a".repeat(MAX_DESCRIPTION_LENGTH);

        let result = Transaction::build(dec!(1), "USD")
            .description(Some(description))
            .finalize(now);

        assert!(result.is_ok(), "got {result:?}, want Ok");
    }

    #[test]
    fn finalize_rejects_description_over_limit() {
        let now = datetime!(2025-10-05 12:00 UTC);
        let description = "a".repeat(MAX_DESCRIPTION_LENGTH + 1);

        let result = Transaction::build(dec!(1), "USD")
            .description(Some(description))
            .finalize(now);

        assert_eq!(
            result,
            Err(Error::DescriptionTooLong(MAX_DESCRIPTION_LENGTH + 1))
        );
    }

    #[test]
    fn description_limit_counts_characters_not_bytes() {
        let now = datetime!(2025-10-05 12:00 UTC);
        let description = "ü".repeat(MAX_DESCRIPTION_LENGTH);

        let result = Transaction::build(dec!(1), "EUR")
            .description(Some(description))
            .finalize(now);

        assert!(result.is_ok(), "got {result:?}, want Ok");
    }
}
