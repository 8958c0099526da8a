//! The business rules that sit between the HTTP handlers and the store.

use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{Transaction, TransactionBuilder, TransactionStore},
};

/// Creates and retrieves transactions.
#[derive(Debug, Clone)]
pub struct TransactionService<S> {
    store: S,
}

impl<S> TransactionService<S>
where
    S: TransactionStore,
{
    /// Create a new service backed by `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the transaction with `id`.
    ///
    /// A missing transaction is not an error, it is returned as `None`.
    ///
    /// # Errors
    /// Returns an error if the store could not be queried.
    pub fn get_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, Error> {
        tracing::debug!("Fetching transaction {id}");
        self.store.get(id)
    }

    /// Save a new transaction.
    ///
    /// The creation defaults are applied and both timestamps are set to the
    /// current time before the transaction is handed to the store, which
    /// assigns the ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidCurrency] or [Error::DescriptionTooLong] if `candidate` is invalid,
    /// - or any error from the store.
    pub fn create(&self, candidate: TransactionBuilder) -> Result<Transaction, Error> {
        let new_transaction = candidate.finalize(OffsetDateTime::now_utc())?;
        let transaction = self.store.create(new_transaction)?;

        tracing::info!("Created transaction {}", transaction.id);

        Ok(transaction)
    }

    /// Get every stored transaction in the order the store returns them.
    ///
    /// # Errors
    /// Returns an error if the store could not be queried.
    pub fn list_all(&self) -> Result<Vec<Transaction>, Error> {
        self.store.get_all()
    }
}
