//! Defines the transaction store trait and its SQLite implementation.

use std::{
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, OptionalExtension, Row, types::Type};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{NewTransaction, Transaction},
};

/// Handles the persistence of transactions.
pub trait TransactionStore {
    /// Insert a new transaction. The store assigns the ID.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction by its `id`, `None` if there is no such transaction.
    fn get(&self, id: TransactionId) -> Result<Option<Transaction>, Error>;

    /// Retrieve every transaction in the store, in the order they were created.
    fn get_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Save the changes made to an existing transaction and refresh its
    /// `updated_at` timestamp.
    fn update(&self, transaction: &Transaction) -> Result<Transaction, Error>;

    /// Remove a transaction from the store.
    fn delete(&self, id: TransactionId) -> Result<(), Error>;
}

/// Stores transactions in a SQLite database.
///
/// The `"transaction"` table must exist, see [crate::initialize_db].
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Insert a new transaction into the database.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if the row violates a
    /// table constraint or there is some other SQL error.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(
                "INSERT INTO \"transaction\" (amount, currency, description, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, amount, currency, description, status, created_at, updated_at",
            )?
            .query_row(
                (
                    transaction.amount.to_string(),
                    transaction.currency,
                    transaction.description,
                    transaction.status,
                    transaction.created_at,
                    transaction.updated_at,
                ),
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get(&self, id: TransactionId) -> Result<Option<Transaction>, Error> {
        let transaction = self
            .lock()?
            .prepare(
                "SELECT id, amount, currency, description, status, created_at, updated_at
                 FROM \"transaction\" WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], map_transaction_row)
            .optional()?;

        Ok(transaction)
    }

    /// Retrieve all transactions ordered by ID.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        self.lock()?
            .prepare(
                "SELECT id, amount, currency, description, status, created_at, updated_at
                 FROM \"transaction\" ORDER BY id ASC",
            )?
            .query_map([], map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    /// Overwrite the amount, currency, description and status of an existing
    /// transaction.
    ///
    /// The timestamps on `transaction` are ignored. `created_at` is never
    /// changed and `updated_at` is set to the current time, or kept if the
    /// stored value is later, so it never moves backwards.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingTransaction] if `transaction.id` does not refer to a stored transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&self, transaction: &Transaction) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let stored_updated_at: OffsetDateTime = connection
            .prepare("SELECT updated_at FROM \"transaction\" WHERE id = :id")?
            .query_row(&[(":id", &transaction.id)], |row| row.get(0))
            .optional()?
            .ok_or(Error::UpdateMissingTransaction)?;

        let updated_at = OffsetDateTime::now_utc().max(stored_updated_at);

        connection
            .prepare(
                "UPDATE \"transaction\"
                 SET amount = ?1, currency = ?2, description = ?3, status = ?4, updated_at = ?5
                 WHERE id = ?6
                 RETURNING id, amount, currency, description, status, created_at, updated_at",
            )?
            .query_row(
                (
                    transaction.amount.to_string(),
                    &transaction.currency,
                    &transaction.description,
                    transaction.status,
                    updated_at,
                    transaction.id,
                ),
                map_transaction_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
                error => error.into(),
            })
    }

    /// Delete the transaction with `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingTransaction] if `id` does not refer to a stored transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let rows_affected = self
            .lock()?
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        Ok(())
    }
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount TEXT NOT NULL,
                currency TEXT NOT NULL CHECK (length(currency) = 3),
                description TEXT CHECK (description IS NULL OR length(description) <= 255),
                status TEXT NOT NULL CHECK (status IN ('PENDING', 'COMPLETED', 'FAILED', 'CANCELED')),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT INTO sqlite_sequence (name, seq)
         SELECT 'transaction', 0
         WHERE NOT EXISTS (SELECT 1 FROM sqlite_sequence WHERE name = 'transaction')",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Expects the columns in table order: id, amount, currency, description,
/// status, created_at, updated_at.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount: String = row.get(1)?;
    let amount = Decimal::from_str(&amount).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error))
    })?;
    let currency = row.get(2)?;
    let description = row.get(3)?;
    let status = row.get(4)?;
    let created_at = row.get(5)?;
    let updated_at = row.get(6)?;

    Ok(Transaction {
        id,
        amount,
        currency,
        description,
        status,
        created_at,
        updated_at,
    })
}
