//! Transaction management for the REST API.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The store that saves transactions to the database
//! - The mapping between the stored and the JSON representation
//! - The service that applies the creation rules
//! - The route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod get_endpoint;
mod list_endpoint;
mod mapping;
mod service;
mod store;

pub use core::{NewTransaction, Transaction, TransactionBuilder, TransactionStatus};
pub use create_endpoint::create_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use mapping::{TransactionDto, to_internal, to_wire};
pub use service::TransactionService;
pub use store::{SQLiteTransactionStore, TransactionStore, create_transaction_table};
