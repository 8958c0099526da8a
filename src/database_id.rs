//! Database ID type definitions.

/// Alias for the integer type used for mapping to transaction IDs.
///
/// IDs are assigned by SQLite when a row is inserted and start at 1.
pub type TransactionId = i64;
