use thiserror::Error;

use crate::OrderId;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred (connection, acquisition timeout, constraint, commit).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A write referenced an order that is not visible to the transaction.
    #[error("Order {0} is not part of this transaction")]
    UnknownOrder(OrderId),

    /// A persisted row could not be mapped back to a record.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// The storage backend rejected the operation.
    #[error("Store backend failure: {0}")]
    Backend(String),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
