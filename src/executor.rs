use sqlx::{Sqlite, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};

/// Executor wraps a database transaction for use by the storage layer.
///
/// This struct provides a shared reference to a SQLite transaction that can
/// be passed to multiple data access objects within a unit of work.
#[derive(Clone, Debug)]
pub struct Executor {
    pub tx: Arc<Mutex<Option<Transaction<'static, Sqlite>>>>,
}

impl Executor {
    /// Creates a new Executor from a SQLite transaction.
    pub fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Takes ownership of the transaction, leaving None in its place.
    /// This should only be called when committing or rolling back.
    pub(crate) async fn take_transaction(&self) -> StoreResult<Transaction<'static, Sqlite>> {
        self.tx.lock().await.take().ok_or(StoreError::TransactionClosed)
    }
}
