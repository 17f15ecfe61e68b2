use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;

use crate::error::StoreResult;
use crate::Executor;

/// Unit of Work pattern for managing database transactions.
///
/// The UnitOfWork manages the lifecycle of database transactions and provides
/// a factory method to create new transaction sessions. One session spans one
/// use case: all reads in it see a single snapshot, and a write either commits
/// as a whole or leaves no rows behind.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Session: UnitOfWorkSession;

    /// Begin a new transaction session.
    async fn begin(&self) -> StoreResult<Self::Session>;
}

/// Represents a single database transaction session.
#[async_trait]
pub trait UnitOfWorkSession: Send + Sync {
    /// Get the executor for this session (provides access to the transaction).
    fn executor(&self) -> &Executor;

    /// Commit the transaction.
    async fn commit(self) -> StoreResult<()>;

    /// Rollback the transaction.
    async fn rollback(self) -> StoreResult<()>;
}

/// Default implementation of UnitOfWork for SQLite.
pub struct SqliteUnitOfWork {
    pool: Arc<SqlitePool>,
}

impl SqliteUnitOfWork {
    /// Create a new SqliteUnitOfWork with the given connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    type Session = SqliteUnitOfWorkSession;

    async fn begin(&self) -> StoreResult<Self::Session> {
        let tx = self.pool.begin().await?;
        Ok(SqliteUnitOfWorkSession::new(tx))
    }
}

/// Default implementation of UnitOfWorkSession for SQLite.
pub struct SqliteUnitOfWorkSession {
    executor: Executor,
}

impl SqliteUnitOfWorkSession {
    /// Create a new session from a SQLite transaction.
    pub fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self {
            executor: Executor::new(tx),
        }
    }
}

#[async_trait]
impl UnitOfWorkSession for SqliteUnitOfWorkSession {
    fn executor(&self) -> &Executor {
        &self.executor
    }

    async fn commit(self) -> StoreResult<()> {
        let tx = self.executor.take_transaction().await?;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> StoreResult<()> {
        let tx = self.executor.take_transaction().await?;
        tx.rollback().await?;
        Ok(())
    }
}
