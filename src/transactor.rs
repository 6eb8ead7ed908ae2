//! Transaction coordination for repository calls.
//!
//! Repositories never receive a transaction handle directly. They receive a
//! [`Session`] and ask the [`Transactor`] to resolve it into a [`Conn`]: the
//! shared pool for a pooled session, or the open transaction for a session
//! handed out by [`Transactor::run_in_transaction`]. Every repository query is
//! therefore written once and joins an enclosing unit of work when there is one.

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, ExecResult,
    QueryResult, Statement, TransactionTrait,
};

use crate::error::{AppError, AppResult};

/// Per-call execution context.
///
/// A pooled session runs every statement on the shared pool. A transactional
/// session is only created by the [`Transactor`] and is confined to the unit
/// of work it was handed to, and is not `Clone`.
pub struct Session {
    tx_required: bool,
    tx: Option<Arc<DatabaseTransaction>>,
}

impl Session {
    /// A session outside of any transaction.
    pub fn pooled() -> Self {
        Self {
            tx_required: false,
            tx: None,
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.tx_required
    }
}

/// The thing a statement runs against.
pub enum Conn<'a> {
    Pool(&'a DatabaseConnection),
    Tx(&'a DatabaseTransaction),
}

impl Conn<'_> {
    pub fn is_transaction(&self) -> bool {
        matches!(self, Conn::Tx(_))
    }
}

#[async_trait]
impl<'a> ConnectionTrait for Conn<'a> {
    fn get_database_backend(&self) -> DbBackend {
        match self {
            Conn::Pool(db) => db.get_database_backend(),
            Conn::Tx(tx) => tx.get_database_backend(),
        }
    }

    async fn execute(&self, stmt: Statement) -> Result<ExecResult, DbErr> {
        match self {
            Conn::Pool(db) => db.execute(stmt).await,
            Conn::Tx(tx) => tx.execute(stmt).await,
        }
    }

    async fn execute_unprepared(&self, sql: &str) -> Result<ExecResult, DbErr> {
        match self {
            Conn::Pool(db) => db.execute_unprepared(sql).await,
            Conn::Tx(tx) => tx.execute_unprepared(sql).await,
        }
    }

    async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, DbErr> {
        match self {
            Conn::Pool(db) => db.query_one(stmt).await,
            Conn::Tx(tx) => tx.query_one(stmt).await,
        }
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        match self {
            Conn::Pool(db) => db.query_all(stmt).await,
            Conn::Tx(tx) => tx.query_all(stmt).await,
        }
    }
}

#[derive(Clone)]
pub struct Transactor {
    pool: DatabaseConnection,
}

impl Transactor {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Runs `work` inside a new transaction.
    ///
    /// Commits when `work` succeeds and surfaces a failed commit. When `work`
    /// fails the transaction is rolled back and the original error is
    /// returned; a failed rollback is only logged. `parent` is the caller's
    /// own session: nesting is not supported and a transactional parent is
    /// rejected before anything is started.
    ///
    /// Dropping the returned future (e.g. on a deadline) drops the open
    /// transaction, which the driver rolls back.
    pub async fn run_in_transaction<F, Fut, T>(&self, parent: &Session, work: F) -> AppResult<T>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if parent.in_transaction() {
            return Err(AppError::Consistency(
                "nested transactions are not supported".into(),
            ));
        }

        let tx = Arc::new(self.pool.begin().await?);
        let session = Session {
            tx_required: true,
            tx: Some(Arc::clone(&tx)),
        };

        let outcome = work(session).await;

        // The session moved into `work` is gone by now, so this is the last handle.
        let tx = match Arc::try_unwrap(tx) {
            Ok(tx) => tx,
            Err(shared) => {
                tracing::error!("unit of work leaked its session, rolling back");
                // Usually the leaked handle is in the returned value.
                drop(outcome);
                if let Ok(tx) = Arc::try_unwrap(shared) {
                    if let Err(rollback_err) = tx.rollback().await {
                        tracing::warn!(error = %rollback_err, "rollback failed");
                    }
                }
                return Err(AppError::Consistency(
                    "transaction session outlived its unit of work".into(),
                ));
            }
        };

        match outcome {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(error = %err, "unit of work failed, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Resolves the connection a statement issued under `session` must use.
    pub fn conn<'a>(&'a self, session: &'a Session) -> AppResult<Conn<'a>> {
        if !session.tx_required {
            return Ok(Conn::Pool(&self.pool));
        }
        match session.tx.as_deref() {
            Some(tx) => Ok(Conn::Tx(tx)),
            None => Err(AppError::Consistency(
                "transaction required, but not found".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disconnected() -> Transactor {
        Transactor::new(DatabaseConnection::Disconnected)
    }

    #[test]
    fn pooled_session_resolves_to_pool() {
        let transactor = disconnected();
        let session = Session::pooled();
        let conn = transactor.conn(&session).expect("pooled session resolves");
        assert!(!conn.is_transaction());
    }

    #[test]
    fn required_transaction_without_handle_is_a_consistency_error() {
        let transactor = disconnected();
        let session = Session {
            tx_required: true,
            tx: None,
        };
        let err = transactor.conn(&session).err().expect("must fail");
        assert!(matches!(err, AppError::Consistency(_)));
    }

    #[tokio::test]
    async fn nested_transaction_is_rejected_before_begin() {
        let transactor = disconnected();
        let parent = Session {
            tx_required: true,
            tx: None,
        };
        let result = transactor
            .run_in_transaction(&parent, |_session| async { Ok(()) })
            .await;
        assert!(matches!(result, Err(AppError::Consistency(_))));
    }
}
