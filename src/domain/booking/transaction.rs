//! Transaction orchestration
//!
//! `Open -> Committed | RolledBack`. Both end states are terminal and no
//! caller ever observes a partially applied unit of work.

use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use super::repository::{BookingRepository, UnitOfWork};
use crate::domain::DomainResult;

/// Terminal state of a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    Committed,
    RolledBack,
}

impl TransactionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Committed => "committed",
            Self::RolledBack => "rolled_back",
        }
    }
}

/// Run `work` inside one transaction.
///
/// Commits when `work` succeeds. When `work` fails the transaction is rolled
/// back and the original error is returned untouched; a failing rollback is
/// only logged since the store discards the transaction anyway. A failing
/// commit is returned as is.
///
/// ```ignore
/// let id = run_in_transaction(repo, move |uow| {
///     Box::pin(async move {
///         let id = uow.insert_reservation(&reservation).await?;
///         uow.insert_room_restriction(&NewRoomRestriction::for_reservation(&reservation, id))
///             .await?;
///         Ok(id)
///     })
/// })
/// .await?;
/// ```
pub async fn run_in_transaction<T, F>(repo: &dyn BookingRepository, work: F) -> DomainResult<T>
where
    T: Send,
    F: for<'t> FnOnce(&'t mut dyn UnitOfWork) -> BoxFuture<'t, DomainResult<T>> + Send,
{
    let mut uow = repo.begin().await?;
    debug!("transaction opened");

    let result = work(uow.as_mut()).await;
    match result {
        Ok(value) => {
            uow.commit().await?;
            debug!(outcome = TransactionOutcome::Committed.as_str(), "transaction finished");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            debug!(
                outcome = TransactionOutcome::RolledBack.as_str(),
                error = %err,
                "transaction finished"
            );
            Err(err)
        }
    }
}
