//! Transactional scope port.
//!
//! Every use case acquires exactly one [`Scope`] and runs all its reads and
//! writes through it, so either every write of the use case commits or none
//! does.

use super::repository::{AccountRepository, CategoryRepository, OperationRepository};
use crate::error::RepoError;

/// An open transaction spanning all three repositories.
///
/// Dropping a scope without calling [`Scope::commit`] rolls it back.
#[async_trait::async_trait]
pub trait Scope: AccountRepository + CategoryRepository + OperationRepository + Send {
    /// Makes every write done through this scope durable.
    async fn commit(self) -> Result<(), RepoError>;

    /// Discards every write done through this scope.
    async fn rollback(self) -> Result<(), RepoError>;
}

/// Factory for transactional scopes. The storage handle the services share.
#[async_trait::async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    type Scope: Scope + 'static;

    /// Opens a new scope.
    async fn begin(&self) -> Result<Self::Scope, RepoError>;
}
