//! Repository port traits.
//!
//! Adapters (Postgres, SQLite, in-memory) implement these inside a
//! transactional [`Scope`](super::Scope). Lookups by id report a miss as
//! [`RepoError::NotFound`].

use crate::domain::{
    Account, AccountId, Category, CategoryId, CategoryType, Operation, OperationId,
};
use crate::error::RepoError;

/// Persistence of accounts.
#[async_trait::async_trait]
pub trait AccountRepository: Send {
    /// Gets an account by ID. Adapters that support it lock the row until
    /// the enclosing scope ends.
    async fn get_account(&mut self, id: AccountId) -> Result<Account, RepoError>;

    /// Lists all accounts, oldest first.
    async fn list_accounts(&mut self) -> Result<Vec<Account>, RepoError>;

    /// Inserts a new account.
    async fn create_account(&mut self, account: &Account) -> Result<Account, RepoError>;

    /// Overwrites name, balance and blocked flag of an existing account.
    async fn update_account(&mut self, account: &Account) -> Result<Account, RepoError>;

    /// Deletes an account, returning the removed row.
    async fn delete_account(&mut self, id: AccountId) -> Result<Account, RepoError>;
}

/// Persistence of categories.
#[async_trait::async_trait]
pub trait CategoryRepository: Send {
    async fn get_category(&mut self, id: CategoryId) -> Result<Category, RepoError>;

    /// Gets the default category of a type: the oldest one.
    async fn get_category_by_type(
        &mut self,
        category_type: CategoryType,
    ) -> Result<Category, RepoError>;

    async fn list_categories(&mut self) -> Result<Vec<Category>, RepoError>;

    async fn create_category(&mut self, category: &Category) -> Result<Category, RepoError>;

    async fn update_category(&mut self, category: &Category) -> Result<Category, RepoError>;

    async fn delete_category(&mut self, id: CategoryId) -> Result<Category, RepoError>;
}

/// Persistence of the operation log.
#[async_trait::async_trait]
pub trait OperationRepository: Send {
    async fn get_operation(&mut self, id: OperationId) -> Result<Operation, RepoError>;

    /// Lists all operations in time order.
    async fn list_operations(&mut self) -> Result<Vec<Operation>, RepoError>;

    /// Lists the operations of one account in time order.
    async fn list_operations_for_account(
        &mut self,
        account_id: AccountId,
    ) -> Result<Vec<Operation>, RepoError>;

    async fn create_operation(&mut self, operation: &Operation) -> Result<Operation, RepoError>;

    /// Updates an operation. Only the category reference is expected to change.
    async fn update_operation(&mut self, operation: &Operation) -> Result<Operation, RepoError>;

    async fn delete_operation(&mut self, id: OperationId) -> Result<Operation, RepoError>;
}
