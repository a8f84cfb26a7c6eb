//! Account lifecycle use cases.

use std::sync::Arc;

use bank_types::{
    Account, AccountId, AccountRepository, AccountResponse, AppError, Clock, CreateAccountRequest,
    DomainError, RepoResultExt, UnitOfWork,
};

use super::{begin, commit};
use crate::policy::DeletePolicy;

/// Application service for account lifecycle operations.
///
/// Generic over `U: UnitOfWork` - the storage adapter is injected at compile time.
pub struct AccountService<U: UnitOfWork> {
    store: Arc<U>,
    clock: Arc<dyn Clock>,
    delete_policy: DeletePolicy,
}

impl<U: UnitOfWork> AccountService<U> {
    pub fn new(store: Arc<U>, clock: Arc<dyn Clock>, delete_policy: DeletePolicy) -> Self {
        Self {
            store,
            clock,
            delete_policy,
        }
    }

    /// Gets an account by ID.
    pub async fn get(&self, id: AccountId) -> Result<AccountResponse, AppError> {
        let mut scope = begin(&*self.store).await?;
        let account = scope
            .get_account(id)
            .await
            .lookup(format!("Account {}", id))?;
        commit(scope).await?;
        Ok(account.into())
    }

    /// Lists all accounts.
    pub async fn list(&self) -> Result<Vec<AccountResponse>, AppError> {
        let mut scope = begin(&*self.store).await?;
        let accounts = scope
            .list_accounts()
            .await
            .context("Failed to list accounts")?;
        commit(scope).await?;
        Ok(accounts.into_iter().map(Into::into).collect())
    }

    /// Creates a new account with zero balance.
    pub async fn create(&self, req: CreateAccountRequest) -> Result<AccountResponse, AppError> {
        let account = Account::new(req.name, self.clock.now())?;

        let mut scope = begin(&*self.store).await?;
        let account = scope
            .create_account(&account)
            .await
            .context("Failed to save account")?;
        commit(scope).await?;

        tracing::info!(account_id = %account.id, "account created");
        Ok(account.into())
    }

    /// Blocks an account against new operations.
    pub async fn block(&self, id: AccountId) -> Result<AccountResponse, AppError> {
        self.transition(id, "blocked", Account::block).await
    }

    /// Unblocks a previously blocked account.
    pub async fn unblock(&self, id: AccountId) -> Result<AccountResponse, AppError> {
        self.transition(id, "unblocked", Account::unblock).await
    }

    /// Deletes an account, enforcing the configured [`DeletePolicy`].
    pub async fn delete(&self, id: AccountId) -> Result<AccountResponse, AppError> {
        let mut scope = begin(&*self.store).await?;
        let account = scope
            .get_account(id)
            .await
            .lookup(format!("Account {}", id))?;

        if self.delete_policy == DeletePolicy::RequireZeroBalance {
            if let Err(e) = account.ensure_deletable() {
                tracing::warn!(account_id = %id, error = %e, "account delete rejected");
                return Err(e.into());
            }
        }

        let account = scope
            .delete_account(id)
            .await
            .lookup(format!("Account {}", id))?;
        commit(scope).await?;

        tracing::info!(account_id = %id, balance = account.balance, "account deleted");
        Ok(account.into())
    }

    /// Load, mutate through `apply`, persist.
    async fn transition(
        &self,
        id: AccountId,
        label: &'static str,
        apply: fn(&mut Account) -> Result<(), DomainError>,
    ) -> Result<AccountResponse, AppError> {
        let mut scope = begin(&*self.store).await?;
        let mut account = scope
            .get_account(id)
            .await
            .lookup(format!("Account {}", id))?;

        if let Err(e) = apply(&mut account) {
            tracing::warn!(account_id = %id, error = %e, "account transition rejected");
            return Err(e.into());
        }

        let account = scope
            .update_account(&account)
            .await
            .lookup(format!("Account {}", id))?;
        commit(scope).await?;

        tracing::info!(account_id = %id, "account {}", label);
        Ok(account.into())
    }
}
