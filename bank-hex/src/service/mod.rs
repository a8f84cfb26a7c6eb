//! Application services.
//!
//! Orchestrate domain operations through the repository ports.
//! Contain NO infrastructure logic - pure business orchestration.
//!
//! Every public method opens exactly one [`Scope`], does all of its reads
//! and writes through it and commits once at the end. Returning early drops
//! the scope, which rolls back anything written so far.

mod account;
mod category;
mod operation;

use std::sync::Arc;

use bank_types::{AppError, Clock, RepoResultExt, Scope, SystemClock, UnitOfWork};

use crate::policy::Policies;

pub use account::AccountService;
pub use category::CategoryService;
pub use operation::OperationService;

async fn begin<U: UnitOfWork>(store: &U) -> Result<U::Scope, AppError> {
    let scope = store
        .begin()
        .await
        .context("Failed to begin transaction")?;
    tracing::debug!("scope opened");
    Ok(scope)
}

async fn commit<S: Scope>(scope: S) -> Result<(), AppError> {
    scope
        .commit()
        .await
        .context("Failed to commit transaction")?;
    tracing::debug!("scope committed");
    Ok(())
}

/// The three use-case groups wired to one shared store.
pub struct Bank<U: UnitOfWork> {
    pub accounts: AccountService<U>,
    pub categories: CategoryService<U>,
    pub operations: OperationService<U>,
}

impl<U: UnitOfWork> Bank<U> {
    /// Wires all services to `store`, stamping operations with the system clock.
    pub fn new(store: U, policies: Policies) -> Self {
        Self::with_clock(store, Arc::new(SystemClock::new()), policies)
    }

    pub fn with_clock(store: U, clock: Arc<dyn Clock>, policies: Policies) -> Self {
        let store = Arc::new(store);
        Self {
            accounts: AccountService::new(store.clone(), clock.clone(), policies.delete),
            categories: CategoryService::new(store.clone(), clock.clone()),
            operations: OperationService::new(store, clock, policies.category),
        }
    }
}
