//! Operation and transfer orchestration.
//!
//! These are the multi-write use cases: an account update plus an operation
//! insert (apply), or two of each (transfer). All of them go through one
//! scope so the balance change and its operation record commit together.

use std::sync::Arc;

use bank_types::{
    AccountId, AccountRepository, Amount, AppError, ApplyOperationRequest, ApplyOperationResponse,
    Category, CategoryId, CategoryRepository, Clock, DomainError, Operation, OperationId,
    OperationRepository, OperationResponse, OperationType, RepoResultExt, Scope, TransferRequest,
    TransferResponse, UnitOfWork, apply_operation,
};

use super::{begin, commit};
use crate::policy::CategoryPolicy;

/// Application service for applying operations and transfers.
pub struct OperationService<U: UnitOfWork> {
    store: Arc<U>,
    clock: Arc<dyn Clock>,
    category_policy: CategoryPolicy,
}

impl<U: UnitOfWork> OperationService<U> {
    pub fn new(store: Arc<U>, clock: Arc<dyn Clock>, category_policy: CategoryPolicy) -> Self {
        Self {
            store,
            clock,
            category_policy,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Operation Log
    // ─────────────────────────────────────────────────────────────────────────────

    /// Gets an operation by ID.
    pub async fn get(&self, id: OperationId) -> Result<OperationResponse, AppError> {
        let mut scope = begin(&*self.store).await?;
        let operation = scope
            .get_operation(id)
            .await
            .lookup(format!("Operation {}", id))?;
        commit(scope).await?;
        Ok(operation.into())
    }

    /// Lists every recorded operation.
    pub async fn list(&self) -> Result<Vec<OperationResponse>, AppError> {
        let mut scope = begin(&*self.store).await?;
        let operations = scope
            .list_operations()
            .await
            .context("Failed to list operations")?;
        commit(scope).await?;
        Ok(operations.into_iter().map(Into::into).collect())
    }

    /// Lists the operations of one account.
    pub async fn list_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<OperationResponse>, AppError> {
        let mut scope = begin(&*self.store).await?;

        // Verify account exists first
        scope
            .get_account(account_id)
            .await
            .lookup(format!("Account {}", account_id))?;

        let operations = scope
            .list_operations_for_account(account_id)
            .await
            .context("Failed to list operations")?;
        commit(scope).await?;
        Ok(operations.into_iter().map(Into::into).collect())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Applies an income or outcome operation to an account.
    ///
    /// The account update and the operation insert commit together or not
    /// at all.
    pub async fn apply(
        &self,
        req: ApplyOperationRequest,
    ) -> Result<ApplyOperationResponse, AppError> {
        let amount = Amount::new(req.amount)?;

        let mut scope = begin(&*self.store).await?;
        let mut account = scope
            .get_account(req.account_id)
            .await
            .lookup(format!("Account {}", req.account_id))?;

        let mut operation = match apply_operation(
            &mut account,
            req.operation_type,
            amount,
            req.description.unwrap_or_default(),
            self.clock.as_ref(),
        ) {
            Ok(operation) => operation,
            Err(e) => {
                tracing::warn!(account_id = %req.account_id, error = %e, "operation rejected");
                return Err(e.into());
            }
        };

        if let Some(category) = self
            .category_for(&mut scope, &operation, req.category_id)
            .await?
        {
            operation.set_category(&category)?;
        }

        let account = scope
            .update_account(&account)
            .await
            .lookup(format!("Account {}", req.account_id))?;
        let operation = scope
            .create_operation(&operation)
            .await
            .context("Failed to record operation")?;
        commit(scope).await?;

        tracing::info!(
            account_id = %account.id,
            operation_id = %operation.id,
            operation_type = %operation.operation_type,
            amount = operation.amount.value(),
            balance = account.balance,
            "operation applied"
        );

        Ok(ApplyOperationResponse {
            account: account.into(),
            operation: operation.into(),
        })
    }

    /// Moves money from one account to another as an outcome/income pair.
    ///
    /// Both balance updates and both operation records commit together.
    pub async fn transfer(&self, req: TransferRequest) -> Result<TransferResponse, AppError> {
        if req.from_account_id == req.to_account_id {
            return Err(DomainError::validation("Cannot transfer to the same account").into());
        }
        let amount = Amount::new(req.amount)?;

        let mut scope = begin(&*self.store).await?;

        // Lock accounts in consistent order to prevent deadlocks
        let (mut from, mut to) = if req.from_account_id < req.to_account_id {
            let from = scope
                .get_account(req.from_account_id)
                .await
                .lookup(format!("Account {}", req.from_account_id))?;
            let to = scope
                .get_account(req.to_account_id)
                .await
                .lookup(format!("Account {}", req.to_account_id))?;
            (from, to)
        } else {
            let to = scope
                .get_account(req.to_account_id)
                .await
                .lookup(format!("Account {}", req.to_account_id))?;
            let from = scope
                .get_account(req.from_account_id)
                .await
                .lookup(format!("Account {}", req.from_account_id))?;
            (from, to)
        };

        let legs = apply_operation(
            &mut from,
            OperationType::Outcome,
            amount,
            format!("transfer to {}", to.id),
            self.clock.as_ref(),
        )
        .and_then(|outcome| {
            let income = apply_operation(
                &mut to,
                OperationType::Income,
                amount,
                format!("transfer from {}", from.id),
                self.clock.as_ref(),
            )?;
            Ok((outcome, income))
        });
        let (outcome, income) = match legs {
            Ok(legs) => legs,
            Err(e) => {
                tracing::warn!(
                    from = %req.from_account_id,
                    to = %req.to_account_id,
                    error = %e,
                    "transfer rejected"
                );
                return Err(e.into());
            }
        };

        let from = scope
            .update_account(&from)
            .await
            .lookup(format!("Account {}", from.id))?;
        let to = scope
            .update_account(&to)
            .await
            .lookup(format!("Account {}", to.id))?;
        let outcome = scope
            .create_operation(&outcome)
            .await
            .context("Failed to record outcome leg")?;
        let income = scope
            .create_operation(&income)
            .await
            .context("Failed to record income leg")?;
        commit(scope).await?;

        tracing::info!(
            from = %from.id,
            to = %to.id,
            amount = amount.value(),
            "transfer completed"
        );

        Ok(TransferResponse {
            from_account: from.into(),
            to_account: to.into(),
            outcome_operation: outcome.into(),
            income_operation: income.into(),
        })
    }

    /// Attaches a category to an already recorded operation.
    pub async fn categorize(
        &self,
        id: OperationId,
        category_id: CategoryId,
    ) -> Result<OperationResponse, AppError> {
        let mut scope = begin(&*self.store).await?;
        let mut operation = scope
            .get_operation(id)
            .await
            .lookup(format!("Operation {}", id))?;
        let category = scope
            .get_category(category_id)
            .await
            .lookup(format!("Category {}", category_id))?;

        operation.set_category(&category)?;

        let operation = scope
            .update_operation(&operation)
            .await
            .lookup(format!("Operation {}", id))?;
        commit(scope).await?;

        tracing::info!(operation_id = %id, category_id = %category_id, "operation categorized");
        Ok(operation.into())
    }

    /// Picks the category to attach: the explicit one, or the default for
    /// the operation's type depending on policy.
    async fn category_for<S: Scope>(
        &self,
        scope: &mut S,
        operation: &Operation,
        explicit: Option<CategoryId>,
    ) -> Result<Option<Category>, AppError> {
        if let Some(id) = explicit {
            return scope
                .get_category(id)
                .await
                .lookup(format!("Category {}", id))
                .map(Some);
        }

        match self.category_policy {
            CategoryPolicy::Skip => Ok(None),
            CategoryPolicy::RequireDefault => {
                let category_type = operation.category_type();
                scope
                    .get_category_by_type(category_type)
                    .await
                    .lookup(format!("Default {} category", category_type))
                    .map(Some)
            }
        }
    }
}
