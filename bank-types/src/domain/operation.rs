//! Operation domain model and the application algorithm.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{Account, AccountId};
use super::amount::Amount;
use super::category::{Category, CategoryId, CategoryType};
use super::clock::Clock;
use crate::error::DomainError;

/// Unique identifier for an Operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(Uuid);

impl OperationId {
    /// Creates a new random OperationId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an OperationId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OperationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Direction of an operation. The domain is closed: there is no third kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Money coming into the account
    Income,
    /// Money leaving the account
    Outcome,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Income => "income",
            OperationType::Outcome => "outcome",
        }
    }

    /// The category type operations of this kind are classified under.
    pub fn category_type(self) -> CategoryType {
        match self {
            OperationType::Income => CategoryType::Income,
            OperationType::Outcome => CategoryType::Outcome,
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(OperationType::Income),
            "outcome" => Ok(OperationType::Outcome),
            other => Err(DomainError::validation(format!(
                "Unknown operation type: {:?}",
                other
            ))),
        }
    }
}

/// Resolves the category type for an untyped operation type name.
///
/// Anything outside `income`/`outcome`, including the empty string, fails
/// with [`DomainError::CannotResolveCategory`].
pub fn resolve_category_type(operation_type: &str) -> Result<CategoryType, DomainError> {
    operation_type
        .parse::<OperationType>()
        .map(OperationType::category_type)
        .map_err(|_| DomainError::CannotResolveCategory(operation_type.to_string()))
}

/// A single income or outcome movement on one account.
///
/// Operations are append-only. The only post-hoc change allowed is attaching
/// a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// Unique identifier
    pub id: OperationId,
    /// Account the operation was applied to (reference only)
    pub account_id: AccountId,
    /// Direction of the movement
    pub operation_type: OperationType,
    /// Amount moved
    pub amount: Amount,
    /// When the operation was created
    pub time: DateTime<Utc>,
    /// Free-text description
    pub description: String,
    /// Category, if one is attached
    pub category_id: Option<CategoryId>,
    #[serde(skip)]
    applied: bool,
}

impl Operation {
    /// Constructs a fresh, not yet applied operation.
    pub fn new(
        account_id: AccountId,
        operation_type: OperationType,
        amount: Amount,
        description: String,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            id: OperationId::new(),
            account_id,
            operation_type,
            amount,
            time: clock.now(),
            description,
            category_id: None,
            applied: false,
        }
    }

    /// Reconstructs a stored operation. Stored operations are always applied.
    pub fn from_parts(
        id: OperationId,
        account_id: AccountId,
        operation_type: OperationType,
        amount: Amount,
        time: DateTime<Utc>,
        description: String,
        category_id: Option<CategoryId>,
    ) -> Self {
        Self {
            id,
            account_id,
            operation_type,
            amount,
            time,
            description,
            category_id,
            applied: true,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Folds the operation into the account's balance.
    ///
    /// On error neither the account nor the operation is modified.
    pub fn apply(&mut self, account: &mut Account) -> Result<(), DomainError> {
        if self.applied {
            return Err(DomainError::AlreadyApplied);
        }
        if account.blocked {
            return Err(DomainError::AccountBlocked);
        }

        let amount = self.amount.value();
        let balance = match self.operation_type {
            OperationType::Income => account
                .balance
                .checked_add(amount)
                .ok_or_else(|| DomainError::validation("Balance overflow"))?,
            OperationType::Outcome => {
                if !account.has_sufficient_funds(amount) {
                    return Err(DomainError::InsufficientFunds {
                        available: account.balance,
                        requested: amount,
                    });
                }
                account.balance - amount
            }
        };

        account.balance = balance;
        self.applied = true;
        Ok(())
    }

    /// The category type this operation may be classified under.
    pub fn category_type(&self) -> CategoryType {
        self.operation_type.category_type()
    }

    /// Attaches a category whose type matches the operation's direction.
    pub fn set_category(&mut self, category: &Category) -> Result<(), DomainError> {
        if category.category_type != self.category_type() {
            return Err(DomainError::validation(format!(
                "Category {} is of type {}, operation requires {}",
                category.id,
                category.category_type,
                self.category_type()
            )));
        }
        self.category_id = Some(category.id);
        Ok(())
    }
}

/// Builds an operation for `account` and applies it in one step.
///
/// Returns the applied operation; the caller persists both it and the
/// mutated account.
pub fn apply_operation(
    account: &mut Account,
    operation_type: OperationType,
    amount: Amount,
    description: String,
    clock: &dyn Clock,
) -> Result<Operation, DomainError> {
    let mut operation = Operation::new(account.id, operation_type, amount, description, clock);
    operation.apply(account)?;
    Ok(operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SteppingClock;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn clock() -> SteppingClock {
        SteppingClock::fixed(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
    }

    fn account_with(balance: i64) -> Account {
        let mut account = Account::new("Alice".into(), Utc::now()).unwrap();
        account.balance = balance;
        account
    }

    fn amount(v: i64) -> Amount {
        Amount::new(v).unwrap()
    }

    #[test]
    fn test_income_increases_balance() {
        let mut account = account_with(0);
        let op = apply_operation(
            &mut account,
            OperationType::Income,
            amount(500),
            String::new(),
            &clock(),
        )
        .unwrap();

        assert_eq!(account.balance, 500);
        assert!(op.is_applied());
        assert_eq!(op.account_id, account.id);
        assert_eq!(op.operation_type, OperationType::Income);
        assert_eq!(op.amount.value(), 500);
        assert!(op.category_id.is_none());
    }

    #[test]
    fn test_timestamp_comes_from_clock() {
        let clock = clock();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let mut account = account_with(0);
        let op = apply_operation(
            &mut account,
            OperationType::Income,
            amount(1),
            String::new(),
            &clock,
        )
        .unwrap();
        assert_eq!(op.time, expected);
    }

    #[test]
    fn test_outcome_decreases_balance() {
        let mut account = account_with(500);
        apply_operation(
            &mut account,
            OperationType::Outcome,
            amount(200),
            String::new(),
            &clock(),
        )
        .unwrap();
        assert_eq!(account.balance, 300);
    }

    #[test]
    fn test_outcome_to_exactly_zero() {
        let mut account = account_with(300);
        apply_operation(
            &mut account,
            OperationType::Outcome,
            amount(300),
            String::new(),
            &clock(),
        )
        .unwrap();
        assert_eq!(account.balance, 0);
    }

    #[test]
    fn test_insufficient_funds_leaves_balance() {
        let mut account = account_with(300);
        let mut op = Operation::new(
            account.id,
            OperationType::Outcome,
            amount(1000),
            String::new(),
            &clock(),
        );

        let result = op.apply(&mut account);

        assert_eq!(
            result,
            Err(DomainError::InsufficientFunds {
                available: 300,
                requested: 1000
            })
        );
        assert_eq!(account.balance, 300);
        assert!(!op.is_applied());
    }

    #[test]
    fn test_blocked_account_rejects_operations() {
        let mut account = account_with(100);
        account.block().unwrap();

        for kind in [OperationType::Income, OperationType::Outcome] {
            let mut op = Operation::new(account.id, kind, amount(10), String::new(), &clock());
            assert_eq!(op.apply(&mut account), Err(DomainError::AccountBlocked));
            assert!(!op.is_applied());
        }
        assert_eq!(account.balance, 100);
    }

    #[test]
    fn test_reapply_fails() {
        let mut account = account_with(0);
        let mut op = Operation::new(
            account.id,
            OperationType::Income,
            amount(50),
            String::new(),
            &clock(),
        );

        op.apply(&mut account).unwrap();
        assert_eq!(op.apply(&mut account), Err(DomainError::AlreadyApplied));
        assert_eq!(account.balance, 50);
    }

    #[test]
    fn test_stored_operation_cannot_be_replayed() {
        let mut account = account_with(0);
        let mut op = Operation::from_parts(
            OperationId::new(),
            account.id,
            OperationType::Income,
            amount(50),
            Utc::now(),
            String::new(),
            None,
        );
        assert_eq!(op.apply(&mut account), Err(DomainError::AlreadyApplied));
        assert_eq!(account.balance, 0);
    }

    #[test]
    fn test_income_overflow_is_rejected() {
        let mut account = account_with(i64::MAX);
        let result = apply_operation(
            &mut account,
            OperationType::Income,
            amount(1),
            String::new(),
            &clock(),
        );
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
        assert_eq!(account.balance, i64::MAX);
    }

    #[test]
    fn test_resolve_category_type() {
        assert_eq!(resolve_category_type("income"), Ok(CategoryType::Income));
        assert_eq!(resolve_category_type("outcome"), Ok(CategoryType::Outcome));
        assert_eq!(
            resolve_category_type(""),
            Err(DomainError::CannotResolveCategory(String::new()))
        );
        assert_eq!(
            resolve_category_type("transfer"),
            Err(DomainError::CannotResolveCategory("transfer".into()))
        );
        assert_eq!(
            OperationType::Outcome.category_type(),
            CategoryType::Outcome
        );
    }

    #[test]
    fn test_set_category_checks_type() {
        let mut account = account_with(0);
        let mut op = apply_operation(
            &mut account,
            OperationType::Income,
            amount(10),
            String::new(),
            &clock(),
        )
        .unwrap();

        let food = Category::new(CategoryType::Outcome, "Food".into(), Utc::now()).unwrap();
        assert!(matches!(
            op.set_category(&food),
            Err(DomainError::ValidationError(_))
        ));
        assert!(op.category_id.is_none());

        let salary = Category::new(CategoryType::Income, "Salary".into(), Utc::now()).unwrap();
        op.set_category(&salary).unwrap();
        assert_eq!(op.category_id, Some(salary.id));
    }

    proptest! {
        #[test]
        fn prop_balance_is_income_minus_applied_outcome(
            ops in proptest::collection::vec((any::<bool>(), 1i64..10_000), 0..64)
        ) {
            let clock = clock();
            let mut account = account_with(0);
            let mut expected = 0i64;

            for (is_income, value) in ops {
                let kind = if is_income { OperationType::Income } else { OperationType::Outcome };
                let before = account.balance;
                match apply_operation(&mut account, kind, amount(value), String::new(), &clock) {
                    Ok(_) => {
                        expected += if is_income { value } else { -value };
                    }
                    Err(DomainError::InsufficientFunds { .. }) => {
                        prop_assert!(!is_income);
                        prop_assert_eq!(account.balance, before);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {}", other),
                }
                prop_assert!(account.balance >= 0);
                prop_assert_eq!(account.balance, expected);
            }
        }
    }
}
