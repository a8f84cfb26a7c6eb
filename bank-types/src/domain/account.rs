//! Account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for an Account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Creates a new random AccountId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an AccountId from an existing UUID.
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

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A named bank account holding a balance in minor units.
///
/// The balance is only ever changed by applying an
/// [`Operation`](super::Operation); it is never negative once an operation
/// has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,
    /// Human-readable account name
    pub name: String,
    /// Current balance in minor units
    pub balance: i64,
    /// Blocked accounts reject new operations
    pub blocked: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new unblocked account with zero balance.
    ///
    /// # Validation
    /// - Name cannot be empty
    pub fn new(name: String, created_at: DateTime<Utc>) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("Account name cannot be empty"));
        }

        Ok(Self {
            id: AccountId::new(),
            name,
            balance: 0,
            blocked: false,
            created_at,
        })
    }

    /// Creates an account with all fields specified (for database reconstruction).
    pub fn from_parts(
        id: AccountId,
        name: String,
        balance: i64,
        blocked: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            balance,
            blocked,
            created_at,
        }
    }

    /// Blocks the account against new operations.
    pub fn block(&mut self) -> Result<(), DomainError> {
        if self.blocked {
            return Err(DomainError::AlreadyBlocked);
        }
        self.blocked = true;
        Ok(())
    }

    /// Lifts a previous block.
    pub fn unblock(&mut self) -> Result<(), DomainError> {
        if !self.blocked {
            return Err(DomainError::AlreadyUnblocked);
        }
        self.blocked = false;
        Ok(())
    }

    /// Pre-delete check: deleting an account that still holds money would
    /// destroy it silently.
    pub fn ensure_deletable(&self) -> Result<(), DomainError> {
        if self.balance != 0 {
            return Err(DomainError::NonZeroBalance(self.balance));
        }
        Ok(())
    }

    /// Checks if the account has sufficient funds for a debit.
    pub fn has_sufficient_funds(&self, amount: i64) -> bool {
        self.balance >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str) -> Account {
        Account::new(name.to_string(), Utc::now()).unwrap()
    }

    #[test]
    fn test_account_creation() {
        let account = account("Alice");
        assert_eq!(account.name, "Alice");
        assert_eq!(account.balance, 0);
        assert!(!account.blocked);
    }

    #[test]
    fn test_empty_name_fails() {
        let result = Account::new("".to_string(), Utc::now());
        assert!(matches!(result, Err(DomainError::ValidationError(_))));

        let result = Account::new("   ".to_string(), Utc::now());
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_accounts_get_distinct_ids() {
        assert_ne!(account("a").id, account("b").id);
    }

    #[test]
    fn test_block_twice_fails() {
        let mut account = account("Test");
        account.block().unwrap();
        assert!(account.blocked);
        assert_eq!(account.block(), Err(DomainError::AlreadyBlocked));
        assert!(account.blocked);
    }

    #[test]
    fn test_unblock_twice_fails() {
        let mut account = account("Test");
        assert_eq!(account.unblock(), Err(DomainError::AlreadyUnblocked));

        account.block().unwrap();
        account.unblock().unwrap();
        assert!(!account.blocked);
        assert_eq!(account.unblock(), Err(DomainError::AlreadyUnblocked));
    }

    #[test]
    fn test_ensure_deletable() {
        let mut account = account("Test");
        assert!(account.ensure_deletable().is_ok());

        account.balance = 10;
        assert_eq!(
            account.ensure_deletable(),
            Err(DomainError::NonZeroBalance(10))
        );
    }

    #[test]
    fn test_id_parse_roundtrip() {
        let id = AccountId::new();
        let parsed: AccountId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<AccountId>().is_err());
    }
}
