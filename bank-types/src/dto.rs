//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Account, AccountId, Category, CategoryId, CategoryType, Operation, OperationId, OperationType,
};

// ─────────────────────────────────────────────────────────────────────────────
// Account DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    /// Name of the account holder
    pub name: String,
}

/// Snapshot of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    /// Unique account identifier
    pub id: AccountId,
    /// Name of the account holder
    pub name: String,
    /// Current balance in minor units
    pub balance: i64,
    pub blocked: bool,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            balance: account.balance,
            blocked: account.blocked,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Category DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a category.
///
/// The type is kept as text so an empty or unknown value is reported as a
/// validation error rather than a decoding failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(rename = "type")]
    pub category_type: String,
    pub name: String,
}

/// Snapshot of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            category_type: category.category_type,
            name: category.name,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Operation DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to apply an income or outcome operation to an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyOperationRequest {
    /// Target account ID
    pub account_id: AccountId,
    /// Amount in minor units; must be positive
    pub amount: i64,
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    /// Optional free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit category; when absent the default one for the type is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// Request to move money between two accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Source account ID
    pub from_account_id: AccountId,
    /// Destination account ID
    pub to_account_id: AccountId,
    /// Amount to transfer in minor units
    pub amount: i64,
}

/// Snapshot of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResponse {
    pub id: OperationId,
    pub account_id: AccountId,
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub amount: i64,
    pub time: DateTime<Utc>,
    pub description: String,
    pub category_id: Option<CategoryId>,
}

impl From<Operation> for OperationResponse {
    fn from(operation: Operation) -> Self {
        Self {
            id: operation.id,
            account_id: operation.account_id,
            operation_type: operation.operation_type,
            amount: operation.amount.value(),
            time: operation.time,
            description: operation.description,
            category_id: operation.category_id,
        }
    }
}

/// Result of applying a single operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyOperationResponse {
    pub account: AccountResponse,
    pub operation: OperationResponse,
}

/// Result of a transfer: both accounts and both legs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    pub from_account: AccountResponse,
    pub to_account: AccountResponse,
    pub outcome_operation: OperationResponse,
    pub income_operation: OperationResponse,
}
