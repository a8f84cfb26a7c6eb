//! Database row types and their conversion into domain values.
//!
//! SQLite stores ids and timestamps as text, PostgreSQL uses native `UUID`
//! and `TIMESTAMPTZ`, so each backend gets its own row structs.

use bank_types::{Amount, CategoryType, OperationType, RepoError};

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_category_type(s: &str) -> Result<CategoryType, RepoError> {
    s.parse()
        .map_err(|_| RepoError::Database(format!("Unknown category type: {}", s)))
}

pub fn parse_operation_type(s: &str) -> Result<OperationType, RepoError> {
    s.parse()
        .map_err(|_| RepoError::Database(format!("Unknown operation type: {}", s)))
}

pub fn parse_amount(value: i64) -> Result<Amount, RepoError> {
    Amount::new(value).map_err(|e| RepoError::Database(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL rows
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "postgres")]
pub mod pg {
    use chrono::{DateTime, Utc};
    use sqlx::FromRow;
    use uuid::Uuid;

    use bank_types::{
        Account, AccountId, Category, CategoryId, Operation, OperationId, RepoError,
    };

    use super::{parse_amount, parse_category_type, parse_operation_type};

    /// Account row from database.
    #[derive(FromRow)]
    pub struct DbAccount {
        pub id: Uuid,
        pub name: String,
        pub balance: i64,
        pub blocked: bool,
        pub created_at: DateTime<Utc>,
    }

    impl DbAccount {
        pub fn into_domain(self) -> Account {
            Account::from_parts(
                AccountId::from_uuid(self.id),
                self.name,
                self.balance,
                self.blocked,
                self.created_at,
            )
        }
    }

    /// Category row from database.
    #[derive(FromRow)]
    pub struct DbCategory {
        pub id: Uuid,
        pub category_type: String,
        pub name: String,
        pub created_at: DateTime<Utc>,
    }

    impl DbCategory {
        pub fn into_domain(self) -> Result<Category, RepoError> {
            Ok(Category::from_parts(
                CategoryId::from_uuid(self.id),
                parse_category_type(&self.category_type)?,
                self.name,
                self.created_at,
            ))
        }
    }

    /// Operation row from database.
    #[derive(FromRow)]
    pub struct DbOperation {
        pub id: Uuid,
        pub account_id: Uuid,
        pub operation_type: String,
        pub amount: i64,
        pub time: DateTime<Utc>,
        pub description: String,
        pub category_id: Option<Uuid>,
    }

    impl DbOperation {
        pub fn into_domain(self) -> Result<Operation, RepoError> {
            Ok(Operation::from_parts(
                OperationId::from_uuid(self.id),
                AccountId::from_uuid(self.account_id),
                parse_operation_type(&self.operation_type)?,
                parse_amount(self.amount)?,
                self.time,
                self.description,
                self.category_id.map(CategoryId::from_uuid),
            ))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite rows
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
pub mod lite {
    use chrono::{DateTime, SecondsFormat, Utc};
    use sqlx::FromRow;
    use uuid::Uuid;

    use bank_types::{
        Account, AccountId, Category, CategoryId, Operation, OperationId, RepoError,
    };

    use super::{parse_amount, parse_category_type, parse_operation_type};

    /// Fixed-width RFC 3339 so stored timestamps order the same as text.
    pub fn format_time(dt: DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn parse_time(s: &str) -> Result<DateTime<Utc>, RepoError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RepoError::Database(e.to_string()))
    }

    pub fn parse_uuid(s: &str) -> Result<Uuid, RepoError> {
        Uuid::parse_str(s).map_err(|e| RepoError::Database(e.to_string()))
    }

    /// Account row from database.
    #[derive(FromRow)]
    pub struct DbAccount {
        pub id: String,
        pub name: String,
        pub balance: i64,
        pub blocked: bool,
        pub created_at: String,
    }

    impl DbAccount {
        pub fn into_domain(self) -> Result<Account, RepoError> {
            Ok(Account::from_parts(
                AccountId::from_uuid(parse_uuid(&self.id)?),
                self.name,
                self.balance,
                self.blocked,
                parse_time(&self.created_at)?,
            ))
        }
    }

    /// Category row from database.
    #[derive(FromRow)]
    pub struct DbCategory {
        pub id: String,
        pub category_type: String,
        pub name: String,
        pub created_at: String,
    }

    impl DbCategory {
        pub fn into_domain(self) -> Result<Category, RepoError> {
            Ok(Category::from_parts(
                CategoryId::from_uuid(parse_uuid(&self.id)?),
                parse_category_type(&self.category_type)?,
                self.name,
                parse_time(&self.created_at)?,
            ))
        }
    }

    /// Operation row from database.
    #[derive(FromRow)]
    pub struct DbOperation {
        pub id: String,
        pub account_id: String,
        pub operation_type: String,
        pub amount: i64,
        pub time: String,
        pub description: String,
        pub category_id: Option<String>,
    }

    impl DbOperation {
        pub fn into_domain(self) -> Result<Operation, RepoError> {
            let category_id = self
                .category_id
                .as_deref()
                .map(parse_uuid)
                .transpose()?
                .map(CategoryId::from_uuid);

            Ok(Operation::from_parts(
                OperationId::from_uuid(parse_uuid(&self.id)?),
                AccountId::from_uuid(parse_uuid(&self.account_id)?),
                parse_operation_type(&self.operation_type)?,
                parse_amount(self.amount)?,
                parse_time(&self.time)?,
                self.description,
                category_id,
            ))
        }
    }
}
