//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

use bank_types::{
    Account, AccountId, AccountRepository, Category, CategoryId, CategoryRepository,
    CategoryType, Operation, OperationId, OperationRepository, RepoError, Scope, UnitOfWork,
};

use crate::types::lite::{DbAccount, DbCategory, DbOperation, format_time};
use crate::{db_error, tx_error};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
///
/// The pool holds a single connection: SQLite has no row locks, so scopes are
/// serialized by waiting for the connection. This also keeps `sqlite::memory:`
/// databases alive for the lifetime of the pool.
pub struct SqliteRepo {
    pool: SqlitePool,
}

async fn execute_migration(pool: &SqlitePool, sql: &str, name: &str) -> anyhow::Result<()> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        execute_migration(
            &pool,
            include_str!("../migrations/0001_create_tables.sql"),
            "0001",
        )
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl UnitOfWork for SqliteRepo {
    type Scope = SqliteScope;

    async fn begin(&self) -> Result<SqliteScope, RepoError> {
        let tx = self.pool.begin().await.map_err(tx_error)?;
        Ok(SqliteScope { tx })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scope
// ─────────────────────────────────────────────────────────────────────────────

/// One open SQLite transaction, holding the pool's only connection.
pub struct SqliteScope {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl Scope for SqliteScope {
    async fn commit(self) -> Result<(), RepoError> {
        self.tx.commit().await.map_err(tx_error)
    }

    async fn rollback(self) -> Result<(), RepoError> {
        self.tx.rollback().await.map_err(tx_error)
    }
}

#[async_trait]
impl AccountRepository for SqliteScope {
    async fn get_account(&mut self, id: AccountId) -> Result<Account, RepoError> {
        let row: Option<DbAccount> = sqlx::query_as(
            r#"SELECT id, name, balance, blocked, created_at FROM accounts WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn list_accounts(&mut self) -> Result<Vec<Account>, RepoError> {
        let rows: Vec<DbAccount> = sqlx::query_as(
            r#"SELECT id, name, balance, blocked, created_at FROM accounts ORDER BY created_at ASC, id ASC"#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(DbAccount::into_domain).collect()
    }

    async fn create_account(&mut self, account: &Account) -> Result<Account, RepoError> {
        sqlx::query(
            r#"INSERT INTO accounts (id, name, balance, blocked, created_at) VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(account.id.to_string())
        .bind(&account.name)
        .bind(account.balance)
        .bind(account.blocked)
        .bind(format_time(account.created_at))
        .execute(&mut *self.tx)
        .await
        .map_err(db_error)?;

        Ok(account.clone())
    }

    async fn update_account(&mut self, account: &Account) -> Result<Account, RepoError> {
        let result =
            sqlx::query(r#"UPDATE accounts SET name = ?, balance = ?, blocked = ? WHERE id = ?"#)
                .bind(&account.name)
                .bind(account.balance)
                .bind(account.blocked)
                .bind(account.id.to_string())
                .execute(&mut *self.tx)
                .await
                .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(account.clone())
    }

    async fn delete_account(&mut self, id: AccountId) -> Result<Account, RepoError> {
        let row: Option<DbAccount> = sqlx::query_as(
            r#"DELETE FROM accounts WHERE id = ? RETURNING id, name, balance, blocked, created_at"#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }
}

#[async_trait]
impl CategoryRepository for SqliteScope {
    async fn get_category(&mut self, id: CategoryId) -> Result<Category, RepoError> {
        let row: Option<DbCategory> = sqlx::query_as(
            r#"SELECT id, category_type, name, created_at FROM categories WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn get_category_by_type(
        &mut self,
        category_type: CategoryType,
    ) -> Result<Category, RepoError> {
        let row: Option<DbCategory> = sqlx::query_as(
            r#"SELECT id, category_type, name, created_at FROM categories
               WHERE category_type = ? ORDER BY created_at ASC, id ASC LIMIT 1"#,
        )
        .bind(category_type.as_str())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn list_categories(&mut self) -> Result<Vec<Category>, RepoError> {
        let rows: Vec<DbCategory> = sqlx::query_as(
            r#"SELECT id, category_type, name, created_at FROM categories ORDER BY created_at ASC, id ASC"#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(DbCategory::into_domain).collect()
    }

    async fn create_category(&mut self, category: &Category) -> Result<Category, RepoError> {
        sqlx::query(
            r#"INSERT INTO categories (id, category_type, name, created_at) VALUES (?, ?, ?, ?)"#,
        )
        .bind(category.id.to_string())
        .bind(category.category_type.as_str())
        .bind(&category.name)
        .bind(format_time(category.created_at))
        .execute(&mut *self.tx)
        .await
        .map_err(db_error)?;

        Ok(category.clone())
    }

    async fn update_category(&mut self, category: &Category) -> Result<Category, RepoError> {
        let result = sqlx::query(r#"UPDATE categories SET name = ? WHERE id = ?"#)
            .bind(&category.name)
            .bind(category.id.to_string())
            .execute(&mut *self.tx)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(category.clone())
    }

    async fn delete_category(&mut self, id: CategoryId) -> Result<Category, RepoError> {
        let row: Option<DbCategory> = sqlx::query_as(
            r#"DELETE FROM categories WHERE id = ? RETURNING id, category_type, name, created_at"#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }
}

#[async_trait]
impl OperationRepository for SqliteScope {
    async fn get_operation(&mut self, id: OperationId) -> Result<Operation, RepoError> {
        let row: Option<DbOperation> = sqlx::query_as(
            r#"SELECT id, account_id, operation_type, amount, time, description, category_id
               FROM operations WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn list_operations(&mut self) -> Result<Vec<Operation>, RepoError> {
        let rows: Vec<DbOperation> = sqlx::query_as(
            r#"SELECT id, account_id, operation_type, amount, time, description, category_id
               FROM operations ORDER BY time ASC, id ASC"#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(DbOperation::into_domain).collect()
    }

    async fn list_operations_for_account(
        &mut self,
        account_id: AccountId,
    ) -> Result<Vec<Operation>, RepoError> {
        let rows: Vec<DbOperation> = sqlx::query_as(
            r#"SELECT id, account_id, operation_type, amount, time, description, category_id
               FROM operations WHERE account_id = ? ORDER BY time ASC, id ASC"#,
        )
        .bind(account_id.to_string())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(DbOperation::into_domain).collect()
    }

    async fn create_operation(&mut self, operation: &Operation) -> Result<Operation, RepoError> {
        sqlx::query(
            r#"INSERT INTO operations (id, account_id, operation_type, amount, time, description, category_id)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(operation.id.to_string())
        .bind(operation.account_id.to_string())
        .bind(operation.operation_type.as_str())
        .bind(operation.amount.value())
        .bind(format_time(operation.time))
        .bind(&operation.description)
        .bind(operation.category_id.map(|id| id.to_string()))
        .execute(&mut *self.tx)
        .await
        .map_err(db_error)?;

        tracing::debug!(operation_id = %operation.id, "operation row inserted");
        Ok(operation.clone())
    }

    async fn update_operation(&mut self, operation: &Operation) -> Result<Operation, RepoError> {
        let result = sqlx::query(r#"UPDATE operations SET category_id = ? WHERE id = ?"#)
            .bind(operation.category_id.map(|id| id.to_string()))
            .bind(operation.id.to_string())
            .execute(&mut *self.tx)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(operation.clone())
    }

    async fn delete_operation(&mut self, id: OperationId) -> Result<Operation, RepoError> {
        let row: Option<DbOperation> = sqlx::query_as(
            r#"DELETE FROM operations WHERE id = ?
               RETURNING id, account_id, operation_type, amount, time, description, category_id"#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }
}
