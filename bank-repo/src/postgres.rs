//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use bank_types::{
    Account, AccountId, AccountRepository, Category, CategoryId, CategoryRepository,
    CategoryType, Operation, OperationId, OperationRepository, RepoError, Scope, UnitOfWork,
};

use crate::types::pg::{DbAccount, DbCategory, DbOperation};
use crate::{db_error, tx_error};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository with row-level locking.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
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

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_tables_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl UnitOfWork for PostgresRepo {
    type Scope = PgScope;

    async fn begin(&self) -> Result<PgScope, RepoError> {
        let tx = self.pool.begin().await.map_err(tx_error)?;
        Ok(PgScope { tx })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scope
// ─────────────────────────────────────────────────────────────────────────────

/// One open PostgreSQL transaction.
///
/// Account reads take `FOR UPDATE` row locks, so two scopes touching the same
/// account serialize on it until the first one commits or rolls back.
pub struct PgScope {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Scope for PgScope {
    async fn commit(self) -> Result<(), RepoError> {
        self.tx.commit().await.map_err(tx_error)
    }

    async fn rollback(self) -> Result<(), RepoError> {
        self.tx.rollback().await.map_err(tx_error)
    }
}

#[async_trait]
impl AccountRepository for PgScope {
    async fn get_account(&mut self, id: AccountId) -> Result<Account, RepoError> {
        let row: Option<DbAccount> = sqlx::query_as(
            r#"SELECT id, name, balance, blocked, created_at FROM accounts WHERE id = $1 FOR UPDATE"#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error)?;

        row.map(DbAccount::into_domain).ok_or(RepoError::NotFound)
    }

    async fn list_accounts(&mut self) -> Result<Vec<Account>, RepoError> {
        let rows: Vec<DbAccount> = sqlx::query_as(
            r#"SELECT id, name, balance, blocked, created_at FROM accounts ORDER BY created_at ASC, id ASC"#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(DbAccount::into_domain).collect())
    }

    async fn create_account(&mut self, account: &Account) -> Result<Account, RepoError> {
        let row: DbAccount = sqlx::query_as(
            r#"INSERT INTO accounts (id, name, balance, blocked, created_at) VALUES ($1, $2, $3, $4, $5)
               RETURNING id, name, balance, blocked, created_at"#,
        )
        .bind(account.id.into_uuid())
        .bind(&account.name)
        .bind(account.balance)
        .bind(account.blocked)
        .bind(account.created_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error)?;

        Ok(row.into_domain())
    }

    async fn update_account(&mut self, account: &Account) -> Result<Account, RepoError> {
        let row: Option<DbAccount> = sqlx::query_as(
            r#"UPDATE accounts SET name = $2, balance = $3, blocked = $4 WHERE id = $1
               RETURNING id, name, balance, blocked, created_at"#,
        )
        .bind(account.id.into_uuid())
        .bind(&account.name)
        .bind(account.balance)
        .bind(account.blocked)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error)?;

        row.map(DbAccount::into_domain).ok_or(RepoError::NotFound)
    }

    async fn delete_account(&mut self, id: AccountId) -> Result<Account, RepoError> {
        let row: Option<DbAccount> = sqlx::query_as(
            r#"DELETE FROM accounts WHERE id = $1 RETURNING id, name, balance, blocked, created_at"#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error)?;

        row.map(DbAccount::into_domain).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CategoryRepository for PgScope {
    async fn get_category(&mut self, id: CategoryId) -> Result<Category, RepoError> {
        let row: Option<DbCategory> = sqlx::query_as(
            r#"SELECT id, category_type, name, created_at FROM categories WHERE id = $1"#,
        )
        .bind(id.into_uuid())
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
               WHERE category_type = $1 ORDER BY created_at ASC, id ASC LIMIT 1"#,
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
            r#"INSERT INTO categories (id, category_type, name, created_at) VALUES ($1, $2, $3, $4)"#,
        )
        .bind(category.id.into_uuid())
        .bind(category.category_type.as_str())
        .bind(&category.name)
        .bind(category.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(db_error)?;

        Ok(category.clone())
    }

    async fn update_category(&mut self, category: &Category) -> Result<Category, RepoError> {
        let result = sqlx::query(r#"UPDATE categories SET name = $2 WHERE id = $1"#)
            .bind(category.id.into_uuid())
            .bind(&category.name)
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
            r#"DELETE FROM categories WHERE id = $1 RETURNING id, category_type, name, created_at"#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }
}

#[async_trait]
impl OperationRepository for PgScope {
    async fn get_operation(&mut self, id: OperationId) -> Result<Operation, RepoError> {
        let row: Option<DbOperation> = sqlx::query_as(
            r#"SELECT id, account_id, operation_type, amount, time, description, category_id
               FROM operations WHERE id = $1"#,
        )
        .bind(id.into_uuid())
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
               FROM operations WHERE account_id = $1 ORDER BY time ASC, id ASC"#,
        )
        .bind(account_id.into_uuid())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(DbOperation::into_domain).collect()
    }

    async fn create_operation(&mut self, operation: &Operation) -> Result<Operation, RepoError> {
        sqlx::query(
            r#"INSERT INTO operations (id, account_id, operation_type, amount, time, description, category_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(operation.id.into_uuid())
        .bind(operation.account_id.into_uuid())
        .bind(operation.operation_type.as_str())
        .bind(operation.amount.value())
        .bind(operation.time)
        .bind(&operation.description)
        .bind(operation.category_id.map(CategoryId::into_uuid))
        .execute(&mut *self.tx)
        .await
        .map_err(db_error)?;

        tracing::debug!(operation_id = %operation.id, "operation row inserted");
        Ok(operation.clone())
    }

    async fn update_operation(&mut self, operation: &Operation) -> Result<Operation, RepoError> {
        let result = sqlx::query(r#"UPDATE operations SET category_id = $2 WHERE id = $1"#)
            .bind(operation.id.into_uuid())
            .bind(operation.category_id.map(CategoryId::into_uuid))
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
            r#"DELETE FROM operations WHERE id = $1
               RETURNING id, account_id, operation_type, amount, time, description, category_id"#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }
}
