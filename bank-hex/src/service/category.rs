//! Category lifecycle use cases.

use std::sync::Arc;

use bank_types::{
    AppError, Category, CategoryId, CategoryRepository, CategoryResponse, CategoryType, Clock,
    CreateCategoryRequest, RepoResultExt, UnitOfWork, resolve_category_type,
};

use super::{begin, commit};

pub struct CategoryService<U: UnitOfWork> {
    store: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U: UnitOfWork> CategoryService<U> {
    pub fn new(store: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn get(&self, id: CategoryId) -> Result<CategoryResponse, AppError> {
        let mut scope = begin(&*self.store).await?;
        let category = scope
            .get_category(id)
            .await
            .lookup(format!("Category {}", id))?;
        commit(scope).await?;
        Ok(category.into())
    }

    pub async fn list(&self) -> Result<Vec<CategoryResponse>, AppError> {
        let mut scope = begin(&*self.store).await?;
        let categories = scope
            .list_categories()
            .await
            .context("Failed to list categories")?;
        commit(scope).await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// Creates a category. Empty or unknown types and empty names are
    /// validation errors.
    pub async fn create(&self, req: CreateCategoryRequest) -> Result<CategoryResponse, AppError> {
        let category_type: CategoryType = req.category_type.parse()?;
        let category = Category::new(category_type, req.name, self.clock.now())?;

        let mut scope = begin(&*self.store).await?;
        let category = scope
            .create_category(&category)
            .await
            .context("Failed to save category")?;
        commit(scope).await?;

        tracing::info!(category_id = %category.id, category_type = %category.category_type, "category created");
        Ok(category.into())
    }

    pub async fn rename(&self, id: CategoryId, name: String) -> Result<CategoryResponse, AppError> {
        let mut scope = begin(&*self.store).await?;
        let mut category = scope
            .get_category(id)
            .await
            .lookup(format!("Category {}", id))?;
        category.rename(name)?;
        let category = scope
            .update_category(&category)
            .await
            .lookup(format!("Category {}", id))?;
        commit(scope).await?;

        tracing::info!(category_id = %id, "category renamed");
        Ok(category.into())
    }

    /// Deletes a category. Operations keep their (now dangling) reference.
    pub async fn delete(&self, id: CategoryId) -> Result<CategoryResponse, AppError> {
        let mut scope = begin(&*self.store).await?;
        let category = scope
            .delete_category(id)
            .await
            .lookup(format!("Category {}", id))?;
        commit(scope).await?;

        tracing::info!(category_id = %id, "category deleted");
        Ok(category.into())
    }

    /// Returns the category operations of `operation_type` are attached to
    /// by default.
    pub async fn default_for(&self, operation_type: &str) -> Result<CategoryResponse, AppError> {
        let category_type = resolve_category_type(operation_type)?;

        let mut scope = begin(&*self.store).await?;
        let category = scope
            .get_category_by_type(category_type)
            .await
            .lookup(format!("Default {} category", category_type))?;
        commit(scope).await?;
        Ok(category.into())
    }
}
