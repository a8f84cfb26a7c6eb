//! Category domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for a Category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(Uuid);

impl CategoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CategoryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Kind of money movement a category classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Outcome,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Outcome => "outcome",
        }
    }
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(CategoryType::Income),
            "outcome" => Ok(CategoryType::Outcome),
            "" => Err(DomainError::validation("Category type cannot be empty")),
            other => Err(DomainError::validation(format!(
                "Unknown category type: {}",
                other
            ))),
        }
    }
}

/// A classification label attachable to operations.
///
/// Only the name can change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub category_type: CategoryType,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category.
    ///
    /// # Validation
    /// - Name cannot be empty
    pub fn new(
        category_type: CategoryType,
        name: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_name(&name)?;

        Ok(Self {
            id: CategoryId::new(),
            category_type,
            name,
            created_at,
        })
    }

    /// Reconstructs a category from database fields.
    pub fn from_parts(
        id: CategoryId,
        category_type: CategoryType,
        name: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            category_type,
            name,
            created_at,
        }
    }

    pub fn rename(&mut self, name: String) -> Result<(), DomainError> {
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Category name cannot be empty"));
    }
    Ok(())
}
