//! # Bank Types
//!
//! Domain types and port traits for the bank accounting service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Account, Category, Operation) and the
//!   operation application algorithm
//! - `ports/` - Repository and transactional scope traits adapters implement
//! - `dto/` - Data Transfer Objects returned by the services
//! - `error/` - Domain, repository and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Account, AccountId, Amount, Category, CategoryId, CategoryType, Clock, Operation, OperationId,
    OperationType, SteppingClock, SystemClock, apply_operation, resolve_category_type,
};
pub use dto::*;
pub use error::{AppError, DomainError, DomainErrorKind, RepoError, RepoResultExt};
pub use ports::{AccountRepository, CategoryRepository, OperationRepository, Scope, UnitOfWork};
