//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod repository;
mod unit_of_work;

pub use repository::{AccountRepository, CategoryRepository, OperationRepository};
pub use unit_of_work::{Scope, UnitOfWork};
