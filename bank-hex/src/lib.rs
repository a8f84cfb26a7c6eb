//! # Bank Hex
//!
//! Application service layer for the bank accounting service.
//!
//! ## Architecture
//!
//! - `service/` - Application services (account, category, operation)
//! - `policy/` - Business policies the services are configured with
//!
//! The services are generic over `U: UnitOfWork`, allowing
//! different storage adapters to be injected.

pub mod policy;
pub mod service;


pub use policy::{CategoryPolicy, DeletePolicy, Policies};
pub use service::{AccountService, Bank, CategoryService, OperationService};
