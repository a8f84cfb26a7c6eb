//! Domain models for the bank accounting service.

pub mod account;
pub mod amount;
pub mod category;
pub mod clock;
pub mod operation;

pub use account::{Account, AccountId};
pub use amount::Amount;
pub use category::{Category, CategoryId, CategoryType};
pub use clock::{Clock, SteppingClock, SystemClock};
pub use operation::{
    Operation, OperationId, OperationType, apply_operation, resolve_category_type,
};
