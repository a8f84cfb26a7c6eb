//! Error types for the bank accounting service.

/// Domain-level errors (business rule violations).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Account is already blocked")]
    AlreadyBlocked,

    #[error("Account is already unblocked")]
    AlreadyUnblocked,

    #[error("Operation is already applied")]
    AlreadyApplied,

    #[error("Account is blocked")]
    AccountBlocked,

    #[error("Not enough funds: available {available}, requested {requested}")]
    InsufficientFunds { available: i64, requested: i64 },

    #[error("Cannot delete account with non-zero balance {0}")]
    NonZeroBalance(i64),

    #[error("Cannot resolve category for operation type {0:?}")]
    CannotResolveCategory(String),
}

/// Coarse classification of a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainErrorKind {
    /// Malformed input (empty name, non-positive amount, ...).
    Validation,
    /// The entity is in a state that forbids the transition.
    State,
    /// The closed operation-type domain was violated.
    Resolution,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::ValidationError(msg.into())
    }

    pub fn kind(&self) -> DomainErrorKind {
        match self {
            DomainError::ValidationError(_) => DomainErrorKind::Validation,
            DomainError::AlreadyBlocked
            | DomainError::AlreadyUnblocked
            | DomainError::AlreadyApplied
            | DomainError::AccountBlocked
            | DomainError::InsufficientFunds { .. }
            | DomainError::NonZeroBalance(_) => DomainErrorKind::State,
            DomainError::CannotResolveCategory(_) => DomainErrorKind::Resolution,
        }
    }
}

/// Repository-level errors (data access failures).
///
/// Kept apart from [`DomainError`]: adapters never run business rules.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Application-level errors returned by the orchestration services.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Domain errors pass through unchanged.
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Infrastructure {
        context: String,
        #[source]
        source: RepoError,
    },
}

impl AppError {
    /// Returns the wrapped domain error, if any.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            AppError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Adds context to repository results on their way up to the service boundary.
pub trait RepoResultExt<T> {
    /// Maps `NotFound` to [`AppError::NotFound`] naming `what`, and wraps any
    /// other failure as infrastructure with `what` as context.
    fn lookup(self, what: impl std::fmt::Display) -> Result<T, AppError>;

    /// Wraps a failure as infrastructure with the given context.
    fn context(self, context: &str) -> Result<T, AppError>;
}

impl<T> RepoResultExt<T> for Result<T, RepoError> {
    fn lookup(self, what: impl std::fmt::Display) -> Result<T, AppError> {
        self.map_err(|e| match e {
            RepoError::NotFound => AppError::NotFound(what.to_string()),
            other => AppError::Infrastructure {
                context: format!("Failed to load {}", what),
                source: other,
            },
        })
    }

    fn context(self, context: &str) -> Result<T, AppError> {
        self.map_err(|source| AppError::Infrastructure {
            context: context.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            DomainError::validation("empty name").kind(),
            DomainErrorKind::Validation
        );
        assert_eq!(DomainError::AccountBlocked.kind(), DomainErrorKind::State);
        assert_eq!(
            DomainError::CannotResolveCategory("x".into()).kind(),
            DomainErrorKind::Resolution
        );
    }

    #[test]
    fn test_lookup_maps_not_found() {
        let res: Result<(), RepoError> = Err(RepoError::NotFound);
        let err = res.lookup("Account 42").unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref what) if what == "Account 42"));
    }

    #[test]
    fn test_context_wraps_database_error() {
        let res: Result<(), RepoError> = Err(RepoError::Database("boom".into()));
        let err = res.context("Failed to update account").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to update account: Database error: boom"
        );
    }

    #[test]
    fn test_as_domain() {
        let err: AppError = DomainError::AccountBlocked.into();
        assert_eq!(err.as_domain(), Some(&DomainError::AccountBlocked));

        let res: Result<(), RepoError> = Err(RepoError::NotFound);
        assert_eq!(res.lookup("Account 42").unwrap_err().as_domain(), None);
    }
}
