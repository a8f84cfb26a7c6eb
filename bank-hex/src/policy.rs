//! Business policies the services are configured with.

use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
#[error("Unknown {kind} policy {value:?}, expected one of: {expected}")]
pub struct UnknownPolicy {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Whether an account must be empty before it can be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Deleting an account with a non-zero balance fails with
    /// `NonZeroBalance`.
    #[default]
    RequireZeroBalance,
    /// Accounts are deleted regardless of balance.
    AllowAnyBalance,
}

impl FromStr for DeletePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "require-zero-balance" => Ok(DeletePolicy::RequireZeroBalance),
            "allow-any-balance" => Ok(DeletePolicy::AllowAnyBalance),
            other => Err(UnknownPolicy {
                kind: "delete",
                value: other.to_string(),
                expected: "require-zero-balance, allow-any-balance",
            }),
        }
    }
}

/// What to do when an operation is applied without an explicit category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryPolicy {
    /// Attach the default category of the resolved type; fail the whole
    /// operation if there is none.
    #[default]
    RequireDefault,
    /// Leave the operation uncategorized.
    Skip,
}

impl FromStr for CategoryPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "require-default" => Ok(CategoryPolicy::RequireDefault),
            "skip" => Ok(CategoryPolicy::Skip),
            other => Err(UnknownPolicy {
                kind: "category",
                value: other.to_string(),
                expected: "require-default, skip",
            }),
        }
    }
}

/// Policy bundle handed to [`Bank::new`](crate::Bank::new).
#[derive(Debug, Clone, Copy, Default)]
pub struct Policies {
    pub delete: DeletePolicy,
    pub category: CategoryPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policies() {
        assert_eq!(
            "allow-any-balance".parse::<DeletePolicy>().unwrap(),
            DeletePolicy::AllowAnyBalance
        );
        assert_eq!(
            "skip".parse::<CategoryPolicy>().unwrap(),
            CategoryPolicy::Skip
        );
        let err = "sometimes".parse::<DeletePolicy>().unwrap_err();
        assert!(err.to_string().contains("sometimes"));
    }

    #[test]
    fn test_defaults_are_strict() {
        let policies = Policies::default();
        assert_eq!(policies.delete, DeletePolicy::RequireZeroBalance);
        assert_eq!(policies.category, CategoryPolicy::RequireDefault);
    }
}
