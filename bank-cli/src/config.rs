//! Configuration loading from environment.

use std::env;

use bank_hex::{CategoryPolicy, DeletePolicy, Policies};

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub database_url: String,
    pub policies: Policies,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// `database_url` (from the command line) wins over `DATABASE_URL`, which
    /// wins over `PG_CONN_STRING`.
    pub fn from_env(database_url: Option<String>) -> anyhow::Result<Self> {
        Self::load(database_url, |key| env::var(key).ok())
    }

    fn load(
        database_url: Option<String>,
        var: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let database_url = database_url
            .or_else(|| var("DATABASE_URL"))
            .or_else(|| var("PG_CONN_STRING"))
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let delete = match var("BANK_DELETE_POLICY") {
            Some(value) => value.parse::<DeletePolicy>()?,
            None => DeletePolicy::default(),
        };
        let category = match var("BANK_CATEGORY_POLICY") {
            Some(value) => value.parse::<CategoryPolicy>()?,
            None => CategoryPolicy::default(),
        };

        Ok(Self {
            database_url,
            policies: Policies { delete, category },
        })
    }
}
