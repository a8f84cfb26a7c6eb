//! Bank CLI
//!
//! Command-line interface for the bank accounting service. Talks to the
//! database directly through the repository adapter selected at build time.

mod config;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use bank_hex::Bank;
use bank_repo::build_repo;
use bank_types::{
    AccountId, ApplyOperationRequest, CategoryId, CreateAccountRequest, CreateCategoryRequest,
    OperationId, OperationType, TransferRequest, UnitOfWork,
};

use config::Config;

#[derive(Parser)]
#[command(name = "bankcli")]
#[command(author, version, about = "Bank accounts, categories and operations", long_about = None)]
struct Cli {
    /// Database connection URL (falls back to PG_CONN_STRING)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account operations
    Account {
        #[command(subcommand)]
        action: AccountCommands,
    },
    /// Category operations
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Income, outcome and transfer operations
    Operation {
        #[command(subcommand)]
        action: OperationCommands,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Get account details
    Get {
        /// Account ID (UUID)
        #[arg(long)]
        id: String,
    },
    /// List all accounts
    List,
    /// Create a new account with zero balance
    Create {
        /// Account name
        #[arg(long)]
        name: String,
    },
    /// Block an account against new operations
    Block {
        #[arg(long)]
        id: String,
    },
    /// Unblock a blocked account
    Unblock {
        #[arg(long)]
        id: String,
    },
    /// Delete an account
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Get category details
    Get {
        #[arg(long)]
        id: String,
    },
    /// List all categories
    List,
    /// Create a new category
    Create {
        /// Category type (income, outcome)
        #[arg(long = "type")]
        category_type: String,
        #[arg(long)]
        name: String,
    },
    /// Rename a category
    Rename {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
    },
    /// Delete a category
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Show the default category for an operation type
    Default {
        /// Operation type (income, outcome)
        #[arg(long)]
        operation_type: String,
    },
}

#[derive(Args)]
struct MovementArgs {
    #[arg(long)]
    account: String,
    /// Amount in minor units
    #[arg(long, allow_negative_numbers = true)]
    amount: i64,
    #[arg(long)]
    description: Option<String>,
    /// Category ID; the default category of the type is used when omitted
    #[arg(long)]
    category: Option<String>,
}

#[derive(Subcommand)]
enum OperationCommands {
    /// Get operation details
    Get {
        #[arg(long)]
        id: String,
    },
    /// List operations, optionally for one account
    List {
        #[arg(long)]
        account: Option<String>,
    },
    /// Credit an account
    Income(MovementArgs),
    /// Debit an account
    Outcome(MovementArgs),
    /// Transfer funds between accounts
    Transfer {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long, allow_negative_numbers = true)]
        amount: i64,
    },
    /// Attach a category to a recorded operation
    Categorize {
        #[arg(long)]
        id: String,
        #[arg(long)]
        category: String,
    },
}

fn parse_account_id(s: &str) -> Result<AccountId> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid account ID: {}", s))
}

fn parse_category_id(s: &str) -> Result<CategoryId> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid category ID: {}", s))
}

fn parse_operation_id(s: &str) -> Result<OperationId> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid operation ID: {}", s))
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn movement(operation_type: OperationType, args: MovementArgs) -> Result<ApplyOperationRequest> {
    Ok(ApplyOperationRequest {
        account_id: parse_account_id(&args.account)?,
        amount: args.amount,
        operation_type,
        description: args.description,
        category_id: args.category.as_deref().map(parse_category_id).transpose()?,
    })
}

async fn run<U: UnitOfWork>(bank: &Bank<U>, command: Commands) -> Result<()> {
    match command {
        Commands::Account { action } => match action {
            AccountCommands::Get { id } => {
                print(&bank.accounts.get(parse_account_id(&id)?).await?)?;
            }
            AccountCommands::List => {
                print(&bank.accounts.list().await?)?;
            }
            AccountCommands::Create { name } => {
                print(&bank.accounts.create(CreateAccountRequest { name }).await?)?;
            }
            AccountCommands::Block { id } => {
                print(&bank.accounts.block(parse_account_id(&id)?).await?)?;
            }
            AccountCommands::Unblock { id } => {
                print(&bank.accounts.unblock(parse_account_id(&id)?).await?)?;
            }
            AccountCommands::Delete { id } => {
                print(&bank.accounts.delete(parse_account_id(&id)?).await?)?;
            }
        },

        Commands::Category { action } => match action {
            CategoryCommands::Get { id } => {
                print(&bank.categories.get(parse_category_id(&id)?).await?)?;
            }
            CategoryCommands::List => {
                print(&bank.categories.list().await?)?;
            }
            CategoryCommands::Create {
                category_type,
                name,
            } => {
                let category = bank
                    .categories
                    .create(CreateCategoryRequest {
                        category_type,
                        name,
                    })
                    .await?;
                print(&category)?;
            }
            CategoryCommands::Rename { id, name } => {
                print(&bank.categories.rename(parse_category_id(&id)?, name).await?)?;
            }
            CategoryCommands::Delete { id } => {
                print(&bank.categories.delete(parse_category_id(&id)?).await?)?;
            }
            CategoryCommands::Default { operation_type } => {
                print(&bank.categories.default_for(&operation_type).await?)?;
            }
        },

        Commands::Operation { action } => match action {
            OperationCommands::Get { id } => {
                print(&bank.operations.get(parse_operation_id(&id)?).await?)?;
            }
            OperationCommands::List { account: None } => {
                print(&bank.operations.list().await?)?;
            }
            OperationCommands::List {
                account: Some(account),
            } => {
                let account_id = parse_account_id(&account)?;
                print(&bank.operations.list_for_account(account_id).await?)?;
            }
            OperationCommands::Income(args) => {
                let req = movement(OperationType::Income, args)?;
                print(&bank.operations.apply(req).await?)?;
            }
            OperationCommands::Outcome(args) => {
                let req = movement(OperationType::Outcome, args)?;
                print(&bank.operations.apply(req).await?)?;
            }
            OperationCommands::Transfer { from, to, amount } => {
                let req = TransferRequest {
                    from_account_id: parse_account_id(&from)?,
                    to_account_id: parse_account_id(&to)?,
                    amount,
                };
                print(&bank.operations.transfer(req).await?)?;
            }
            OperationCommands::Categorize { id, category } => {
                let operation = bank
                    .operations
                    .categorize(parse_operation_id(&id)?, parse_category_id(&category)?)
                    .await?;
                print(&operation)?;
            }
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine-readable JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,bank_hex=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env(cli.database_url)?;
    tracing::debug!(policies = ?config.policies, "configuration loaded");

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;
    let bank = Bank::new(repo, config.policies);

    run(&bank, cli.command).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_transfer() {
        let cli = Cli::try_parse_from([
            "bankcli",
            "--database-url",
            "sqlite::memory:",
            "operation",
            "transfer",
            "--from",
            "a",
            "--to",
            "b",
            "--amount",
            "400",
        ])
        .unwrap();

        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        assert!(matches!(
            cli.command,
            Commands::Operation {
                action: OperationCommands::Transfer { amount: 400, .. }
            }
        ));
    }

    #[test]
    fn test_negative_amount_is_parsed() {
        let cli = Cli::try_parse_from([
            "bankcli",
            "operation",
            "outcome",
            "--account",
            "a",
            "--amount",
            "-5",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Operation {
                action: OperationCommands::Outcome(MovementArgs { amount: -5, .. })
            }
        ));

        let cli = Cli::try_parse_from([
            "bankcli", "operation", "transfer", "--from", "a", "--to", "b", "--amount", "-1",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Operation {
                action: OperationCommands::Transfer { amount: -1, .. }
            }
        ));
    }

    #[test]
    fn test_movement_rejects_bad_ids() {
        let args = MovementArgs {
            account: "not-a-uuid".into(),
            amount: 10,
            description: None,
            category: None,
        };
        let err = movement(OperationType::Income, args).unwrap_err();
        assert_eq!(err.to_string(), "Invalid account ID: not-a-uuid");
    }
}
