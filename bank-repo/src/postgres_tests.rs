//! PostgreSQL repository integration tests.
//!
//! These need a live server: `DATABASE_URL=postgres://... cargo test -- --ignored`.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use bank_hex::{Bank, Policies};
    use bank_types::{
        AccountId, ApplyOperationRequest, CreateAccountRequest, CreateCategoryRequest,
        OperationType, TransferRequest,
    };

    use crate::PostgresRepo;

    async fn setup_bank() -> Option<Bank<PostgresRepo>> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping");
            return None;
        };
        let bank = Bank::new(PostgresRepo::new(&url).await.unwrap(), Policies::default());
        for category_type in ["income", "outcome"] {
            bank.categories
                .create(CreateCategoryRequest {
                    category_type: category_type.into(),
                    name: format!("{category_type} {}", Uuid::new_v4()),
                })
                .await
                .unwrap();
        }
        Some(bank)
    }

    async fn funded_account(bank: &Bank<PostgresRepo>, amount: i64) -> AccountId {
        let id = bank
            .accounts
            .create(CreateAccountRequest {
                name: format!("Shared {}", Uuid::new_v4()),
            })
            .await
            .unwrap()
            .id;
        if amount > 0 {
            bank.operations
                .apply(request(id, OperationType::Income, amount))
                .await
                .unwrap();
        }
        id
    }

    fn request(
        account_id: AccountId,
        operation_type: OperationType,
        amount: i64,
    ) -> ApplyOperationRequest {
        ApplyOperationRequest {
            account_id,
            amount,
            operation_type,
            description: None,
            category_id: None,
        }
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_pg_concurrent_outcomes_never_overdraw() {
        let Some(bank) = setup_bank().await else {
            return;
        };
        let bank = Arc::new(bank);
        let id = funded_account(&bank, 100).await;

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let bank = bank.clone();
                tokio::spawn(async move {
                    bank.operations
                        .apply(request(id, OperationType::Outcome, 30))
                        .await
                })
            })
            .collect();

        let mut succeeded = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                succeeded += 1;
            }
        }

        assert_eq!(succeeded, 3);
        assert_eq!(bank.accounts.get(id).await.unwrap().balance, 10);
        assert_eq!(
            bank.operations.list_for_account(id).await.unwrap().len(),
            4
        );
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_pg_opposing_transfers_conserve_money() {
        let Some(bank) = setup_bank().await else {
            return;
        };
        let bank = Arc::new(bank);
        let a = funded_account(&bank, 500).await;
        let b = funded_account(&bank, 500).await;

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let bank = bank.clone();
                let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
                tokio::spawn(async move {
                    bank.operations
                        .transfer(TransferRequest {
                            from_account_id: from,
                            to_account_id: to,
                            amount: 10,
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let balance_a = bank.accounts.get(a).await.unwrap().balance;
        let balance_b = bank.accounts.get(b).await.unwrap().balance;
        assert_eq!(balance_a, 500);
        assert_eq!(balance_b, 500);
    }
}
