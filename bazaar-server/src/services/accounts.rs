//! Account service
//!
//! Creates accounts with their role tag and opening wallet balance.
//! Authentication lives upstream; this service only manages the rows the
//! wallet ledger operates on.

use crate::orders::money;
use crate::storage::{ACCOUNT_ID_COUNTER, ACCOUNTS_TABLE, Storage};
use crate::utils::now_millis;
use crate::wallet;
use redb::ReadableTable;
use shared::error::ErrorCode;
use shared::models::{Account, AccountCreate};
use shared::{AppError, AppResult};
use tracing::info;

/// Account administration service
#[derive(Clone)]
pub struct AccountService {
    storage: Storage,
    /// Opening balance applied when a create payload does not specify one
    default_opening_balance: f64,
}

impl AccountService {
    pub fn new(storage: Storage, default_opening_balance: f64) -> Self {
        Self {
            storage,
            default_opening_balance,
        }
    }

    /// Create an account with its opening wallet balance
    pub fn create_account(&self, payload: AccountCreate) -> AppResult<Account> {
        if payload.name.trim().is_empty() {
            return Err(AppError::validation("account name must not be empty"));
        }
        let balance = payload
            .opening_balance
            .unwrap_or(self.default_opening_balance);
        if !balance.is_finite() || balance < 0.0 {
            return Err(AppError::validation(
                "opening balance must be a non-negative number",
            ));
        }

        let txn = self.storage.begin_write()?;
        let id = self.storage.next_id(&txn, ACCOUNT_ID_COUNTER)?;
        let now = now_millis();
        let account = Account {
            id,
            name: payload.name,
            role: payload.role,
            balance: money::round_money(balance),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        wallet::put(&txn, &account).map_err(AppError::from)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;

        info!(account_id = id, role = %account.role, "Account created");
        Ok(account)
    }

    /// Get an account (including its wallet balance)
    pub fn get_account(&self, account_id: u64) -> AppResult<Account> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn
            .open_table(ACCOUNTS_TABLE)
            .map_err(|e| AppError::database(e.to_string()))?;
        let guard = table
            .get(account_id)
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::AccountNotFound,
                    format!("Account not found: {}", account_id),
                )
            })?;
        serde_json::from_slice(guard.value()).map_err(|e| AppError::database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;

    fn service(default_balance: f64) -> AccountService {
        AccountService::new(Storage::open_in_memory().unwrap(), default_balance)
    }

    #[test]
    fn test_create_account_with_default_balance() {
        let accounts = service(100.0);
        let account = accounts
            .create_account(AccountCreate {
                name: "Alice".to_string(),
                role: Role::Consumer,
                opening_balance: None,
            })
            .unwrap();

        assert_eq!(account.id, 1);
        assert_eq!(account.balance, 100.0);
        assert_eq!(account.role, Role::Consumer);
        assert!(account.is_active);
    }

    #[test]
    fn test_create_account_with_explicit_balance() {
        let accounts = service(100.0);
        let account = accounts
            .create_account(AccountCreate {
                name: "Supplier Co".to_string(),
                role: Role::Supplier,
                opening_balance: Some(0.0),
            })
            .unwrap();

        assert_eq!(account.balance, 0.0);
    }

    #[test]
    fn test_create_account_rejects_negative_balance() {
        let accounts = service(0.0);
        let result = accounts.create_account(AccountCreate {
            name: "Alice".to_string(),
            role: Role::Consumer,
            opening_balance: Some(-5.0),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_get_missing_account() {
        let accounts = service(0.0);
        let err = accounts.get_account(404).unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountNotFound);
    }
}
