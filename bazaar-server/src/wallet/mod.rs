//! Wallet Ledger
//!
//! Atomic balance primitives over the accounts table. Callers get `debit`
//! and `credit` only; both check and mutate inside the caller's write
//! transaction, so a payment debit commits or rolls back together with the
//! order transition it belongs to.
//!
//! A debit that would take the balance below zero fails with
//! `InsufficientFunds`; it never clamps. Balances are rounded to 2 decimal
//! places on every write and stay non-negative.

use crate::orders::money;
use crate::orders::traits::OrderError;
use crate::storage::ACCOUNTS_TABLE;
use crate::utils::now_millis;
use redb::{ReadableTable, WriteTransaction};
use shared::models::Account;

fn storage_err(err: impl std::fmt::Display) -> OrderError {
    OrderError::Storage(err.to_string())
}

/// Load an account row
pub fn get(txn: &WriteTransaction, account_id: u64) -> Result<Account, OrderError> {
    let table = txn.open_table(ACCOUNTS_TABLE).map_err(storage_err)?;
    let guard = table
        .get(account_id)
        .map_err(storage_err)?
        .ok_or(OrderError::AccountNotFound(account_id))?;
    serde_json::from_slice(guard.value()).map_err(storage_err)
}

/// Insert or overwrite an account row (account administration)
pub fn put(txn: &WriteTransaction, account: &Account) -> Result<(), OrderError> {
    let mut table = txn.open_table(ACCOUNTS_TABLE).map_err(storage_err)?;
    let bytes = serde_json::to_vec(account).map_err(storage_err)?;
    table
        .insert(account.id, bytes.as_slice())
        .map_err(storage_err)?;
    Ok(())
}

/// Atomically check and decrement a balance
///
/// Fails with `InsufficientFunds` when the balance does not cover the
/// amount; the row is untouched on failure.
pub fn debit(txn: &WriteTransaction, account_id: u64, amount: f64) -> Result<Account, OrderError> {
    money::validate_amount(amount)?;
    mutate(txn, account_id, |account| {
        if !money::is_sufficient(account.balance, amount) {
            return Err(OrderError::InsufficientFunds {
                account_id,
                required: amount,
                available: account.balance,
            });
        }
        let next = money::to_decimal(account.balance) - money::to_decimal(amount);
        // Rounding dust within tolerance clamps to exactly zero
        account.balance = money::to_f64(next).max(0.0);
        Ok(())
    })
}

/// Atomically increment a balance
pub fn credit(txn: &WriteTransaction, account_id: u64, amount: f64) -> Result<Account, OrderError> {
    money::validate_amount(amount)?;
    mutate(txn, account_id, |account| {
        let next = money::to_decimal(account.balance) + money::to_decimal(amount);
        account.balance = money::to_f64(next);
        Ok(())
    })
}

/// Load-mutate-store under the caller's transaction
fn mutate(
    txn: &WriteTransaction,
    account_id: u64,
    f: impl FnOnce(&mut Account) -> Result<(), OrderError>,
) -> Result<Account, OrderError> {
    let mut table = txn.open_table(ACCOUNTS_TABLE).map_err(storage_err)?;

    let mut account: Account = {
        let guard = table
            .get(account_id)
            .map_err(storage_err)?
            .ok_or(OrderError::AccountNotFound(account_id))?;
        serde_json::from_slice(guard.value()).map_err(storage_err)?
    };

    f(&mut account)?;
    account.updated_at = now_millis();

    let bytes = serde_json::to_vec(&account).map_err(storage_err)?;
    table
        .insert(account_id, bytes.as_slice())
        .map_err(storage_err)?;
    Ok(account)
}
