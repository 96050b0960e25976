//! Account Model
//!
//! Accounts use a flat role tag rather than a type hierarchy: a consumer,
//! supplier, or admin is the same record with a different `role` value.
//! The wallet balance is an attribute of the account and is only ever
//! mutated through the wallet ledger primitives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Consumer,
    Supplier,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Consumer => "CONSUMER",
            Role::Supplier => "SUPPLIER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CONSUMER" => Ok(Role::Consumer),
            "SUPPLIER" => Ok(Role::Supplier),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Authenticated caller identity
///
/// Produced by the upstream auth gateway before a request reaches the core;
/// every role-gated operation receives one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub id: u64,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: u64, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }
}

/// Account entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: u64,
    pub name: String,
    pub role: Role,
    /// Wallet balance, non-negative, 2 decimal places
    pub balance: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create account payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreate {
    pub name: String,
    pub role: Role,
    /// Opening wallet balance; defaults to the configured starting balance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_balance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Consumer, Role::Supplier, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_from_str_case_insensitive() {
        assert_eq!(Role::from_str("consumer").unwrap(), Role::Consumer);
        assert_eq!(Role::from_str("Admin").unwrap(), Role::Admin);
        assert!(Role::from_str("operator").is_err());
    }

    #[test]
    fn test_role_serialize() {
        let json = serde_json::to_string(&Role::Supplier).unwrap();
        assert_eq!(json, "\"SUPPLIER\"");
    }
}
