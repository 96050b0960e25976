//! Caller identity extractor
//!
//! Authentication is handled by the gateway in front of this server; it
//! verifies credentials and injects `x-actor-id` / `x-actor-role` /
//! `x-actor-name` headers. The core only authorizes: every role gate lives
//! in the actions and services, keyed off the [`Actor`] extracted here.

use http::request::Parts;
use shared::AppError;
use shared::models::{Actor, Role};
use std::str::FromStr;

/// Authenticated caller identity, extracted from gateway headers
pub struct Identity(pub Actor);

impl<S> axum::extract::FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, "x-actor-id")?
            .parse::<u64>()
            .map_err(|_| AppError::not_authenticated())?;
        let role = Role::from_str(header(parts, "x-actor-role")?)
            .map_err(|_| AppError::not_authenticated())?;
        let name = parts
            .headers
            .get("x-actor-name")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        Ok(Identity(Actor { id, name, role }))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::not_authenticated)
}
