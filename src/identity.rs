//! Identity resolution for report submission.
//!
//! Reports are attributed to whoever is signed in. Rather than reading a
//! shared "current user", the acting identity is resolved once per command
//! and handed to the workflow explicitly:
//!
//! 1. `--as <user>`: explicit per-command override
//! 2. `CAN_EYE_USER` env var: process/session level
//! 3. `user` in `~/.can-eye/config.toml`: global default
//!
//! No identity at all is not an error here; the workflow refuses to submit
//! without one.

use std::env;

use crate::config::Config;
use crate::model::UserId;

const USER_ENV: &str = "CAN_EYE_USER";

/// Resolve the acting user from the tiered resolution chain.
pub fn resolve_user(explicit: Option<&str>, config: &Config) -> Result<Option<UserId>, String> {
    resolve_from(explicit, env::var(USER_ENV).ok(), config.user.as_deref())
}

fn resolve_from(
    explicit: Option<&str>,
    from_env: Option<String>,
    from_config: Option<&str>,
) -> Result<Option<UserId>, String> {
    // 1. Explicit --as flag. A blank value is a mistake, not "no user".
    if let Some(id) = explicit {
        return UserId::new(id)
            .map(Some)
            .map_err(|e| format!("--as: {e}"));
    }

    // 2. Environment, then 3. config. Blank values fall through.
    let id = from_env
        .filter(|id| !id.trim().is_empty())
        .or_else(|| from_config.map(String::from))
        .filter(|id| !id.trim().is_empty());

    Ok(id.and_then(|id| UserId::new(id).ok()))
}
