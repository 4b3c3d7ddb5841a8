// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth credential record persisted between runs.

use serde::{Deserialize, Serialize};

/// Refresh when the access token expires within this many seconds.
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 3600;

/// Credential record as stored on disk.
///
/// The token endpoint returns more than this (athlete, token_type, ...), but
/// only these three fields are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds
    pub expires_at: i64,
}

impl Credentials {
    /// Whether the access token is expired or expires within the refresh margin.
    ///
    /// The boundary itself (`now == expires_at - margin`) refreshes.
    pub fn needs_refresh(&self, now: i64) -> bool {
        now >= self.expires_at - TOKEN_REFRESH_MARGIN_SECS
    }
}

/// Shorten a secret for logging: first and last four characters.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
