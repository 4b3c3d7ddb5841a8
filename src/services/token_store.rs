// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed storage for the OAuth credential record.

use crate::error::{AppError, Result};
use crate::models::Credentials;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Loads and saves the credential record as a single JSON object.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored credentials.
    ///
    /// A missing file is `Ok(None)`. A file that cannot be read, or does not
    /// hold a complete record, is logged and also treated as absent, which
    /// sends the caller through a fresh authorization.
    pub fn load(&self) -> Result<Option<Credentials>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Cannot read credential file, treating as absent"
                );
                return Ok(None);
            }
        };

        match serde_json::from_str::<Credentials>(&contents) {
            Ok(credentials) => {
                tracing::debug!(path = %self.path.display(), "Loaded saved credentials");
                Ok(Some(credentials))
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable credential file"
                );
                Ok(None)
            }
        }
    }

    /// Overwrite the stored record.
    ///
    /// Written to a sibling temp file and renamed into place, so readers see
    /// either the old record or the new one.
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        let json = serde_json::to_string_pretty(credentials)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Serialize credentials: {}", e)))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        tracing::info!(path = %self.path.display(), "Credentials saved for the next run");
        Ok(())
    }
}
