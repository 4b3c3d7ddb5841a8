// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod credentials;

pub use activity::{ActivityDetail, ActivitySummary, DisplayActivity};
pub use credentials::Credentials;
