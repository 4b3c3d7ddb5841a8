// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - token lifecycle and the fetch pipeline.

pub mod activities;
pub mod authorization;
pub mod details;
pub mod export;
pub mod normalize;
pub mod operator;
pub mod strava;
pub mod token_manager;
pub mod token_store;
pub mod transport;

pub use activities::ActivityFetcher;
pub use authorization::{AuthorizationFlow, CallbackListener, CallbackOutcome, Grant, GrantSource};
pub use details::{DetailBatch, DetailFetcher};
pub use operator::{BrowserLauncher, ConsoleInput, OperatorInput, SystemBrowser};
pub use strava::StravaClient;
pub use token_manager::TokenManager;
pub use token_store::TokenStore;
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
