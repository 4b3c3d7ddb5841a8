// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interactive OAuth authorization: obtain a grant code from the operator.
//!
//! Flow:
//! 1. LISTENING - bind a local listener for the redirect and open the browser
//! 2. DONE / FAILED - the redirect carried `code` / `error`
//! 3. TIMED_OUT - nothing arrived in time; the listener is shut down
//! 4. MANUAL - the operator pastes the redirect URL or the bare code

use crate::config::{Config, CALLBACK_PATH};
use crate::error::{AppError, Result};
use crate::services::operator::{BrowserLauncher, OperatorInput};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;

/// How long a shutting-down listener may drain open connections.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

const SUCCESS_PAGE: &str = "<h1>Authorization successful!</h1>\
    <p>You can close this window and return to the terminal.</p>";
const FAILURE_PAGE: &str = "<h1>Authorization failed</h1>\
    <p>You can close this window and check the terminal for details.</p>";
const MISSING_CODE_PAGE: &str = "<h1>Invalid callback</h1>\
    <p>No authorization code was received. Please try again.</p>";
const COMPLETED_PAGE: &str = "<h1>Already authorized</h1>\
    <p>This authorization attempt has already completed.</p>";

/// States of the authorization flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Listening,
    TimedOut,
    Manual,
    Done,
    Failed,
}

/// Where a grant code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantSource {
    Callback,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub code: String,
    pub source: GrantSource,
}

/// Terminal result delivered by the callback handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Code(String),
    Denied(String),
}

/// Single-use resolution slot shared by the handler and the timeout path.
/// Whoever takes the sender out first decides the outcome.
type OutcomeSlot = Arc<Mutex<Option<oneshot::Sender<CallbackOutcome>>>>;

fn take_sender(slot: &OutcomeSlot) -> Option<oneshot::Sender<CallbackOutcome>> {
    slot.lock().ok().and_then(|mut sender| sender.take())
}

#[derive(Deserialize)]
struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Redirect receiver: an axum router plus the receiving end of its outcome.
pub struct CallbackListener {
    slot: OutcomeSlot,
    outcome: oneshot::Receiver<CallbackOutcome>,
}

impl CallbackListener {
    pub fn new() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            slot: Arc::new(Mutex::new(Some(tx))),
            outcome: rx,
        }
    }

    /// Router serving the callback path.
    pub fn router(&self) -> Router {
        Router::new()
            .route(CALLBACK_PATH, get(handle_callback))
            .layer(TraceLayer::new_for_http())
            .with_state(self.slot.clone())
    }

    /// Wait up to `timeout` for a terminal callback.
    ///
    /// `None` means the timer won. Once it fires, the slot is claimed so any
    /// later request is answered with the "already completed" page; if a
    /// callback claimed it first, its outcome is used instead.
    pub async fn wait(self, timeout: Duration) -> Option<CallbackOutcome> {
        let CallbackListener { slot, mut outcome } = self;

        match tokio::time::timeout(timeout, &mut outcome).await {
            Ok(received) => received.ok(),
            Err(_) => {
                if take_sender(&slot).is_some() {
                    None
                } else {
                    outcome.await.ok()
                }
            }
        }
    }
}

impl Default for CallbackListener {
    fn default() -> Self {
        Self::new()
    }
}

async fn handle_callback(
    State(slot): State<OutcomeSlot>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, Html<&'static str>) {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "Authorization denied on Strava");
        return resolve(&slot, CallbackOutcome::Denied(error), FAILURE_PAGE);
    }

    match params.code.filter(|c| !c.is_empty()) {
        Some(code) => resolve(&slot, CallbackOutcome::Code(code), SUCCESS_PAGE),
        None => {
            // Leave the listener up so the operator can retry from the browser
            tracing::warn!("Callback received without an authorization code");
            (StatusCode::BAD_REQUEST, Html(MISSING_CODE_PAGE))
        }
    }
}

fn resolve(
    slot: &OutcomeSlot,
    outcome: CallbackOutcome,
    page: &'static str,
) -> (StatusCode, Html<&'static str>) {
    match take_sender(slot) {
        Some(sender) => {
            let _ = sender.send(outcome);
            (StatusCode::OK, Html(page))
        }
        None => (StatusCode::GONE, Html(COMPLETED_PAGE)),
    }
}

/// Obtains an authorization grant code, via browser redirect or operator input.
pub struct AuthorizationFlow {
    authorize_url: String,
    port: u16,
    timeout: Duration,
    input: Arc<dyn OperatorInput>,
    browser: Arc<dyn BrowserLauncher>,
    state: Mutex<FlowState>,
}

impl AuthorizationFlow {
    pub fn new(
        config: &Config,
        input: Arc<dyn OperatorInput>,
        browser: Arc<dyn BrowserLauncher>,
    ) -> Self {
        Self {
            authorize_url: config.authorize_url(),
            port: config.callback_port,
            timeout: config.auth_timeout,
            input,
            browser,
            state: Mutex::new(FlowState::Idle),
        }
    }

    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    /// Most recent state, for diagnostics.
    pub fn state(&self) -> FlowState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(FlowState::Failed)
    }

    fn enter(&self, next: FlowState) {
        if let Ok(mut state) = self.state.lock() {
            tracing::debug!(from = ?*state, to = ?next, "Authorization flow transition");
            *state = next;
        }
    }

    /// Run the flow to completion.
    ///
    /// Fails only when Strava redirects back with an `error` (the operator
    /// declined) or when operator input itself fails. A listener that cannot
    /// start degrades to manual entry.
    pub async fn obtain_code(&self) -> Result<Grant> {
        match self.listen_for_callback().await {
            Ok(Some(CallbackOutcome::Code(code))) => {
                self.enter(FlowState::Done);
                tracing::info!("Authorization code received from browser redirect");
                return Ok(Grant {
                    code,
                    source: GrantSource::Callback,
                });
            }
            Ok(Some(CallbackOutcome::Denied(error))) => {
                self.enter(FlowState::Failed);
                return Err(AppError::Auth(format!("Authorization denied: {}", error)));
            }
            Ok(None) => {
                self.enter(FlowState::TimedOut);
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "Automatic authorization timed out, switching to manual entry"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Callback listener unavailable, switching to manual entry");
            }
        }

        let code = self.prompt_for_code().await?;
        Ok(Grant {
            code,
            source: GrantSource::Manual,
        })
    }

    /// Ask the operator to paste the redirect URL or the bare code.
    ///
    /// Always yields a code; validation is left to the token exchange.
    pub async fn prompt_for_code(&self) -> Result<String> {
        self.enter(FlowState::Manual);
        let reply = self.input.prompt(&manual_instructions(&self.authorize_url)).await?;
        let code = extract_code(&reply);
        self.enter(FlowState::Done);
        Ok(code)
    }

    /// Serve the callback until a terminal outcome or the timeout.
    ///
    /// The listener is fully shut down before this returns, whichever way.
    async fn listen_for_callback(&self) -> Result<Option<CallbackOutcome>> {
        let addr = SocketAddr::from(([127, 0, 0, 1], self.port));
        let tcp = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Listener(format!("Failed to bind {}: {}", addr, e)))?;

        let callback = CallbackListener::new();
        let app = callback.router();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let mut server = tokio::spawn(async move {
            axum::serve(tcp, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        self.enter(FlowState::Listening);
        tracing::info!(address = %addr, "Waiting for Strava authorization in the browser");
        tracing::info!(url = %self.authorize_url, "If the browser does not open, visit this URL");

        if let Err(e) = self.browser.open(&self.authorize_url) {
            tracing::warn!(error = %e, "Could not open a browser automatically");
        }

        let outcome = callback.wait(self.timeout).await;

        let _ = shutdown_tx.send(());
        match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => tracing::warn!(error = %e, "Callback listener exited with error"),
            Ok(Err(e)) => tracing::warn!(error = %e, "Callback listener task failed"),
            Err(_) => {
                server.abort();
                let _ = server.await;
            }
        }
        tracing::debug!(address = %addr, "Callback listener closed");

        Ok(outcome)
    }
}

fn manual_instructions(authorize_url: &str) -> String {
    format!(
        "\nAutomatic authorization did not complete. To authorize manually:\n\
         1. Open this link in a browser:\n\n{}\n\n\
         2. Log in to Strava and authorize the application\n\
         3. You will be redirected to a page that may fail to load\n\
         4. Copy the full URL from the address bar\n\n\
         Paste the redirected URL or the authorization code: ",
        authorize_url
    )
}

/// Pull the grant code out of operator input.
///
/// Accepts a full redirect URL, anything containing `code=...`, or the bare code.
pub fn extract_code(input: &str) -> String {
    let input = input.trim();

    if input.contains("code=") {
        if let Ok(url) = reqwest::Url::parse(input) {
            if let Some((_, code)) = url.query_pairs().find(|(k, _)| k == "code") {
                if !code.is_empty() {
                    return code.into_owned();
                }
            }
        } else if let Some((_, rest)) = input.split_once("code=") {
            let code = rest.split('&').next().unwrap_or_default();
            if !code.is_empty() {
                return code.to_string();
            }
        }
    }

    input.to_string()
}
