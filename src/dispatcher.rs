//! Request dispatch: validation, the single outbound call, and the loading
//! state around it.

use std::future::Future;
use std::ops::{Deref, DerefMut};

use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::CheckerConfig;
use crate::error::{BackendError, CheckerError, DispatchError, SERVER_FALLBACK_MESSAGE};
use crate::protocol::{AnalysisRequest, AnalysisResponse, HealthStatus};
use crate::renderer;
use crate::view::{View, ViewState};

// ---------------------------------------------------------------------------
// Backend seam
// ---------------------------------------------------------------------------

/// Raw reply from the backend: the status code and, when the body was JSON,
/// the decoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendReply {
    pub status: u16,
    pub body: Option<Value>,
}

impl BackendReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can answer an [`AnalysisRequest`].
pub trait AnalysisBackend {
    /// Send `request` once. `Err` means no reply was obtained at all.
    fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = Result<BackendReply, BackendError>> + Send;
}

/// The production backend: `POST {base_url}/analyze` over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    analyze_url: String,
    health_url: String,
}

impl HttpBackend {
    pub fn new(
        client: reqwest::Client,
        analyze_url: impl Into<String>,
        health_url: impl Into<String>,
    ) -> Self {
        HttpBackend {
            client,
            analyze_url: analyze_url.into(),
            health_url: health_url.into(),
        }
    }

    /// Build a client with the configured timeouts.
    pub fn from_config(config: &CheckerConfig) -> Result<Self, CheckerError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::new(client, config.analyze_url(), config.health_url()))
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }

    /// Query `GET /health`.
    ///
    /// # Returns
    /// - `Ok(HealthStatus)` on a 2xx response with a parseable body.
    /// - `Err(BackendError::Http)` on a non-2xx response.
    /// - `Err(BackendError::Connect | Timeout | Body)` otherwise.
    pub async fn health(&self) -> Result<HealthStatus, BackendError> {
        let url = &self.health_url;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(url, &e))?;

        if !resp.status().is_success() {
            return Err(BackendError::Http {
                status: resp.status().as_u16(),
                url: url.clone(),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| BackendError::from_reqwest(url, &e))?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Body {
            url: url.clone(),
            detail: e.to_string(),
        })
    }
}

impl AnalysisBackend for HttpBackend {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<BackendReply, BackendError> {
        let url = &self.analyze_url;
        let resp = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(url, &e))?;

        let status = resp.status().as_u16();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| BackendError::from_reqwest(url, &e))?;
        let body = serde_json::from_slice::<Value>(&bytes).ok();
        if body.is_none() {
            debug!(status, len = bytes.len(), "response body is not JSON");
        }
        Ok(BackendReply { status, body })
    }
}

// ---------------------------------------------------------------------------
// Loading guard
// ---------------------------------------------------------------------------

/// Holds the view in its loading state for the lifetime of one request.
///
/// Acquiring shows the loading indicator and disables the trigger. Dropping
/// re-enables the trigger and, if no outcome was shown, leaves loading for
/// idle. Drop runs on every exit path, including panics in the backend and
/// cancellation of the dispatch future.
pub struct LoadingGuard<'v> {
    view: &'v mut View,
}

impl<'v> LoadingGuard<'v> {
    pub fn acquire(view: &'v mut View) -> Self {
        view.show_loading();
        view.set_trigger_enabled(false);
        LoadingGuard { view }
    }
}

impl Deref for LoadingGuard<'_> {
    type Target = View;

    fn deref(&self) -> &View {
        self.view
    }
}

impl DerefMut for LoadingGuard<'_> {
    fn deref_mut(&mut self) -> &mut View {
        self.view
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.view.is_loading_visible() {
            self.view.set_state(ViewState::Idle);
        }
        self.view.set_trigger_enabled(true);
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// How one trigger ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Safe,
    Toxic,
    Failed(DispatchError),
    /// The trigger control was disabled; nothing happened.
    Busy,
}

pub struct Dispatcher<B> {
    backend: B,
}

impl<B: AnalysisBackend> Dispatcher<B> {
    pub fn new(backend: B) -> Self {
        Dispatcher { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one request cycle for `input`.
    ///
    /// Blank input shows the validation error without touching the loading
    /// state. Otherwise exactly one request is sent and its outcome is shown
    /// on `view`; the trigger is enabled again before this returns.
    pub async fn trigger(&self, input: &str, view: &mut View) -> DispatchOutcome {
        if !view.is_trigger_enabled() {
            debug!("trigger ignored while a request is in flight");
            return DispatchOutcome::Busy;
        }

        let Some(request) = AnalysisRequest::from_input(input) else {
            let err = DispatchError::Validation;
            view.show_error(err.to_string());
            return DispatchOutcome::Failed(err);
        };

        let request_id = Uuid::new_v4();
        let span = info_span!("dispatch", %request_id, chars = request.text.chars().count());

        async move {
            view.clear_outcome();
            let mut guard = LoadingGuard::acquire(view);

            let reply = self.backend.analyze(&request).await;
            let outcome = match settle(reply) {
                Ok((status, response)) => {
                    if let Some(detail) = response.diagnostic() {
                        debug!(%detail, "backend attached diagnostic detail");
                    }
                    match renderer::render(&response, &mut guard) {
                        ViewState::ResultsToxic => DispatchOutcome::Toxic,
                        ViewState::ResultsSafe => DispatchOutcome::Safe,
                        _ => DispatchOutcome::Failed(DispatchError::Server {
                            status,
                            message: guard.error_message().unwrap_or_default().to_string(),
                        }),
                    }
                }
                Err(err) => {
                    guard.show_error(err.to_string());
                    DispatchOutcome::Failed(err)
                }
            };
            drop(guard);

            debug!(?outcome, "dispatch settled");
            outcome
        }
        .instrument(span)
        .await
    }
}

/// Map a backend reply onto a verdict to render (with the status it came
/// with) or a dispatch error.
fn settle(
    reply: Result<BackendReply, BackendError>,
) -> Result<(u16, AnalysisResponse), DispatchError> {
    let reply = reply.map_err(|e| {
        warn!(error = %e, "analysis request failed");
        DispatchError::Transport
    })?;

    let parsed = reply
        .body
        .clone()
        .and_then(|body| serde_json::from_value::<AnalysisResponse>(body).ok());

    if reply.is_success() {
        parsed.map(|response| (reply.status, response)).ok_or_else(|| {
            warn!(status = reply.status, "success reply without a JSON object body");
            DispatchError::Transport
        })
    } else {
        let message = parsed
            .as_ref()
            .and_then(AnalysisResponse::error_message)
            .unwrap_or_else(|| SERVER_FALLBACK_MESSAGE.to_string());
        warn!(status = reply.status, %message, "backend reported failure");
        Err(DispatchError::Server {
            status: reply.status,
            message,
        })
    }
}
