// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, redirect, Client};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::{ReconError, SourceError};
use crate::rate_limiter::RateLimits;

/// Per-request backstop when a provider never responds. The run deadline is
/// the primary bound; this keeps a single hung connection from eating it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const POOL_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Builds the engine's default HTTP client.
///
/// Callers that inject their own client via the options bypass this entirely;
/// the injected client must be safe for concurrent use (reqwest's are).
pub fn default_client() -> Result<Client, ReconError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .redirect(redirect::Policy::limited(5))
        .pool_max_idle_per_host(POOL_IDLE_PER_HOST)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()
        .map_err(ReconError::HttpClient)
}

/// HTTP handle given to running sources.
///
/// Every request first acquires a token from both rate-limit levels, then
/// races the network I/O against the run's cancellation signal, so a source
/// using this client automatically honors the shared deadline during its own
/// waits. Cloning is cheap; clones share the underlying connection pool and
/// limiters.
#[derive(Clone)]
pub struct ReconClient {
    inner: Client,
    limits: Arc<RateLimits>,
    user_agent: String,
    cancel: CancellationToken,
}

impl ReconClient {
    pub fn new(
        inner: Client,
        limits: Arc<RateLimits>,
        user_agent: impl Into<String>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            inner,
            limits,
            user_agent: user_agent.into(),
            cancel,
        }
    }

    /// The run's shared cancellation token, for sources that do their own
    /// waiting outside this client.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Issues a rate-limited GET on behalf of `source` and returns the
    /// response body.
    ///
    /// Non-success statuses become `SourceError::Status`. When the run is
    /// cancelled mid-flight the request is dropped and `SourceError::Cancelled`
    /// is returned.
    pub async fn get(&self, source: &str, url: &str) -> Result<String, SourceError> {
        self.limits.acquire(source, &self.cancel).await?;

        debug!("{}: GET {}", source, url);
        let request = self
            .inner
            .get(url)
            .header(header::USER_AGENT, self.user_agent.as_str());

        let response = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(SourceError::cancelled(source)),
            result = request.send() => result.map_err(|cause| SourceError::request(source, cause))?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::status(source, status.as_u16(), url));
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(SourceError::cancelled(source)),
            result = response.text() => result.map_err(|cause| SourceError::request(source, cause)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_client_builds() {
        assert!(default_client().is_ok());
    }

    #[tokio::test]
    async fn get_fails_fast_once_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let client = ReconClient::new(
            default_client().unwrap(),
            Arc::new(RateLimits::unlimited()),
            "test-agent/1.0",
            cancel,
        );

        let err = client
            .get("crtsh", "http://192.0.2.1/never")
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
