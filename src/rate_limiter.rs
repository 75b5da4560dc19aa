// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Two-Level Rate Limiter
 * Token bucket gating with a shared global cap and per-source overrides
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::collections::HashMap;
use std::time::Duration;

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorRateLimiter,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::SourceError;

type DirectLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Builds a continuously refilling token bucket for the given rate.
///
/// A rate of 0 (or anything non-positive) means unlimited: no limiter is
/// constructed and acquisition never blocks. Burst capacity is one token, so
/// requests are spaced at the instantaneous rate rather than clustering.
fn build_limiter(requests_per_second: f64) -> Option<DirectLimiter> {
    if requests_per_second <= 0.0 {
        return None;
    }
    let period = Duration::from_secs_f64(1.0 / requests_per_second);
    Quota::with_period(period).map(GovernorRateLimiter::direct)
}

/// Request-rate gates shared by every worker of a run.
///
/// Before a source issues a request it acquires one token from the global
/// limiter and one from its own per-source limiter, in that order. Either
/// level may be absent (unlimited). Acquisition suspends until a token is
/// available or the run's cancellation signal fires.
pub struct RateLimits {
    global: Option<DirectLimiter>,
    per_source: HashMap<String, DirectLimiter>,
}

impl RateLimits {
    pub fn new(global_rps: f64, per_source_rps: &HashMap<String, f64>) -> Self {
        let per_source = per_source_rps
            .iter()
            .filter_map(|(name, rps)| build_limiter(*rps).map(|limiter| (name.clone(), limiter)))
            .collect();

        Self {
            global: build_limiter(global_rps),
            per_source,
        }
    }

    /// Gates with no limits at all. Every acquisition succeeds immediately.
    pub fn unlimited() -> Self {
        Self {
            global: None,
            per_source: HashMap::new(),
        }
    }

    /// Acquires one token from both levels on behalf of `source`.
    ///
    /// Returns `SourceError::Cancelled` as soon as `cancel` fires, instead of
    /// waiting out the bucket.
    pub async fn acquire(
        &self,
        source: &str,
        cancel: &CancellationToken,
    ) -> Result<(), SourceError> {
        if let Some(global) = &self.global {
            Self::wait(global, source, cancel).await?;
        }
        if let Some(limiter) = self.per_source.get(source) {
            Self::wait(limiter, source, cancel).await?;
        }
        Ok(())
    }

    async fn wait(
        limiter: &DirectLimiter,
        source: &str,
        cancel: &CancellationToken,
    ) -> Result<(), SourceError> {
        if cancel.is_cancelled() {
            return Err(SourceError::cancelled(source));
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("{}: cancelled while waiting for a rate-limit token", source);
                Err(SourceError::cancelled(source))
            }
            _ = limiter.until_ready() => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn zero_rate_never_blocks() {
        let limits = RateLimits::new(0.0, &HashMap::new());
        let cancel = CancellationToken::new();

        let started = Instant::now();
        for _ in 0..100 {
            limits.acquire("crtsh", &cancel).await.unwrap();
        }
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn unset_per_source_rate_is_unlimited() {
        let mut per_source = HashMap::new();
        per_source.insert("wayback".to_string(), 0.0);
        let limits = RateLimits::new(0.0, &per_source);
        let cancel = CancellationToken::new();

        let started = Instant::now();
        for _ in 0..50 {
            limits.acquire("wayback", &cancel).await.unwrap();
        }
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn global_rate_spaces_acquisitions() {
        // 20 req/s: the second token is only available ~50ms after the first.
        let limits = RateLimits::new(20.0, &HashMap::new());
        let cancel = CancellationToken::new();

        let started = Instant::now();
        limits.acquire("crtsh", &cancel).await.unwrap();
        limits.acquire("wayback", &cancel).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn per_source_limit_only_gates_that_source() {
        let mut per_source = HashMap::new();
        per_source.insert("slow".to_string(), 1.0);
        let limits = RateLimits::new(0.0, &per_source);
        let cancel = CancellationToken::new();

        // Consume slow's only token, then check the other source stays free.
        limits.acquire("slow", &cancel).await.unwrap();
        let started = Instant::now();
        for _ in 0..20 {
            limits.acquire("fast", &cancel).await.unwrap();
        }
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn cancellation_unblocks_a_starved_acquire() {
        let limits = RateLimits::new(0.1, &HashMap::new());
        let cancel = CancellationToken::new();

        // Drain the only token; the next acquire would wait ~10s.
        limits.acquire("crtsh", &cancel).await.unwrap();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            limits.acquire("crtsh", &cancel),
        )
        .await
        .expect("acquire must not outlive cancellation");

        assert!(result.unwrap_err().is_cancelled());
    }
}
