// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;

/// Identifies this tool to providers unless a caller overrides it.
pub const DEFAULT_USER_AGENT: &str = concat!("lonkero-recon/", env!("CARGO_PKG_VERSION"));

const DEFAULT_PARALLELISM: usize = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a reconnaissance run.
///
/// Built from [`default`](Default::default) plus chainable `with_*` setters;
/// once handed to the engine the options are not mutated again.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Maximum number of sources running concurrently. A value of 0 is
    /// coerced to 1 by the engine.
    pub parallelism: usize,

    /// Wall-clock budget for the whole run.
    pub timeout: Duration,

    /// Requests per second shared across all sources. 0 means unlimited.
    pub global_rate_limit: f64,

    /// Per-source requests-per-second overrides. Sources without an entry
    /// are only bound by the global limit.
    pub source_rate_limits: HashMap<String, f64>,

    /// User-Agent header applied to every outbound request.
    pub user_agent: String,

    /// HTTP client to issue requests with. When unset the engine builds its
    /// own with the crate defaults.
    pub http_client: Option<Client>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            timeout: DEFAULT_TIMEOUT,
            global_rate_limit: 0.0,
            source_rate_limits: HashMap::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_client: None,
        }
    }
}

impl EngineOptions {
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_global_rate_limit(mut self, requests_per_second: f64) -> Self {
        self.global_rate_limit = requests_per_second;
        self
    }

    /// Caps a single named source. Repeated calls accumulate: setting a limit
    /// for one source never clears limits set for others.
    pub fn with_source_rate_limit(
        mut self,
        source: impl Into<String>,
        requests_per_second: f64,
    ) -> Self {
        self.source_rate_limits
            .insert(source.into(), requests_per_second);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}
