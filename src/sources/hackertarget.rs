// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - HackerTarget Source
 * Subdomains from the HackerTarget hostsearch API
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::collections::HashSet;

use tracing::debug;

use super::{batch_stream, Discovery, DiscoveryStream, ResultType, RunContext, Source};
use crate::errors::SourceError;
use crate::sources::extract::SubdomainExtractor;

const NAME: &str = "hackertarget";
const DEFAULT_ENDPOINT: &str = "https://api.hackertarget.com";

/// Queries the HackerTarget hostsearch API, which answers with one
/// `host,address` CSV line per known subdomain.
pub struct HackerTarget {
    endpoint: String,
}

impl HackerTarget {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Overrides the provider endpoint (self-hosted mirrors, tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for HackerTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for HackerTarget {
    fn name(&self) -> &'static str {
        NAME
    }

    fn yields(&self) -> ResultType {
        ResultType::SUBDOMAIN
    }

    fn run(&self, ctx: RunContext) -> DiscoveryStream {
        let endpoint = self.endpoint.clone();
        batch_stream(async move {
            let extractor = SubdomainExtractor::new(&ctx.domain)
                .map_err(|err| SourceError::parse(NAME, err))?;

            let url = format!("{}/hostsearch/?q={}", endpoint, ctx.domain);
            let body = ctx.client.get(NAME, &url).await?;

            // The API reports quota and input problems as a 200 with a plain
            // text message instead of CSV.
            let trimmed = body.trim_start();
            if trimmed.starts_with("error") || trimmed.starts_with("API count exceeded") {
                let message = trimmed.lines().next().unwrap_or("provider error");
                return Err(SourceError::parse(NAME, message));
            }

            let mut seen = HashSet::new();
            let mut discoveries = Vec::new();
            for line in body.lines() {
                for subdomain in extractor.extract(line) {
                    if seen.insert(subdomain.clone()) {
                        discoveries.push(Discovery::new(ResultType::SUBDOMAIN, subdomain, NAME));
                    }
                }
            }

            debug!(
                "hackertarget: {} unique subdomains for {}",
                discoveries.len(),
                ctx.domain
            );
            Ok(discoveries)
        })
    }
}
