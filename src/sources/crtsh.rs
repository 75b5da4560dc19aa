// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - crt.sh Source
 * Subdomains from certificate transparency logs
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::collections::HashSet;

use serde::Deserialize;
use tracing::debug;

use super::{batch_stream, Discovery, DiscoveryStream, ResultType, RunContext, Source};
use crate::errors::SourceError;
use crate::sources::extract::SubdomainExtractor;

const NAME: &str = "crtsh";
const DEFAULT_ENDPOINT: &str = "https://crt.sh";

/// Queries the crt.sh certificate transparency database. Certificates issued
/// for a domain routinely reveal subdomains that never appear in DNS
/// wordlists.
pub struct CrtSh {
    endpoint: String,
}

impl CrtSh {
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

impl Default for CrtSh {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct CertEntry {
    name_value: String,
}

impl Source for CrtSh {
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

            let url = format!("{}/?q=%.{}&output=json", endpoint, ctx.domain);
            let body = ctx.client.get(NAME, &url).await?;
            let entries: Vec<CertEntry> =
                serde_json::from_str(&body).map_err(|err| SourceError::parse(NAME, err))?;

            // Certificates repeat names constantly; dedupe within the response.
            let mut seen = HashSet::new();
            let mut discoveries = Vec::new();
            for entry in &entries {
                for line in entry.name_value.lines() {
                    for subdomain in extractor.extract(line) {
                        if seen.insert(subdomain.clone()) {
                            discoveries.push(Discovery::new(
                                ResultType::SUBDOMAIN,
                                subdomain,
                                NAME,
                            ));
                        }
                    }
                }
            }

            debug!(
                "crtsh: {} unique subdomains for {}",
                discoveries.len(),
                ctx.domain
            );
            Ok(discoveries)
        })
    }
}
