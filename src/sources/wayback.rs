// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Wayback Machine Source
 * Archived URLs and the subdomains they reveal
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::collections::HashSet;

use tracing::debug;

use super::{batch_stream, Discovery, DiscoveryStream, ResultType, RunContext, Source};
use crate::errors::SourceError;
use crate::sources::extract::{SubdomainExtractor, UrlExtractor};

const NAME: &str = "wayback";
const DEFAULT_ENDPOINT: &str = "https://web.archive.org";

/// Queries the Wayback Machine CDX index for every archived URL under the
/// target domain. Yields the URLs as archived plus the subdomains they
/// mention, so it carries a combined capability mask.
pub struct Wayback {
    endpoint: String,
}

impl Wayback {
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

impl Default for Wayback {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for Wayback {
    fn name(&self) -> &'static str {
        NAME
    }

    fn yields(&self) -> ResultType {
        ResultType::SUBDOMAIN | ResultType::URL
    }

    fn run(&self, ctx: RunContext) -> DiscoveryStream {
        let endpoint = self.endpoint.clone();
        batch_stream(async move {
            let subdomains = SubdomainExtractor::new(&ctx.domain)
                .map_err(|err| SourceError::parse(NAME, err))?;
            let urls =
                UrlExtractor::new(&ctx.domain).map_err(|err| SourceError::parse(NAME, err))?;

            let url = format!(
                "{}/cdx/search/cdx?url=*.{}/*&output=text&fl=original&collapse=urlkey",
                endpoint, ctx.domain
            );
            let body = ctx.client.get(NAME, &url).await?;

            let mut seen_urls = HashSet::new();
            let mut seen_subdomains = HashSet::new();
            let mut discoveries = Vec::new();
            for line in body.lines() {
                for archived in urls.extract(line) {
                    if seen_urls.insert(archived.clone()) {
                        discoveries.push(Discovery::new(ResultType::URL, archived, NAME));
                    }
                }
                for subdomain in subdomains.extract(line) {
                    if seen_subdomains.insert(subdomain.clone()) {
                        discoveries.push(Discovery::new(ResultType::SUBDOMAIN, subdomain, NAME));
                    }
                }
            }

            debug!(
                "wayback: {} URLs, {} subdomains for {}",
                seen_urls.len(),
                seen_subdomains.len(),
                ctx.domain
            );
            Ok(discoveries)
        })
    }
}
