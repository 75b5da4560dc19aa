// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Reconnaissance Sources
 * Pluggable data sources, their result model and the process-wide registry
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::collections::HashMap;
use std::sync::Arc;

use bitflags::bitflags;
use futures::future;
use futures::stream::{self, BoxStream};
use futures::{Future, StreamExt};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::errors::SourceError;
use crate::http_client::ReconClient;

pub mod crtsh;
pub mod extract;
pub mod hackertarget;
pub mod wayback;

pub use extract::{SubdomainExtractor, UrlExtractor};

bitflags! {
    /// What kind of data a result contains. Flags are disjoint bits; a
    /// source's capability mask may combine them, an individual discovery
    /// always carries exactly one.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ResultType: u8 {
        /// A subdomain (e.g. api.example.com).
        const SUBDOMAIN = 1 << 0;
        /// A full URL (e.g. https://example.com/path).
        const URL = 1 << 1;
    }
}

impl ResultType {
    pub fn label(self) -> &'static str {
        if self == Self::SUBDOMAIN {
            "subdomain"
        } else if self == Self::URL {
            "url"
        } else {
            "mixed"
        }
    }
}

/// A single discovery produced by a source. Immutable once yielded;
/// `source` records provenance for later attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    pub result_type: ResultType,
    pub value: String,
    pub source: String,
}

impl Discovery {
    pub fn new(
        result_type: ResultType,
        value: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            result_type,
            value: value.into(),
            source: source.into(),
        }
    }
}

/// Lazy result stream produced by one source run. Strictly demand-driven:
/// nothing happens until the stream is polled, and dropping it cancels any
/// in-flight work.
pub type DiscoveryStream = BoxStream<'static, Result<Discovery, SourceError>>;

/// Everything a source needs for one run. Owned by the worker driving the
/// source; cloning is cheap.
#[derive(Clone)]
pub struct RunContext {
    /// Target domain under investigation.
    pub domain: String,
    /// Rate-limited, cancellation-aware HTTP handle.
    pub client: ReconClient,
    /// The run's shared cancellation signal. The client already honors it;
    /// sources doing their own waiting must observe it too.
    pub cancel: CancellationToken,
}

impl RunContext {
    pub fn new(domain: impl Into<String>, client: ReconClient) -> Self {
        let cancel = client.cancellation().clone();
        Self {
            domain: domain.into(),
            client,
            cancel,
        }
    }
}

/// A reconnaissance data source.
///
/// Implementations must be stateless and reentrant: `run` can be invoked
/// concurrently by multiple callers, and each returned stream must honor the
/// lazy contract of [`DiscoveryStream`]. A per-item error does not end the
/// stream; the source may keep yielding afterwards.
pub trait Source: Send + Sync {
    /// Unique identifier (e.g. "wayback", "crtsh").
    fn name(&self) -> &'static str;

    /// What result types this source can produce.
    fn yields(&self) -> ResultType;

    /// Starts one query against the target in `ctx`.
    fn run(&self, ctx: RunContext) -> DiscoveryStream;
}

/// Shapes a single-request source into the lazy stream contract: the fetch
/// runs on first poll, then its discoveries are yielded one by one. A failed
/// fetch becomes a single error item; the stream ends either way.
pub(crate) fn batch_stream<F>(fetch: F) -> DiscoveryStream
where
    F: Future<Output = Result<Vec<Discovery>, SourceError>> + Send + 'static,
{
    Box::pin(stream::once(fetch).flat_map(|batch| match batch {
        Ok(items) => stream::iter(items).map(Ok).boxed(),
        Err(err) => stream::once(future::ready(Err(err))).boxed(),
    }))
}

// Process-wide registry, seeded with the built-in sources. Registration and
// lookup are synchronized; the map is effectively read-only while a run is
// in flight.
static REGISTRY: Lazy<RwLock<HashMap<String, Arc<dyn Source>>>> = Lazy::new(|| {
    let mut sources: HashMap<String, Arc<dyn Source>> = HashMap::new();
    for source in builtin_sources() {
        sources.insert(source.name().to_string(), source);
    }
    RwLock::new(sources)
});

fn builtin_sources() -> Vec<Arc<dyn Source>> {
    vec![
        Arc::new(crtsh::CrtSh::new()),
        Arc::new(wayback::Wayback::new()),
        Arc::new(hackertarget::HackerTarget::new()),
    ]
}

/// Adds a source to the registry, overwriting any previous source of the
/// same name. Intended for process start; there is no way to remove one.
pub fn register(source: Arc<dyn Source>) {
    REGISTRY.write().insert(source.name().to_string(), source);
}

/// Looks a source up by name.
pub fn by_name(name: &str) -> Option<Arc<dyn Source>> {
    REGISTRY.read().get(name).cloned()
}

/// All registered sources, in no particular order.
pub fn list() -> Vec<Arc<dyn Source>> {
    REGISTRY.read().values().cloned().collect()
}

/// Sources able to yield at least one of the requested result types. Any
/// overlap counts, so asking for URLs also returns combined-capability
/// sources.
pub fn filter(want: ResultType) -> Vec<Arc<dyn Source>> {
    REGISTRY
        .read()
        .values()
        .filter(|source| source.yields().intersects(want))
        .cloned()
        .collect()
}

/// Names of all registered sources.
pub fn names() -> Vec<String> {
    REGISTRY.read().keys().cloned().collect()
}
