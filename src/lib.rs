// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Reconnaissance Library
 * Concurrent subdomain and URL discovery from external data sources
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod collect;
pub mod engine;
pub mod errors;
pub mod http_client;
pub mod options;
pub mod rate_limiter;

// Data sources and their result model
pub mod sources;

pub use collect::collect;
pub use engine::ReconEngine;
pub use errors::{AggregateError, ReconError, SourceError};
pub use options::EngineOptions;
pub use sources::{Discovery, ResultType, Source};
