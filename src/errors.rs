// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Reconnaissance Error Types
 * Per-item source errors, joined aggregates and construction-time failures
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::fmt;

use thiserror::Error;

/// Construction-time errors. These are returned immediately by constructors
/// and never surface as per-item stream errors.
#[derive(Debug, Error)]
pub enum ReconError {
    /// The target domain cannot be turned into an extraction pattern.
    #[error("invalid domain {domain:?}: {reason}")]
    InvalidDomain { domain: String, reason: String },

    /// The default HTTP client could not be built.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// A single failed item in a source's result stream.
///
/// Every variant carries the name of the source that produced it, so callers
/// inspecting an [`AggregateError`] can attribute failures after a run.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The outbound request failed before a response was received.
    #[error("{source_name}: request failed: {cause}")]
    Request {
        source_name: String,
        #[source]
        cause: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("{source_name}: unexpected HTTP status {status} from {url}")]
    Status {
        source_name: String,
        status: u16,
        url: String,
    },

    /// The provider's response could not be interpreted.
    #[error("{source_name}: unexpected response: {reason}")]
    Parse { source_name: String, reason: String },

    /// The shared cancellation signal fired while this source was waiting.
    #[error("{source_name}: cancelled before completion")]
    Cancelled { source_name: String },

    /// The source's worker panicked. Caught at the worker boundary so that
    /// sibling sources keep running.
    #[error("{source_name}: worker panicked: {message}")]
    Panicked {
        source_name: String,
        message: String,
    },
}

impl SourceError {
    pub fn request(source: impl Into<String>, cause: reqwest::Error) -> Self {
        Self::Request {
            source_name: source.into(),
            cause,
        }
    }

    pub fn status(source: impl Into<String>, status: u16, url: impl Into<String>) -> Self {
        Self::Status {
            source_name: source.into(),
            status,
            url: url.into(),
        }
    }

    pub fn parse(source: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Parse {
            source_name: source.into(),
            reason: reason.to_string(),
        }
    }

    pub fn cancelled(source: impl Into<String>) -> Self {
        Self::Cancelled {
            source_name: source.into(),
        }
    }

    /// Name of the source this error originated from.
    pub fn source_name(&self) -> &str {
        match self {
            Self::Request { source_name, .. }
            | Self::Status { source_name, .. }
            | Self::Parse { source_name, .. }
            | Self::Cancelled { source_name }
            | Self::Panicked { source_name, .. } => source_name,
        }
    }

    /// True when this error only reports cancellation. The engine drops these
    /// instead of forwarding them, since hitting the time budget is not a
    /// failure of the run.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Every per-item error of a run, joined into one value.
///
/// Each constituent keeps its identity: [`errors`](Self::errors) exposes the
/// original [`SourceError`] values for variant and source-name inspection.
#[derive(Debug)]
pub struct AggregateError {
    errors: Vec<SourceError>,
}

impl AggregateError {
    /// Joins a batch of errors. `None` when the batch is empty, mirroring a
    /// run in which nothing failed.
    pub fn join(errors: Vec<SourceError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[SourceError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SourceError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} source error(s)", self.errors.len())?;
        for err in &self.errors {
            write!(f, "; {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}
