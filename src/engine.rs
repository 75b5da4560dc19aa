// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Reconnaissance Engine
 * Rate-limited concurrent fan-out over sources with a shared time budget
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::{stream, FutureExt, Stream, StreamExt};
use reqwest::Client;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::collect::collect;
use crate::errors::{AggregateError, ReconError, SourceError};
use crate::http_client::{default_client, ReconClient};
use crate::options::EngineOptions;
use crate::rate_limiter::RateLimits;
use crate::sources::{Discovery, RunContext, Source};

/// Fan-in handoff capacity per run. Small on purpose: a slow consumer must
/// suspend workers instead of buffering their output without bound.
const FANIN_BUFFER: usize = 32;

/// Runs a set of sources against a target domain under shared rate limits,
/// bounded parallelism and one wall-clock budget.
///
/// One source failing, panicking or timing out never aborts its siblings;
/// whatever was discovered is always returned, alongside a joined error
/// describing everything that went wrong.
pub struct ReconEngine {
    options: EngineOptions,
    http: Client,
}

impl ReconEngine {
    /// Builds an engine from `options`. Fails only when no HTTP client was
    /// injected and the default one cannot be constructed.
    pub fn new(options: EngineOptions) -> Result<Self, ReconError> {
        let http = match &options.http_client {
            Some(client) => client.clone(),
            None => default_client()?,
        };
        Ok(Self { options, http })
    }

    /// Starts every source in `selected` and returns the fan-in stream of
    /// their results.
    ///
    /// At most `parallelism` sources run at once (a configured value of 0 is
    /// coerced to 1); the rest queue for a slot and never start once the
    /// deadline has fired. Interleaving across sources is scheduler-dependent,
    /// but each source's own emission order is preserved exactly. Dropping the
    /// returned stream cancels the whole run.
    ///
    /// Must be called from within a tokio runtime.
    pub fn stream(
        &self,
        domain: &str,
        selected: Vec<Arc<dyn Source>>,
    ) -> impl Stream<Item = Result<Discovery, SourceError>> + Send + 'static {
        let parallelism = self.options.parallelism.max(1);
        let cancel = CancellationToken::new();
        let limits = Arc::new(RateLimits::new(
            self.options.global_rate_limit,
            &self.options.source_rate_limits,
        ));
        let client = ReconClient::new(
            self.http.clone(),
            limits,
            self.options.user_agent.clone(),
            cancel.clone(),
        );
        let ctx = RunContext::new(domain, client);

        info!(
            "starting {} source(s) for {} (parallelism {}, budget {:?})",
            selected.len(),
            domain,
            parallelism,
            self.options.timeout
        );

        // One shared deadline signal for every worker.
        let timeout = self.options.timeout;
        let deadline_cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    debug!("time budget of {:?} exhausted, cancelling run", timeout);
                    deadline_cancel.cancel();
                }
                _ = deadline_cancel.cancelled() => {}
            }
        });

        let (tx, rx) = mpsc::channel(FANIN_BUFFER);
        let semaphore = Arc::new(Semaphore::new(parallelism));

        let mut workers = JoinSet::new();
        for source in selected {
            workers.spawn(drive_source(
                source,
                ctx.clone(),
                tx.clone(),
                semaphore.clone(),
                cancel.clone(),
            ));
        }
        drop(tx);

        // Reap the deadline task once every worker has wound down; the
        // channel closes by itself when the last worker drops its sender.
        let supervisor_cancel = cancel.clone();
        tokio::spawn(async move {
            while workers.join_next().await.is_some() {}
            supervisor_cancel.cancel();
        });

        // The guard travels with the stream: dropping the stream cancels the
        // run, which is how a consumer stops early.
        let guard = cancel.drop_guard();
        stream::unfold((rx, guard), |(mut rx, guard)| async move {
            rx.recv().await.map(|item| (item, (rx, guard)))
        })
    }

    /// Runs `selected` to completion and collects the outcome: every
    /// discovery that succeeded plus one joined error for everything that
    /// failed.
    pub async fn enumerate(
        &self,
        domain: &str,
        selected: Vec<Arc<dyn Source>>,
    ) -> (Vec<Discovery>, Option<AggregateError>) {
        let (results, err) = collect(self.stream(domain, selected)).await;
        info!(
            "run for {} finished: {} result(s), {} error(s)",
            domain,
            results.len(),
            err.as_ref().map_or(0, AggregateError::len)
        );
        (results, err)
    }
}

/// Drives one source's stream to completion inside a worker task.
///
/// Owns the only reference to the stream (no two workers ever poll the same
/// one) and forwards each item over the bounded fan-in channel. A panic
/// anywhere in the source is caught here and turned into a per-source error
/// so sibling workers keep running.
async fn drive_source(
    source: Arc<dyn Source>,
    ctx: RunContext,
    tx: mpsc::Sender<Result<Discovery, SourceError>>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
) {
    let name = source.name();

    // Wait for a parallelism slot; a cancelled run starts nothing new.
    let _permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        permit = semaphore.acquire_owned() => match permit {
            Ok(permit) => permit,
            Err(_) => return,
        },
    };

    debug!("{}: started", name);
    let driven = AssertUnwindSafe(async {
        let mut results = source.run(ctx);
        let mut delivered = 0usize;
        loop {
            let item = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                item = results.next() => match item {
                    Some(item) => item,
                    None => break,
                },
            };

            // Hitting the deadline is not a failure of the source.
            if matches!(&item, Err(err) if err.is_cancelled()) {
                break;
            }

            // Bounded handoff. An item already produced when the deadline
            // fires is still delivered as long as the consumer keeps reading.
            tokio::select! {
                biased;
                sent = tx.send(item) => {
                    if sent.is_err() {
                        break; // consumer gone; stopping to pull is cancellation
                    }
                    delivered += 1;
                }
                _ = cancel.cancelled() => break,
            }
        }
        delivered
    })
    .catch_unwind()
    .await;

    match driven {
        Ok(delivered) => debug!("{}: finished, {} item(s) delivered", name, delivered),
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            warn!("{}: worker panicked: {}", name, message);
            let _ = tx
                .send(Err(SourceError::Panicked {
                    source_name: name.to_string(),
                    message,
                }))
                .await;
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
