// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

// Manual run against a live domain:
//   cargo run --example enumerate -- example.com

use std::time::Duration;

use anyhow::Result;
use lonkero_recon::{sources, EngineOptions, ReconEngine, ResultType};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lonkero_recon=debug".into()),
        )
        .init();

    let domain = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "example.com".to_string());

    let engine = ReconEngine::new(
        EngineOptions::default()
            .with_parallelism(4)
            .with_timeout(Duration::from_secs(60))
            .with_global_rate_limit(5.0)
            .with_source_rate_limit("hackertarget", 1.0),
    )?;

    let selected = sources::filter(ResultType::SUBDOMAIN | ResultType::URL);
    let (results, err) = engine.enumerate(&domain, selected).await;

    for discovery in &results {
        println!(
            "{}\t{}\t{}",
            discovery.source,
            discovery.result_type.label(),
            discovery.value
        );
    }

    if let Some(err) = err {
        eprintln!("completed with failures: {err}");
    }

    Ok(())
}
