// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use seo_audit_agent::app::{create_app, AppState, VERSION};
use seo_audit_agent::services::fetch::PageFetcher;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default per-request timeout for outbound audit fetches, in seconds.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("seo_audit_agent=info,warn")),
        )
        .init();

    // Every knob has a safe default; env vars override.
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let user_agent =
        env::var("USER_AGENT").unwrap_or_else(|_| format!("SeoAuditBot/{VERSION}"));
    let fetch_timeout_secs = match env::var("FETCH_TIMEOUT_SECS") {
        Ok(value) => value
            .parse::<u64>()
            .context("FETCH_TIMEOUT_SECS must be a valid number")?,
        Err(_) => DEFAULT_FETCH_TIMEOUT_SECS,
    };

    let fetcher = PageFetcher::new(&user_agent, Duration::from_secs(fetch_timeout_secs))
        .context("failed to build HTTP client")?;

    let state = AppState {
        fetcher: Arc::new(fetcher),
    };
    let app = create_app(state);

    // Bind to 0.0.0.0 by default to accept connections from any network
    // interface (required for Docker).
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid BIND_ADDR: {bind_addr}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("seo-audit-agent v{} listening on {}", VERSION, addr);

    axum::serve(listener, app).await?;
    Ok(())
}
