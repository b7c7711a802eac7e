// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router
//! directly without starting the full binary.

use crate::models::crawlability::{
    CrawlabilityReport, RobotsRule, SitemapDetail, SitemapType, SitemapTypeBreakdown,
};
use crate::models::version::VersionResponse;
use crate::services::audit::audit_crawlability;
use crate::services::fetch::PageFetcher;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared application state injected into every route handler via
/// `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// One HTTP client for all outbound audit fetches.
    pub fetcher: Arc<PageFetcher>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AuditParams {
    /// Fully-qualified URL of the page to audit.
    pub url: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(version_handler, crawlability_handler),
    components(schemas(
        VersionResponse,
        CrawlabilityReport,
        SitemapDetail,
        SitemapType,
        SitemapTypeBreakdown,
        RobotsRule
    ))
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, description = "Agent name and version", body = VersionResponse))
)]
pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        agent: "seo-audit-agent".to_string(),
        version: VERSION.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/audit/crawlability",
    params(AuditParams),
    responses(
        (status = 200, description = "Best-effort crawlability report", body = CrawlabilityReport),
        (status = 400, description = "Target URL is missing or unparseable")
    )
)]
pub async fn crawlability_handler(
    State(state): State<AppState>,
    Query(params): Query<AuditParams>,
) -> Result<Json<CrawlabilityReport>, (StatusCode, String)> {
    audit_crawlability(&state.fetcher, &params.url)
        .await
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/audit/crawlability", get(crawlability_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}
