// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Crawlability audit aggregator.
//!
//! Orchestrates the robots loader, the sitemap discovery engine and the
//! canonical probe, then folds their signals into recommendations and a
//! composite 0-100 score. Upstream fetch failures never surface here; the
//! only caller-visible error is a target URL no origin can be derived from.

use crate::models::crawlability::{
    CrawlabilityReport, RobotsDirectives, SitemapDetail, SitemapTypeBreakdown,
};
use crate::services::canonical::{self, CanonicalProbe};
use crate::services::discovery::{DiscoveryOutcome, DiscoverySession};
use crate::services::fetch::PageFetcher;
use crate::services::{robots, sitemap};
use chrono::Utc;
use thiserror::Error;
use tracing::{info, info_span, Instrument};
use url::Url;
use uuid::Uuid;

/// The one error an audit can surface: invalid input. Everything upstream
/// degrades to an empty-handed report instead.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("invalid target URL: {0}")]
    InvalidTargetUrl(#[from] url::ParseError),
    #[error("target URL has no host")]
    MissingHost,
}

/// Audit the crawlability of `target_url`.
///
/// Always returns a best-effort report once the URL parses; if every
/// sub-fetch fails the report simply records that nothing was found and the
/// score floors near zero.
pub async fn audit_crawlability(
    fetcher: &PageFetcher,
    target_url: &str,
) -> Result<CrawlabilityReport, AuditError> {
    let parsed = Url::parse(target_url)?;
    if parsed.host_str().is_none() {
        return Err(AuditError::MissingHost);
    }
    let origin = parsed.origin().ascii_serialization();

    let audit_id = Uuid::now_v7();
    let span = info_span!("crawlability_audit", %audit_id, target = %target_url);
    Ok(run_audit(fetcher, target_url, &origin).instrument(span).await)
}

/// Run the pipeline: discovery depends on the robots seeds, so those two run
/// in sequence; the canonical probe is independent and runs alongside them.
async fn run_audit(fetcher: &PageFetcher, target_url: &str, origin: &str) -> CrawlabilityReport {
    let discovery_chain = async {
        let directives = robots::load(fetcher, origin).await;
        let outcome = DiscoverySession::new(fetcher)
            .run(origin, &directives.declared_sitemaps)
            .await;
        (directives, outcome)
    };

    let ((directives, outcome), canonical_probe) =
        tokio::join!(discovery_chain, canonical::probe(fetcher, target_url));

    let report = assemble_report(&directives, &outcome, &canonical_probe);
    info!(
        score = report.crawlability_score,
        sitemaps = report.per_sitemap_details.len(),
        urls = report.total_url_count,
        "audit complete"
    );
    report
}

fn assemble_report(
    directives: &RobotsDirectives,
    outcome: &DiscoveryOutcome,
    canonical_probe: &CanonicalProbe,
) -> CrawlabilityReport {
    let mut breakdown = SitemapTypeBreakdown::default();
    for record in &outcome.records {
        breakdown.record(record.kind);
    }

    let details = outcome
        .records
        .iter()
        .map(|record| SitemapDetail {
            url: record.url.clone(),
            kind: record.kind,
            url_count: record.url_count,
            has_lastmod: record.has_lastmod,
            quality_issues: record.quality_issues.clone(),
            improvements: sitemap::improvement_recommendations(record),
        })
        .collect();

    let recommendations = build_recommendations(directives, outcome, &breakdown, canonical_probe);
    let score = calculate_score(&ScoreInput {
        robots_txt_exists: directives.exists,
        sitemap_exists: outcome.sitemap_exists,
        has_canonical: canonical_probe.has_canonical,
        sitemap_declared_in_robots: !directives.declared_sitemaps.is_empty(),
        discovered_sitemap_count: outcome.discovered_urls.len(),
        total_url_count: outcome.total_url_count,
        distinct_sitemap_types: breakdown.distinct_types(),
    });

    CrawlabilityReport {
        robots_txt_exists: directives.exists,
        disallow_rules: directives.disallow_rules.clone(),
        allow_rules: directives.allow_rules.clone(),
        declared_agents: directives.agents.clone(),
        sitemap_exists: outcome.sitemap_exists,
        all_discovered_sitemap_urls: outcome.discovered_urls.clone(),
        total_url_count: outcome.total_url_count,
        has_canonical: canonical_probe.has_canonical,
        canonical_url: canonical_probe.canonical_url.clone(),
        sitemap_type_breakdown: breakdown,
        per_sitemap_details: details,
        recommendations,
        crawlability_score: score,
        generated_at: Utc::now(),
    }
}

/// Signals feeding the composite score.
struct ScoreInput {
    robots_txt_exists: bool,
    sitemap_exists: bool,
    has_canonical: bool,
    sitemap_declared_in_robots: bool,
    discovered_sitemap_count: usize,
    total_url_count: u32,
    distinct_sitemap_types: u32,
}

/// Purely additive scoring, capped at 100.
fn calculate_score(input: &ScoreInput) -> u32 {
    let mut score = 0;

    if input.robots_txt_exists {
        score += 25;
    }
    if input.sitemap_exists {
        score += 25;
    }
    if input.has_canonical {
        score += 15;
    }
    if input.sitemap_declared_in_robots {
        score += 10;
    }
    if input.discovered_sitemap_count > 1 {
        score += (input.discovered_sitemap_count as u32).min(5);
    }
    if input.total_url_count > 50 {
        score += 5;
    }
    if input.distinct_sitemap_types > 1 {
        score += (input.distinct_sitemap_types * 3).min(15);
    }

    score.min(100)
}

/// Assemble the recommendation list: top-level guidance first, then
/// per-sitemap improvements, then missing-type and canonical suggestions.
/// The final list is deduplicated keeping first occurrences.
fn build_recommendations(
    directives: &RobotsDirectives,
    outcome: &DiscoveryOutcome,
    breakdown: &SitemapTypeBreakdown,
    canonical_probe: &CanonicalProbe,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !directives.exists {
        recommendations
            .push("Create a robots.txt file to guide search engine crawlers.".to_string());
    } else if directives.disallow_rules.is_empty() {
        recommendations.push(
            "Consider adding specific disallow rules to prevent crawling of non-essential pages."
                .to_string(),
        );
    }

    if !outcome.sitemap_exists {
        recommendations.push(
            "Create a sitemap.xml file to help search engines discover your content.".to_string(),
        );
    } else if outcome.total_url_count < 10 && outcome.nested_reference_count() == 0 {
        recommendations.push(
            "Your sitemap contains few URLs. Make sure all important pages are included."
                .to_string(),
        );
    }

    if outcome.sitemap_exists && directives.exists && directives.declared_sitemaps.is_empty() {
        recommendations
            .push("Add your sitemap URL to your robots.txt file for better discovery.".to_string());
    }

    for record in &outcome.records {
        recommendations.extend(sitemap::improvement_recommendations(record));
    }

    if outcome.sitemap_exists {
        missing_type_recommendations(&mut recommendations, directives, outcome, breakdown);
    }

    if !canonical_probe.has_canonical {
        recommendations.push("Add canonical tags to prevent duplicate content issues.".to_string());
    }

    dedup_preserving_order(recommendations)
}

/// Suggest commonly missing sitemap types when context hints they would help.
fn missing_type_recommendations(
    recommendations: &mut Vec<String>,
    directives: &RobotsDirectives,
    outcome: &DiscoveryOutcome,
    breakdown: &SitemapTypeBreakdown,
) {
    if breakdown.image == 0 {
        recommendations.push(
            "Consider adding an image sitemap if your site contains important images.".to_string(),
        );
    }

    let has_timely_content = outcome
        .records
        .iter()
        .any(|record| record.url.contains("blog") || record.url.contains("news"));
    if breakdown.news == 0 && has_timely_content {
        recommendations.push(
            "Consider adding a news sitemap for timely content like blog posts or news articles."
                .to_string(),
        );
    }

    let targets_mobile_bot = directives
        .agents
        .iter()
        .any(|agent| agent.contains("googlebot-mobile"));
    if breakdown.hreflang == 0 && targets_mobile_bot {
        recommendations.push(
            "Consider adding hreflang annotations if your site targets multiple languages or regions."
                .to_string(),
        );
    }
}

/// Drop duplicate strings, keeping the first occurrence of each.
fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
