// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Data model for the crawlability audit.
//!
//! Field names and JSON shape are the stable contract consumed by the audit
//! UI; the report serializes in camelCase to match the other audit sections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Semantic type of a fetched sitemap document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SitemapType {
    /// Plain `<urlset>` sitemap listing page URLs.
    Standard,
    /// `<sitemapindex>` referencing child sitemaps.
    Index,
    News,
    Image,
    Video,
    Mobile,
    Hreflang,
    Unknown,
}

/// A single allow/disallow rule from robots.txt, attributed to the
/// user-agent section it appeared under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RobotsRule {
    pub agent: String,
    pub pattern: String,
}

/// Parsed robots.txt directives for one origin.
///
/// Constructed once per audit; `exists: false` with empty collections means
/// the file could not be fetched (or returned a non-success status).
#[derive(Debug, Clone, Default)]
pub struct RobotsDirectives {
    pub exists: bool,
    /// User-agents in first-seen order, no duplicates.
    pub agents: Vec<String>,
    pub disallow_rules: Vec<RobotsRule>,
    pub allow_rules: Vec<RobotsRule>,
    /// `Sitemap:` URLs in original casing, deduplicated by exact string.
    pub declared_sitemaps: Vec<String>,
}

/// Everything learned about one fetched sitemap document.
///
/// A given URL is fetched and classified at most once per audit; records are
/// immutable after construction.
#[derive(Debug, Clone)]
pub struct SitemapRecord {
    pub url: String,
    pub kind: SitemapType,
    /// Count of `<url>` entries (zero for index-style documents).
    pub url_count: u32,
    pub has_lastmod: bool,
    pub has_priority: bool,
    pub has_changefreq: bool,
    /// True when the response carried `content-encoding: gzip`.
    pub is_compressed: bool,
    /// Decoded body length in bytes.
    pub size_bytes: u64,
    pub quality_issues: Vec<String>,
    /// `<loc>` values found inside `<sitemap>` blocks of this document.
    pub nested_sitemap_urls: Vec<String>,
}

/// Subset of a [`SitemapRecord`] exposed in the report, with the per-sitemap
/// improvement suggestions attached.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SitemapDetail {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: SitemapType,
    pub url_count: u32,
    pub has_lastmod: bool,
    pub quality_issues: Vec<String>,
    pub improvements: Vec<String>,
}

/// Count of discovered sitemaps per type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct SitemapTypeBreakdown {
    pub standard: u32,
    pub index: u32,
    pub news: u32,
    pub image: u32,
    pub video: u32,
    pub mobile: u32,
    pub hreflang: u32,
    pub unknown: u32,
}

impl SitemapTypeBreakdown {
    pub fn record(&mut self, kind: SitemapType) {
        let slot = match kind {
            SitemapType::Standard => &mut self.standard,
            SitemapType::Index => &mut self.index,
            SitemapType::News => &mut self.news,
            SitemapType::Image => &mut self.image,
            SitemapType::Video => &mut self.video,
            SitemapType::Mobile => &mut self.mobile,
            SitemapType::Hreflang => &mut self.hreflang,
            SitemapType::Unknown => &mut self.unknown,
        };
        *slot += 1;
    }

    /// Number of distinct sitemap types seen at least once.
    pub fn distinct_types(&self) -> u32 {
        [
            self.standard,
            self.index,
            self.news,
            self.image,
            self.video,
            self.mobile,
            self.hreflang,
            self.unknown,
        ]
        .iter()
        .filter(|&&count| count > 0)
        .count() as u32
    }
}

/// Aggregate output of one crawlability audit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrawlabilityReport {
    pub robots_txt_exists: bool,
    pub disallow_rules: Vec<RobotsRule>,
    pub allow_rules: Vec<RobotsRule>,
    pub declared_agents: Vec<String>,
    pub sitemap_exists: bool,
    /// Every sitemap URL the audit learned about (declared, probed or
    /// nested), first-seen order, no duplicates.
    pub all_discovered_sitemap_urls: Vec<String>,
    /// Sum of `<url>` entries over all successfully fetched sitemaps.
    pub total_url_count: u32,
    pub has_canonical: bool,
    pub canonical_url: String,
    pub sitemap_type_breakdown: SitemapTypeBreakdown,
    pub per_sitemap_details: Vec<SitemapDetail>,
    /// Deduplicated, in generation order.
    pub recommendations: Vec<String>,
    /// 0..=100 composite heuristic.
    pub crawlability_score: u32,
    pub generated_at: DateTime<Utc>,
}
