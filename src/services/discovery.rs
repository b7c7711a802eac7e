// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Sitemap discovery engine.
//!
//! Explores the sitemap reference graph for one origin in four ordered
//! phases: robots-declared seeds, well-known fallback paths, numeric naming
//! conventions, and transitive expansion of nested sitemap-index references.
//! All state (visited set, pending queue, results) lives in a per-audit
//! [`DiscoverySession`]; nothing is shared across audits.

use crate::models::crawlability::SitemapRecord;
use crate::services::fetch::{FetchedDoc, PageFetcher};
use crate::services::sitemap;
use futures::future;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Well-known sitemap locations probed when robots.txt declares none.
/// Priority order; probing stops at the first hit.
const COMMON_SITEMAP_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap-index.xml",
    "/sitemap-0.xml",
    "/sitemap_0.xml",
    "/sitemap-posts.xml",
    "/sitemap-pages.xml",
    "/sitemap-products.xml",
    "/sitemap-categories.xml",
    "/sitemap-news.xml",
    "/sitemap-video.xml",
    "/sitemap-image.xml",
    "/sitemap/sitemap.xml",
    "/wp-sitemap.xml",  // WordPress
    "/sitemapindex.xml", // Magento and others
];

/// Highest numeric suffix probed per naming convention.
const NUMERIC_PROBE_LIMIT: u32 = 5;

/// Outcome of a probe for one candidate URL.
enum Probe {
    /// Fetched and classified; a record was added.
    Found,
    /// Fetch failed or returned non-success.
    Missing,
    /// URL was already processed earlier in this audit.
    AlreadySeen,
}

/// What one discovery run learned.
pub struct DiscoveryOutcome {
    pub sitemap_exists: bool,
    /// Sum of `<url>` entries over all fetched sitemaps.
    pub total_url_count: u32,
    /// Every sitemap URL the audit learned about: declared seeds, successful
    /// probes and nested references. First-seen order, no duplicates.
    pub discovered_urls: Vec<String>,
    pub records: Vec<SitemapRecord>,
}

impl DiscoveryOutcome {
    /// Number of nested references seen across all fetched documents.
    pub fn nested_reference_count(&self) -> usize {
        self.records
            .iter()
            .map(|record| record.nested_sitemap_urls.len())
            .sum()
    }
}

/// Per-audit discovery state. Construct, call [`run`](Self::run) once,
/// discard.
pub struct DiscoverySession<'a> {
    fetcher: &'a PageFetcher,
    visited: HashSet<String>,
    pending_nested: VecDeque<String>,
    records: Vec<SitemapRecord>,
    discovered_urls: Vec<String>,
    sitemap_exists: bool,
    total_url_count: u32,
}

impl<'a> DiscoverySession<'a> {
    pub fn new(fetcher: &'a PageFetcher) -> Self {
        Self {
            fetcher,
            visited: HashSet::new(),
            pending_nested: VecDeque::new(),
            records: Vec::new(),
            discovered_urls: Vec::new(),
            sitemap_exists: false,
            total_url_count: 0,
        }
    }

    /// Run all discovery phases against `origin`, starting from the
    /// robots-declared `seeds`.
    pub async fn run(mut self, origin: &str, seeds: &[String]) -> DiscoveryOutcome {
        self.seed_phase(seeds).await;
        if !self.sitemap_exists {
            self.fallback_phase(origin).await;
        }
        if self.sitemap_exists {
            self.numeric_phase(origin).await;
        }
        self.drain_nested().await;

        DiscoveryOutcome {
            sitemap_exists: self.sitemap_exists,
            total_url_count: self.total_url_count,
            discovered_urls: self.discovered_urls,
            records: self.records,
        }
    }

    /// Phase 1: fetch every robots-declared sitemap. Seeds are independent
    /// once known, so they are fetched concurrently; classification runs
    /// afterwards in declaration order. Declared URLs count as discovered
    /// even when they fail to fetch, since robots.txt vouches for them.
    async fn seed_phase(&mut self, seeds: &[String]) {
        let mut unique = Vec::new();
        for seed in seeds {
            self.track_discovered(seed);
            if self.visited.insert(seed.clone()) {
                unique.push(seed.clone());
            }
        }

        let fetcher = self.fetcher;
        let fetches = future::join_all(unique.iter().map(|url| fetcher.get(url))).await;

        for (url, doc) in unique.into_iter().zip(fetches) {
            match doc {
                Some(doc) => self.record_sitemap(url, doc),
                None => debug!(%url, "declared sitemap did not resolve"),
            }
        }
    }

    /// Phase 2: probe well-known paths in priority order, stopping at the
    /// first one that resolves.
    async fn fallback_phase(&mut self, origin: &str) {
        for path in COMMON_SITEMAP_PATHS {
            let url = format!("{origin}{path}");
            if let Probe::Found = self.probe(&url).await {
                self.track_discovered(&url);
                break;
            }
        }
    }

    /// Phase 3: probe `sitemap-N.xml` and `sitemap_N.xml` for N = 0..=5.
    /// Strictly sequential per convention: the first miss ends that
    /// convention without skipping ahead.
    async fn numeric_phase(&mut self, origin: &str) {
        for stem in ["sitemap-", "sitemap_"] {
            for n in 0..=NUMERIC_PROBE_LIMIT {
                let url = format!("{origin}/{stem}{n}.xml");
                match self.probe(&url).await {
                    Probe::Found => self.track_discovered(&url),
                    Probe::AlreadySeen => {}
                    Probe::Missing => break,
                }
            }
        }
    }

    /// Phase 4: drain the nested-reference queue until empty. Classifying a
    /// nested sitemap index enqueues its own children, so this expands the
    /// reference graph transitively; the visited set breaks cycles.
    async fn drain_nested(&mut self) {
        while let Some(url) = self.pending_nested.pop_front() {
            self.probe(&url).await;
        }
    }

    /// Per-URL fetch+classify routine shared by all phases. The visited set
    /// guarantees each URL contributes to the totals at most once per audit.
    async fn probe(&mut self, url: &str) -> Probe {
        if !self.visited.insert(url.to_string()) {
            return Probe::AlreadySeen;
        }
        match self.fetcher.get(url).await {
            Some(doc) => {
                self.record_sitemap(url.to_string(), doc);
                Probe::Found
            }
            None => Probe::Missing,
        }
    }

    /// Classify a fetched document, enqueue its nested references and
    /// accumulate it into the session results.
    fn record_sitemap(&mut self, url: String, doc: FetchedDoc) {
        let kind = sitemap::classify(&url, &doc.body);
        let nested = sitemap::nested_references(&doc.body);
        for reference in &nested {
            self.track_discovered(reference);
            self.pending_nested.push_back(reference.clone());
        }

        let record = SitemapRecord {
            url,
            kind,
            url_count: sitemap::count_url_entries(&doc.body),
            has_lastmod: doc.body.contains("<lastmod>"),
            has_priority: doc.body.contains("<priority>"),
            has_changefreq: doc.body.contains("<changefreq>"),
            is_compressed: doc.gzip_encoded,
            size_bytes: doc.body.len() as u64,
            quality_issues: sitemap::analyze_quality(&doc.body, kind),
            nested_sitemap_urls: nested,
        };

        debug!(url = %record.url, kind = ?record.kind, urls = record.url_count, "classified sitemap");
        self.sitemap_exists = true;
        self.total_url_count += record.url_count;
        self.records.push(record);
    }

    /// Remember a sitemap URL in first-seen order without duplicates.
    fn track_discovered(&mut self, url: &str) {
        if !self.discovered_urls.iter().any(|known| known == url) {
            self.discovered_urls.push(url.to_string());
        }
    }
}
