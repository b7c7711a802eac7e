// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Sitemap classification, quality analysis and per-sitemap recommendations.
//!
//! Classification is substring-based on purpose: sitemaps in the wild are
//! frequently malformed and a strict XML parse would reject documents that
//! crawlers happily consume. The quick-classify routines here are the single
//! place to swap in a real XML parser if that ever changes.

use crate::models::crawlability::{SitemapRecord, SitemapType};

/// Sitemap protocol size limit (50 MB).
const MAX_SITEMAP_BYTES: u64 = 50 * 1024 * 1024;
/// Sitemap protocol entry limit per file.
const MAX_SITEMAP_URLS: u32 = 50_000;
/// Above this size an uncompressed sitemap gets a gzip suggestion (1 MB).
const COMPRESSION_HINT_BYTES: u64 = 1024 * 1024;

/// Determine the sitemap type from URL and content markers.
///
/// Rule order matters: several markers can co-occur (a news sitemap still
/// contains `<urlset`), so the most specific checks run first.
pub fn classify(url: &str, content: &str) -> SitemapType {
    if content.contains("<sitemapindex") {
        SitemapType::Index
    } else if content.contains("news:news") || url.contains("news-sitemap") {
        SitemapType::News
    } else if content.contains("image:image") || url.contains("image-sitemap") {
        SitemapType::Image
    } else if content.contains("video:video") || url.contains("video-sitemap") {
        SitemapType::Video
    } else if content.contains("mobile:mobile") || url.contains("mobile-sitemap") {
        SitemapType::Mobile
    } else if content.contains("hreflang") && content.contains("alternate") {
        SitemapType::Hreflang
    } else if content.contains("<urlset") {
        SitemapType::Standard
    } else {
        SitemapType::Unknown
    }
}

/// Flag structural and content quality issues. Flags are independent, not
/// mutually exclusive.
pub fn analyze_quality(content: &str, kind: SitemapType) -> Vec<String> {
    let mut issues = Vec::new();

    let has_closing_root = content.contains("</urlset>") || content.contains("</sitemapindex>");
    if !content.contains("<?xml") || !has_closing_root {
        issues.push("Potential XML syntax errors detected".to_string());
    }

    if !content.contains("<lastmod>") {
        issues.push("Missing lastmod dates".to_string());
    }

    if content.len() as u64 > MAX_SITEMAP_BYTES {
        issues.push("Sitemap exceeds recommended 50MB size limit".to_string());
    }

    if kind == SitemapType::Standard && count_url_entries(content) > MAX_SITEMAP_URLS {
        issues.push(
            "Exceeds 50,000 URL limit, consider splitting into multiple sitemaps".to_string(),
        );
    }

    issues
}

/// Count `<url>` entries in a sitemap body.
pub fn count_url_entries(content: &str) -> u32 {
    content.matches("<url>").count() as u32
}

/// Extract `<loc>` values from every `<sitemap>…</sitemap>` block, i.e. the
/// child references of a sitemap index.
pub fn nested_references(content: &str) -> Vec<String> {
    let mut references = Vec::new();
    let mut rest = content;

    while let Some(start) = rest.find("<sitemap>") {
        let after = &rest[start + "<sitemap>".len()..];
        let Some(end) = after.find("</sitemap>") else {
            break;
        };
        if let Some(loc) = tag_value(&after[..end], "loc") {
            references.push(loc);
        }
        rest = &after[end + "</sitemap>".len()..];
    }

    references
}

/// Value of the first `<tag>…</tag>` pair in `block`, trimmed, if non-empty.
fn tag_value(block: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = block.find(&open)? + open.len();
    let end = block[start..].find(&close)? + start;
    let value = block[start..end].trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Type-specific improvement suggestions for one sitemap record.
pub fn improvement_recommendations(record: &SitemapRecord) -> Vec<String> {
    let mut improvements = Vec::new();

    match record.kind {
        SitemapType::Standard => {
            if !record.has_lastmod {
                improvements.push(
                    "Add lastmod dates to help search engines identify updated content"
                        .to_string(),
                );
            }
            if !record.has_priority || !record.has_changefreq {
                improvements.push(
                    "Consider adding priority and changefreq attributes for better crawl guidance"
                        .to_string(),
                );
            }
        }
        SitemapType::Index => {
            if record.nested_sitemap_urls.len() < 2 {
                improvements.push(
                    "Your sitemap index contains few child sitemaps. Consider organizing content into more specific sitemaps"
                        .to_string(),
                );
            }
        }
        SitemapType::News => {
            if !record.has_lastmod {
                improvements
                    .push("News sitemaps require lastmod dates for all entries".to_string());
            }
            improvements.push(
                "Ensure news sitemaps contain articles published in the last 48 hours".to_string(),
            );
        }
        SitemapType::Image => {
            improvements.push(
                "Ensure all images have descriptive captions and titles for better image SEO"
                    .to_string(),
            );
        }
        SitemapType::Video => {
            improvements.push(
                "Add thumbnail, title, description and duration for all video entries".to_string(),
            );
        }
        SitemapType::Hreflang => {
            improvements.push(
                "Ensure hreflang annotations correctly reference all language/region variants"
                    .to_string(),
            );
        }
        SitemapType::Mobile | SitemapType::Unknown => {}
    }

    if !record.quality_issues.is_empty() {
        improvements.push(format!(
            "Fix detected issues: {}",
            record.quality_issues.join(", ")
        ));
    }

    if !record.is_compressed && record.size_bytes > COMPRESSION_HINT_BYTES {
        improvements.push(
            "Consider compressing your sitemap with gzip for faster processing".to_string(),
        );
    }

    improvements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: SitemapType) -> SitemapRecord {
        SitemapRecord {
            url: "https://example.com/sitemap.xml".to_string(),
            kind,
            url_count: 0,
            has_lastmod: true,
            has_priority: true,
            has_changefreq: true,
            is_compressed: true,
            size_bytes: 1024,
            quality_issues: vec![],
            nested_sitemap_urls: vec![],
        }
    }

    #[test]
    fn test_classify_index_wins_over_urlset() {
        // Both markers present: the index rule has priority.
        let content = "<?xml version=\"1.0\"?><sitemapindex><urlset></urlset></sitemapindex>";
        assert_eq!(
            classify("https://example.com/sitemap.xml", content),
            SitemapType::Index
        );
    }

    #[test]
    fn test_classify_by_url_hint() {
        assert_eq!(
            classify("https://example.com/news-sitemap.xml", "<urlset>"),
            SitemapType::News
        );
        assert_eq!(
            classify("https://example.com/image-sitemap.xml", "<urlset>"),
            SitemapType::Image
        );
    }

    #[test]
    fn test_classify_hreflang_requires_both_markers() {
        assert_eq!(
            classify("https://example.com/s.xml", "<urlset> hreflang"),
            SitemapType::Standard
        );
        assert_eq!(
            classify(
                "https://example.com/s.xml",
                "<urlset> hreflang alternate </urlset>"
            ),
            SitemapType::Hreflang
        );
    }

    #[test]
    fn test_classify_unknown_content() {
        assert_eq!(
            classify("https://example.com/s.xml", "<html></html>"),
            SitemapType::Unknown
        );
    }

    #[test]
    fn test_analyze_quality_well_formed_with_lastmod() {
        let content = "<?xml version=\"1.0\"?><urlset><url><lastmod>2026-01-01</lastmod></url></urlset>";
        assert!(analyze_quality(content, SitemapType::Standard).is_empty());
    }

    #[test]
    fn test_analyze_quality_flags_missing_declaration_and_lastmod() {
        let issues = analyze_quality("<urlset></urlset>", SitemapType::Standard);
        assert_eq!(
            issues,
            vec![
                "Potential XML syntax errors detected".to_string(),
                "Missing lastmod dates".to_string(),
            ]
        );
    }

    #[test]
    fn test_nested_references_extraction() {
        let content = "<?xml version=\"1.0\"?><sitemapindex>\
            <sitemap><loc>https://example.com/a.xml</loc></sitemap>\
            <sitemap><loc> https://example.com/b.xml </loc></sitemap>\
            <sitemap><lastmod>2026-01-01</lastmod></sitemap>\
            </sitemapindex>";
        assert_eq!(
            nested_references(content),
            vec![
                "https://example.com/a.xml".to_string(),
                "https://example.com/b.xml".to_string(),
            ]
        );
    }

    #[test]
    fn test_nested_references_tolerates_unclosed_block() {
        assert!(nested_references("<sitemap><loc>https://example.com/a.xml</loc>").is_empty());
    }

    #[test]
    fn test_count_url_entries() {
        assert_eq!(count_url_entries("<urlset><url></url><url></url></urlset>"), 2);
    }

    #[test]
    fn test_improvements_standard_missing_metadata() {
        let mut sitemap = record(SitemapType::Standard);
        sitemap.has_lastmod = false;
        sitemap.has_priority = false;

        let improvements = improvement_recommendations(&sitemap);
        assert!(improvements
            .iter()
            .any(|i| i.contains("Add lastmod dates")));
        assert!(improvements
            .iter()
            .any(|i| i.contains("priority and changefreq")));
    }

    #[test]
    fn test_improvements_index_with_few_children() {
        let mut sitemap = record(SitemapType::Index);
        sitemap.nested_sitemap_urls = vec!["https://example.com/a.xml".to_string()];

        let improvements = improvement_recommendations(&sitemap);
        assert!(improvements.iter().any(|i| i.contains("few child sitemaps")));
    }

    #[test]
    fn test_improvements_news_always_gets_freshness_reminder() {
        let improvements = improvement_recommendations(&record(SitemapType::News));
        assert!(improvements.iter().any(|i| i.contains("last 48 hours")));
    }

    #[test]
    fn test_improvements_consolidates_quality_issues() {
        let mut sitemap = record(SitemapType::Unknown);
        sitemap.quality_issues = vec!["Missing lastmod dates".to_string()];

        let improvements = improvement_recommendations(&sitemap);
        assert_eq!(
            improvements,
            vec!["Fix detected issues: Missing lastmod dates".to_string()]
        );
    }

    #[test]
    fn test_improvements_large_uncompressed_sitemap() {
        let mut sitemap = record(SitemapType::Standard);
        sitemap.is_compressed = false;
        sitemap.size_bytes = 2 * 1024 * 1024;

        let improvements = improvement_recommendations(&sitemap);
        assert!(improvements.iter().any(|i| i.contains("compressing")));
    }
}
