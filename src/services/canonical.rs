// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Canonical link tag probe for the audited page itself.

use crate::services::fetch::PageFetcher;
use scraper::Html;

/// Result of scanning the target page for a canonical link tag.
#[derive(Debug, Clone, Default)]
pub struct CanonicalProbe {
    pub has_canonical: bool,
    pub canonical_url: String,
}

/// Fetch the target page and look for `<link rel="canonical" href="…">`.
///
/// Attribute order does not matter; the HTML parser normalizes it. Any fetch
/// failure or a page without the tag yields the empty default.
pub async fn probe(fetcher: &PageFetcher, target_url: &str) -> CanonicalProbe {
    let Some(doc) = fetcher.get(target_url).await else {
        return CanonicalProbe::default();
    };
    extract(&doc.body)
}

/// Scan an HTML document for the canonical link href.
pub fn extract(html: &str) -> CanonicalProbe {
    let document = Html::parse_document(html);
    let Ok(selector) = scraper::Selector::parse(r#"link[rel="canonical"]"#) else {
        return CanonicalProbe::default();
    };

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if !href.is_empty() {
                return CanonicalProbe {
                    has_canonical: true,
                    canonical_url: href.to_string(),
                };
            }
        }
    }

    CanonicalProbe::default()
}
