// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Robots.txt loading and tolerant line-by-line parsing.
//!
//! The parser is intentionally permissive: real-world robots files are full
//! of malformed lines, and a broken line must never fail the audit. Anything
//! unrecognized is skipped.

use crate::models::crawlability::{RobotsDirectives, RobotsRule};
use crate::services::fetch::PageFetcher;

/// Fetch and parse `<origin>/robots.txt`.
///
/// Never fails: a fetch error or non-success status yields directives with
/// `exists: false` and empty collections so the rest of the pipeline can
/// degrade gracefully.
pub async fn load(fetcher: &PageFetcher, origin: &str) -> RobotsDirectives {
    let robots_url = format!("{origin}/robots.txt");
    match fetcher.get(&robots_url).await {
        Some(doc) => parse(&doc.body),
        None => RobotsDirectives::default(),
    }
}

/// Parse a robots.txt body into directives.
///
/// Directive keywords are matched case-insensitively; `Sitemap:` values keep
/// their original casing because sitemap URLs are case-sensitive. A
/// `User-agent:` line sets the attribution context for the rules that follow
/// it; the default context is `*`.
pub fn parse(body: &str) -> RobotsDirectives {
    let mut directives = RobotsDirectives {
        exists: true,
        ..RobotsDirectives::default()
    };
    let mut current_agent = "*".to_string();

    for line in body.lines() {
        let trimmed = line.trim();
        let lowered = trimmed.to_lowercase();

        if let Some(value) = lowered.strip_prefix("user-agent:") {
            current_agent = value.trim().to_string();
            if !directives.agents.contains(&current_agent) {
                directives.agents.push(current_agent.clone());
            }
        } else if let Some(value) = lowered.strip_prefix("disallow:") {
            push_rule(&mut directives.disallow_rules, &current_agent, value);
        } else if let Some(value) = lowered.strip_prefix("allow:") {
            push_rule(&mut directives.allow_rules, &current_agent, value);
        } else if lowered.starts_with("sitemap:") {
            // Take the value from the original-case line, not the lowered one.
            let value = trimmed.get("sitemap:".len()..).unwrap_or("").trim();
            if !value.is_empty() && !directives.declared_sitemaps.iter().any(|s| s == value) {
                directives.declared_sitemaps.push(value.to_string());
            }
        }
    }

    directives
}

/// Record a rule unless its value is empty (an empty `Disallow:` means
/// "allow everything" and carries no pattern worth reporting).
fn push_rule(rules: &mut Vec<RobotsRule>, agent: &str, value: &str) {
    let pattern = value.trim();
    if !pattern.is_empty() {
        rules.push(RobotsRule {
            agent: agent.to_string(),
            pattern: pattern.to_string(),
        });
    }
}
