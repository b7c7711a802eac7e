// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! End-to-end audit scenarios against a mocked upstream site.

use seo_audit_agent::services::audit::audit_crawlability;
use seo_audit_agent::services::fetch::PageFetcher;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_fetcher() -> PageFetcher {
    PageFetcher::new("SeoAuditBot/test", Duration::from_secs(2)).expect("failed to build fetcher")
}

/// A well-formed standard sitemap with `url_count` entries.
fn standard_sitemap(url_count: usize) -> String {
    let mut body = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset>");
    for i in 0..url_count {
        body.push_str(&format!(
            "<url><loc>https://example.com/page-{i}</loc><lastmod>2026-01-01</lastmod></url>"
        ));
    }
    body.push_str("</urlset>");
    body
}

async fn mount_ok(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_healthy_site_with_declared_sitemap_and_canonical() {
    let server = MockServer::start().await;
    let origin = server.uri();

    mount_ok(
        &server,
        "/robots.txt",
        format!("User-agent: *\nDisallow: /admin\nSitemap: {origin}/sitemap.xml\n"),
    )
    .await;
    mount_ok(&server, "/sitemap.xml", standard_sitemap(120)).await;
    mount_ok(
        &server,
        "/",
        format!(
            "<html><head><link rel=\"canonical\" href=\"{origin}/\"></head><body></body></html>"
        ),
    )
    .await;

    let report = audit_crawlability(&test_fetcher(), &format!("{origin}/"))
        .await
        .unwrap();

    assert!(report.robots_txt_exists);
    assert_eq!(report.declared_agents, vec!["*"]);
    assert_eq!(report.disallow_rules.len(), 1);
    assert!(report.sitemap_exists);
    assert_eq!(report.total_url_count, 120);
    assert!(report.has_canonical);
    assert_eq!(report.canonical_url, format!("{origin}/"));
    assert_eq!(report.sitemap_type_breakdown.standard, 1);
    assert_eq!(
        report.all_discovered_sitemap_urls,
        vec![format!("{origin}/sitemap.xml")]
    );

    // 25 robots + 25 sitemap + 15 canonical + 10 declared-in-robots
    // + 5 url-count bonus; no multi-sitemap or multi-type bonus.
    assert_eq!(report.crawlability_score, 80);

    assert!(!report
        .recommendations
        .iter()
        .any(|r| r.contains("Create a robots.txt")));
    assert!(!report
        .recommendations
        .iter()
        .any(|r| r.contains("Create a sitemap.xml")));
}

#[tokio::test]
async fn test_bare_site_scores_zero_with_creation_recommendations() {
    // No robots.txt, no sitemap at any fallback path, no canonical tag:
    // every fetch 404s but the audit still returns a usable report.
    let server = MockServer::start().await;
    let target = format!("{}/page", server.uri());

    let report = audit_crawlability(&test_fetcher(), &target).await.unwrap();

    assert!(!report.robots_txt_exists);
    assert!(!report.sitemap_exists);
    assert!(!report.has_canonical);
    assert!(report.canonical_url.is_empty());
    assert_eq!(report.total_url_count, 0);
    assert_eq!(report.crawlability_score, 0);
    assert!(report.per_sitemap_details.is_empty());

    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("Create a robots.txt file")));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("Create a sitemap.xml file")));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("Add canonical tags")));
}

#[tokio::test]
async fn test_sitemap_index_expands_nested_children() {
    let server = MockServer::start().await;
    let origin = server.uri();

    mount_ok(
        &server,
        "/robots.txt",
        format!("User-agent: *\nSitemap: {origin}/sitemap_index.xml\n"),
    )
    .await;
    mount_ok(
        &server,
        "/sitemap_index.xml",
        format!(
            "<?xml version=\"1.0\"?><sitemapindex>\
             <sitemap><loc>{origin}/sitemap-posts.xml</loc></sitemap>\
             <sitemap><loc>{origin}/sitemap-pages.xml</loc></sitemap>\
             </sitemapindex>"
        ),
    )
    .await;
    mount_ok(&server, "/sitemap-posts.xml", standard_sitemap(30)).await;
    mount_ok(&server, "/sitemap-pages.xml", standard_sitemap(40)).await;

    let report = audit_crawlability(&test_fetcher(), &format!("{origin}/"))
        .await
        .unwrap();

    assert!(report.sitemap_exists);
    // Index contributes 0 urls, children 30 and 40.
    assert_eq!(report.total_url_count, 70);
    assert_eq!(report.sitemap_type_breakdown.index, 1);
    assert_eq!(report.sitemap_type_breakdown.standard, 2);
    assert_eq!(report.per_sitemap_details.len(), 3);

    // 25 robots + 25 sitemap + 10 declared + 3 discovered-count bonus
    // + 5 url-count bonus + 6 (two distinct types).
    assert_eq!(report.crawlability_score, 74);
}

#[tokio::test]
async fn test_report_serves_camel_case_json_over_http() {
    use axum::body::Body;
    use axum::http::Request;
    use seo_audit_agent::app::{create_app, AppState};
    use std::sync::Arc;
    use tower::ServiceExt;

    let server = MockServer::start().await;
    let origin = server.uri();
    mount_ok(
        &server,
        "/robots.txt",
        format!("Sitemap: {origin}/sitemap.xml\n"),
    )
    .await;
    mount_ok(&server, "/sitemap.xml", standard_sitemap(3)).await;

    let app = create_app(AppState {
        fetcher: Arc::new(test_fetcher()),
    });

    let encoded: String =
        url::form_urlencoded::byte_serialize(format!("{origin}/").as_bytes()).collect();
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/audit/crawlability?url={encoded}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["robotsTxtExists"], true);
    assert_eq!(json["sitemapExists"], true);
    assert_eq!(json["totalUrlCount"], 3);
    assert_eq!(json["perSitemapDetails"][0]["type"], "standard");
    assert!(json["crawlabilityScore"].is_number());
    assert!(json["generatedAt"].is_string());
}
