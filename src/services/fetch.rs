// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Shared HTTP fetch primitive for the audit pipeline.
//!
//! Every outbound request in an audit goes through [`PageFetcher`]. Fetch
//! failures are deliberately swallowed into `None`: a missing robots.txt, a
//! 404ing sitemap probe or a timed-out page must degrade the audit, never
//! abort it.

use anyhow::Result;
use flate2::read::GzDecoder;
use reqwest::header::CONTENT_ENCODING;
use std::io::Read;
use std::time::Duration;
use tracing::debug;

/// Leading bytes of a gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A successfully fetched document body.
pub struct FetchedDoc {
    /// Body text, inflated if the server sent gzip.
    pub body: String,
    /// True when the response carried `content-encoding: gzip`.
    pub gzip_encoded: bool,
}

/// Thin wrapper around a [`reqwest::Client`] with a bounded per-request
/// timeout and a fixed user agent.
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// GET a URL, returning `None` on any network error, timeout or
    /// non-success status.
    pub async fn get(&self, url: &str) -> Option<FetchedDoc> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url, error = %e, "fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(url, status = %response.status(), "non-success response");
            return None;
        }

        let gzip_encoded = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.eq_ignore_ascii_case("gzip"));

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(url, error = %e, "failed to read response body");
                return None;
            }
        };

        Some(FetchedDoc {
            body: decode_body(&bytes),
            gzip_encoded,
        })
    }
}

/// Inflate gzip bodies (compressed sitemaps are common), otherwise decode
/// as UTF-8, lossily for malformed real-world documents.
fn decode_body(bytes: &[u8]) -> String {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut inflated = String::new();
        if GzDecoder::new(bytes).read_to_string(&mut inflated).is_ok() {
            return inflated;
        }
    }
    String::from_utf8_lossy(bytes).into_owned()
}
