// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Crawlability audit agent: fetches a site's robots.txt, discovers and
//! classifies its sitemaps, probes the target page for a canonical tag and
//! derives a composite crawlability score with recommendations.

pub mod app;
pub mod models;
pub mod services;
