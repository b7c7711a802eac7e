// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod audit;
pub mod canonical;
pub mod discovery;
pub mod fetch;
pub mod robots;
pub mod sitemap;
