// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Mnemo screenshot API

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Mnemo API {}", VERSION_NUMBER)
}
