// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Static files compiled into the binary.

use crate::errors::AppError;

pub const INDEX_HTML: &str = "index.html";
pub const FAVICON_ICO: &str = "favicon.ico";

const ASSETS: &[(&str, &[u8])] = &[
    (INDEX_HTML, include_bytes!("../assets/index.html")),
    (FAVICON_ICO, include_bytes!("../assets/favicon.ico")),
];

/// Looks up an embedded asset by name.
pub fn asset(name: &str) -> Result<&'static [u8], AppError> {
    ASSETS
        .iter()
        .find(|(asset_name, _)| *asset_name == name)
        .map(|(_, data)| *data)
        .ok_or_else(|| AppError::AssetNotFound(name.to_string()))
}
