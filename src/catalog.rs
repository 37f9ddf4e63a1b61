// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Static catalog of ERNIE model identifiers

use serde::Serialize;

/// One model known to the harness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelCatalogEntry {
    /// Model identifier used in requests
    pub id: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
}

// Display names are kept byte-for-byte as published, leading spaces included.
static MODELS: [ModelCatalogEntry; 10] = [
    entry("ernie-3.5", "文心大模型（ernie-3.5）"),
    entry("ernie-turbo", "文心大模型（ernie-turbo）"),
    entry("ernie-4.0", "文心大模型（ernie-4.0）"),
    entry("ernie-3.5-8k", "文心大模型（ernie-3.5-8k）"),
    entry("ernie-speed", " 文心大模型（ernie-speed）"),
    entry("ernie-speed-128k", " 文心大模型（ernie-speed-128k）"),
    entry("ernie-tiny-8k", " 文心大模型（ernie-tiny-8k）"),
    entry("ernie-char-8k", " 文心大模型（ernie-char-8k）"),
    entry("ernie-text-embedding", "文心百中语义模型"),
    entry("ernie-vilg-v2", "文心一格模型"),
];

const fn entry(id: &'static str, display_name: &'static str) -> ModelCatalogEntry {
    ModelCatalogEntry { id, display_name }
}

/// List the available models in catalog order
pub fn list() -> &'static [ModelCatalogEntry] {
    &MODELS
}

/// Look up a model by id
pub fn find(id: &str) -> Option<&'static ModelCatalogEntry> {
    MODELS.iter().find(|m| m.id == id)
}

/// Whether the id names a catalog model
pub fn is_known(id: &str) -> bool {
    find(id).is_some()
}
