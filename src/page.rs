//! Page identifiers and classification.
//!
//! Every page is known by its *canonical identifier*: the path relative to the
//! documentation root, without extension, with the `addons` directory folded
//! away so that addon pages live next to core pages on the website.

use crate::model::PageKind;
use std::path::{Component, Path};

/// Leading directory dropped from identifiers.
pub const ADDONS_DIR: &str = "addons";

/// Base-name suffix of pages listing free functions.
pub const FUNCTIONS_SUFFIX: &str = "_functions";

/// Prefix of the in-page anchor of a function or method block.
pub const ANCHOR_PREFIX: &str = "show_";

/// Canonical identifier for a relative path without extension.
///
/// "addons/ofxOsc/ofxOscMessage" → "ofxOsc/ofxOscMessage"
pub fn canonical_identifier(relative_path: &Path) -> String {
    let segments: Vec<String> = relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let start = usize::from(segments.first().is_some_and(|s| s == ADDONS_DIR));
    segments[start..].join("/")
}

/// Classify a page from its base name (no extension).
pub fn classify(base_name: &str) -> PageKind {
    if base_name.ends_with(FUNCTIONS_SUFFIX) {
        PageKind::FunctionList
    } else {
        PageKind::ClassPage
    }
}

/// Page path stored for a class: trailing underscore ignored.
pub fn class_page_path(identifier: &str) -> &str {
    identifier.strip_suffix('_').unwrap_or(identifier)
}

/// Page path stored for a function list: the `_functions` suffix removed.
pub fn function_page_path(identifier: &str) -> &str {
    identifier
        .strip_suffix(FUNCTIONS_SUFFIX)
        .unwrap_or(identifier)
}

pub fn function_anchor(name: &str) -> String {
    format!("{}{}", ANCHOR_PREFIX, name)
}
