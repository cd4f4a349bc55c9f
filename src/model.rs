//! Data model for documentation pages and index entries.

use std::path::PathBuf;

/// How a page's table of contents is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// `*_functions` pages: a flat list of free functions.
    FunctionList,
    /// Everything else: one class and its methods.
    ClassPage,
}

/// One source document in the documentation tree.
#[derive(Debug, Clone)]
pub struct DocumentPage {
    pub source_path: PathBuf,
    /// Relative to the documentation root, without extension, `/`-separated.
    pub relative_path: String,
    pub kind: PageKind,
}

/// One resolvable name → location mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEntry {
    Class {
        class_name: String,
        page_path: String,
    },
    Function {
        function_name: String,
        page_path: String,
        anchor: String,
    },
    Method {
        method_name: String,
        class_name: String,
        page_path: String,
    },
}

impl IndexEntry {
    /// The name a user types to find this entry.
    pub fn name(&self) -> &str {
        match self {
            IndexEntry::Class { class_name, .. } => class_name,
            IndexEntry::Function { function_name, .. } => function_name,
            IndexEntry::Method { method_name, .. } => method_name,
        }
    }

    /// URL relative to the documentation base.
    pub fn relative_url(&self) -> String {
        match self {
            IndexEntry::Class { page_path, .. } => format!("{}.html", page_path),
            IndexEntry::Function {
                page_path, anchor, ..
            } => format!("{}.html#{}", page_path, anchor),
            IndexEntry::Method {
                method_name,
                page_path,
                ..
            } => format!(
                "{}.html#{}",
                page_path,
                crate::page::function_anchor(method_name)
            ),
        }
    }
}

/// One line of a per-method index file, as read back by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MethodTarget {
    pub class_name: String,
    pub relative_url: String,
}
