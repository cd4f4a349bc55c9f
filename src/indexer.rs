//! Indexing run: discover pages, convert them, extract entries, write the index.

use crate::convert::{self, Converter};
use crate::error::{Error, Result};
use crate::model::{DocumentPage, IndexEntry, PageKind};
use crate::page;
use crate::store::{self, PrimaryWriter};
use crate::toc;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Entries found in one page, before run-wide deduplication.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PageEntries {
    pub class: Option<IndexEntry>,
    pub functions: Vec<IndexEntry>,
    pub methods: Vec<IndexEntry>,
}

/// Run-wide accumulators.
///
/// Free function names are kept once (first page wins). Method names collect
/// every `(class, page)` pair they appear under.
#[derive(Debug, Default)]
pub struct IndexSession {
    seen_functions: HashSet<String>,
    methods: BTreeMap<String, Vec<IndexEntry>>,
}

impl IndexSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one page into the session and return what goes to the primary index.
    pub fn accept(&mut self, entries: PageEntries) -> Vec<IndexEntry> {
        let mut primary = Vec::new();
        if let Some(class) = entries.class {
            primary.push(class);
        }
        for function in entries.functions {
            if self.seen_functions.insert(function.name().to_string()) {
                debug!("Function found: {}", function.name());
                primary.push(function);
            }
        }
        for method in entries.methods {
            self.add_method(method);
        }
        primary
    }

    /// Combine the accumulators of a session built elsewhere into this one.
    pub fn merge(&mut self, other: IndexSession) {
        self.seen_functions.extend(other.seen_functions);
        for entry in other.methods.into_values().flatten() {
            self.add_method(entry);
        }
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.seen_functions.contains(name)
    }

    /// Method names with their entries, sorted by name.
    pub fn methods(&self) -> impl Iterator<Item = (&str, &[IndexEntry])> {
        self.methods.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn add_method(&mut self, entry: IndexEntry) {
        let IndexEntry::Method { method_name, .. } = &entry else {
            return;
        };
        let list = self.methods.entry(method_name.clone()).or_default();
        if !list.contains(&entry) {
            list.push(entry);
        }
    }
}

/// Entries of one converted page.
///
/// `identifier` is the page's canonical identifier.
pub fn extract_page(kind: PageKind, identifier: &str, html: &str) -> Result<PageEntries> {
    match kind {
        PageKind::ClassPage => {
            let Some(class) = toc::extract_class(html, identifier)? else {
                return Ok(PageEntries::default());
            };
            let page_path = page::class_page_path(identifier).to_string();
            let methods = class
                .methods
                .into_iter()
                .map(|method_name| IndexEntry::Method {
                    method_name,
                    class_name: class.class_name.clone(),
                    page_path: page_path.clone(),
                })
                .collect();
            Ok(PageEntries {
                class: Some(IndexEntry::Class {
                    class_name: class.class_name,
                    page_path,
                }),
                functions: Vec::new(),
                methods,
            })
        }
        PageKind::FunctionList => {
            let page_path = page::function_page_path(identifier);
            let functions = toc::extract_functions(html, identifier)?
                .into_iter()
                .map(|name| IndexEntry::Function {
                    anchor: page::function_anchor(&name),
                    function_name: name,
                    page_path: page_path.to_string(),
                })
                .collect();
            Ok(PageEntries {
                functions,
                ..Default::default()
            })
        }
    }
}

/// Every source document under `root` with the given extension, sorted by path.
pub fn discover_pages(root: &Path, extension: &str) -> Result<Vec<DocumentPage>> {
    if !root.is_dir() {
        return Err(Error::DocsRootMissing(root.to_path_buf()));
    }
    let mut pages = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(extension)
        {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let relative_path = slash_path(&relative.with_extension(""));
        let base_name = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        pages.push(DocumentPage {
            source_path: path.to_path_buf(),
            relative_path,
            kind: page::classify(base_name),
        });
    }
    Ok(pages)
}

fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub documents: usize,
    pub converted: usize,
    pub up_to_date: usize,
    pub failed: usize,
    pub classes: usize,
    pub functions: usize,
    pub method_names: usize,
}

/// One indexing run over a documentation tree.
pub struct Indexer<'a> {
    pub docs_root: PathBuf,
    pub index_dir: PathBuf,
    pub extension: String,
    pub converter: &'a dyn Converter,
}

impl Indexer<'_> {
    pub fn run(&self) -> Result<RunSummary> {
        let pages = discover_pages(&self.docs_root, &self.extension)?;
        let mut writer = PrimaryWriter::create(&self.index_dir)?;
        let mut session = IndexSession::new();
        let mut summary = RunSummary {
            documents: pages.len(),
            ..Default::default()
        };

        for doc in &pages {
            let Some(entries) = self.index_page(doc, &mut summary)? else {
                summary.failed += 1;
                continue;
            };
            for entry in session.accept(entries) {
                match entry {
                    IndexEntry::Class { .. } => summary.classes += 1,
                    IndexEntry::Function { .. } => summary.functions += 1,
                    IndexEntry::Method { .. } => {}
                }
                writer.append(&entry)?;
            }
            writer.flush()?;
        }

        for (name, entries) in session.methods() {
            if store::is_reserved_method_name(name) {
                warn!("Method {} would overwrite the primary index, skipped", name);
                continue;
            }
            store::write_method_file(&self.index_dir, name, entries)?;
            summary.method_names += 1;
        }

        info!(
            "Indexed {} documents ({} converted, {} up to date, {} skipped): {} classes, {} functions, {} method names",
            summary.documents,
            summary.converted,
            summary.up_to_date,
            summary.failed,
            summary.classes,
            summary.functions,
            summary.method_names
        );
        Ok(summary)
    }

    /// Convert and extract one page. `Ok(None)` means the page was skipped.
    fn index_page(&self, doc: &DocumentPage, summary: &mut RunSummary) -> Result<Option<PageEntries>> {
        let html_path = store::html_path(&self.index_dir, &doc.relative_path);
        let display = format!("{}.{}", doc.relative_path, self.extension);

        match convert::convert_if_stale(self.converter, &doc.source_path, &html_path, &display) {
            Ok(true) => summary.converted += 1,
            Ok(false) => summary.up_to_date += 1,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!("{}", e);
                return Ok(None);
            }
        }

        let html = match fs::read_to_string(&html_path) {
            Ok(html) => html,
            Err(e) => {
                error!("failed to read {}: {}", html_path.display(), e);
                return Ok(None);
            }
        };

        let identifier = page::canonical_identifier(Path::new(&doc.relative_path));
        match extract_page(doc.kind, &identifier, &html) {
            Ok(entries) => Ok(Some(entries)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("{}", e);
                Ok(None)
            }
        }
    }
}
