//! Table-of-contents extraction from converted documentation pages.
//!
//! pandoc's `--toc` output nests the page headings as lists inside the element
//! with id `TOC`:
//!
//! ```text
//! class page                          function list page
//! ul                                  ul
//!  li  "class ofVec3f"                 li  "functions"
//!   ul                                  ul
//!    li "Methods"                        li  "global functions"
//!     ul                                  ul
//!      li "float length()"                 li "void ofBackground(int r)"
//! ```

use crate::error::{Error, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};

static TOC_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#TOC").unwrap());

// "class ofVec3f" or "class ofColor_": the trailing underscore is not captured.
static RE_CLASS_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^class\s+(\w+?)_?(?:\W|$)").unwrap());

// "void ofBackground(int r)": last word before "(" in a signature ending with ")".
static RE_SIGNATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*\s(\w+)\(.*\)$").unwrap());

static RE_SIGNATURE_LOOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s(\w+)\(").unwrap());

/// Link text of the methods section in a class page.
const METHODS_SECTION: &str = "Methods";

/// Entries read from a class page.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ClassToc {
    pub class_name: String,
    /// Method names in page order; overloads appear once per signature.
    pub methods: Vec<String>,
}

/// Extract the class name and its methods.
///
/// Returns `Ok(None)` when the page title is not a class title.
pub fn extract_class(html: &str, page: &str) -> Result<Option<ClassToc>> {
    let document = Html::parse_document(html);
    let toc = find_toc(&document, page)?;

    let Some(title_item) = first_descendant(toc, "ul").and_then(|ul| first_child(ul, "li")) else {
        warn!("Empty table of contents in {}", page);
        return Ok(None);
    };

    let title = first_descendant(title_item, "a")
        .map(link_text)
        .unwrap_or_default();
    let Some(class_name) = RE_CLASS_TITLE.captures(&title).map(|c| c[1].to_string()) else {
        warn!("No class title in {}: {:?}", page, title);
        return Ok(None);
    };
    debug!("Class found: {}", class_name);

    let methods = methods_section(title_item)
        .map(|list| extract_names(child_items(list), page))
        .unwrap_or_default();

    Ok(Some(ClassToc {
        class_name,
        methods,
    }))
}

/// Extract the free function names of a `*_functions` page.
pub fn extract_functions(html: &str, page: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let toc = find_toc(&document, page)?;

    let list = first_descendant(toc, "ul")
        .and_then(|ul| first_descendant(ul, "li"))
        .and_then(|li| first_descendant(li, "ul"))
        .and_then(|ul| first_descendant(ul, "li"))
        .and_then(|li| first_descendant(li, "ul"))
        .ok_or_else(|| Error::MissingFunctionList(page.to_string()))?;

    let items = list
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "li");
    Ok(extract_names(items, page))
}

/// Read a name from the signature text of a TOC link.
///
/// The text fragments are joined and whitespace runs collapsed. A link whose
/// text is split by nested markup gets one extra, looser attempt which is
/// reported so the result can be checked.
pub fn name_from_link(link: ElementRef<'_>, page: &str) -> Result<Option<String>> {
    let text = link_text(link);
    if text.is_empty() {
        return Err(Error::UnparsableLink {
            page: page.to_string(),
            fragment: link.html(),
        });
    }

    if let Some(caps) = RE_SIGNATURE.captures(&text) {
        return Ok(Some(caps[1].to_string()));
    }

    let marked_up = link.children().any(|n| n.value().is_element());
    if marked_up {
        if let Some(caps) = RE_SIGNATURE_LOOSE.captures(&text) {
            let name = caps[1].to_string();
            warn!("Verify this name from {}: {}()", page, name);
            return Ok(Some(name));
        }
    }

    debug!("No signature in link text {:?} ({})", text, page);
    Ok(None)
}

fn find_toc<'a>(document: &'a Html, page: &str) -> Result<ElementRef<'a>> {
    document
        .select(&TOC_SELECTOR)
        .next()
        .ok_or_else(|| Error::MissingToc(page.to_string()))
}

/// The list nested under the "Methods" item of the class title item.
fn methods_section(title_item: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let sections = first_child(title_item, "ul")?;
    let methods = child_elements(sections)
        .filter(|e| e.value().name() == "li")
        .find(|li| first_child(*li, "a").map(link_text).as_deref() == Some(METHODS_SECTION))?;
    first_child(methods, "ul")
}

/// Names read from each item's first link; unreadable links are skipped.
fn extract_names<'a>(items: impl Iterator<Item = ElementRef<'a>>, page: &str) -> Vec<String> {
    let mut names = Vec::new();
    for item in items {
        let Some(link) = first_descendant(item, "a") else {
            warn!(
                "{}",
                Error::UnparsableLink {
                    page: page.to_string(),
                    fragment: item.html(),
                }
            );
            continue;
        };
        match name_from_link(link, page) {
            Ok(Some(name)) => names.push(name),
            Ok(None) => {}
            Err(e) => warn!("{}", e),
        }
    }
    names
}

fn link_text(link: ElementRef<'_>) -> String {
    let raw: String = link.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn child_items<'a>(list: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    child_elements(list).filter(|e| e.value().name() == "li")
}

fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

fn first_child<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    child_elements(el).find(|e| e.value().name() == tag)
}

fn first_descendant<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == tag)
}
