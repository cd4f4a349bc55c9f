//! Keyword → documentation URL.

use crate::error::{Error, Result};
use crate::model::{IndexEntry, MethodTarget};
use crate::store::{self, EntryReader};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Asks the user to pick one of several classes sharing a method name.
pub trait Chooser {
    /// Returns the index of the chosen entry, or `None` when cancelled.
    fn choose(&mut self, keyword: &str, choices: &[MethodTarget]) -> Result<Option<usize>>;
}

/// What a lookup ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Open this URL.
    Open(String),
    /// The keyword is not indexed; the documentation home page is offered instead.
    NotFound { home: String },
    /// The user dismissed the class selection.
    Cancelled,
}

impl Resolution {
    /// The URL to show in the browser, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Resolution::Open(url) => Some(url),
            Resolution::NotFound { home } => Some(home),
            Resolution::Cancelled => None,
        }
    }
}

pub struct Resolver {
    index_dir: PathBuf,
    base_url: String,
}

impl Resolver {
    pub fn new(index_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            index_dir: index_dir.into(),
            base_url: base_url.into(),
        }
    }

    pub fn resolve(&self, keyword: &str, chooser: &mut dyn Chooser) -> Result<Resolution> {
        if let Some(url) = self.lookup_primary(keyword)? {
            return Ok(Resolution::Open(url));
        }

        let Some(mut targets) = self.method_targets(keyword)? else {
            debug!("{} is not indexed", keyword);
            return Ok(Resolution::NotFound {
                home: self.base_url.clone(),
            });
        };
        targets.sort();

        let chosen = match targets.len() {
            0 => {
                debug!("{} is not indexed", keyword);
                return Ok(Resolution::NotFound {
                    home: self.base_url.clone(),
                });
            }
            1 => Some(0),
            _ => chooser.choose(keyword, &targets)?,
        };

        Ok(match chosen.and_then(|i| targets.get(i)) {
            Some(target) => Resolution::Open(self.url(&target.relative_url)),
            None => {
                debug!("Selection cancelled for {}", keyword);
                Resolution::Cancelled
            }
        })
    }

    /// First class or function entry matching `keyword`.
    fn lookup_primary(&self, keyword: &str) -> Result<Option<String>> {
        for entry in EntryReader::open(&self.index_dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e @ Error::MalformedLine { .. }) => {
                    warn!("{}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            if matches_keyword(&entry, keyword) {
                return Ok(Some(self.url(&entry.relative_url())));
            }
        }
        Ok(None)
    }

    /// Entries of `<keyword>.txt`, or `None` when there is no such file.
    fn method_targets(&self, keyword: &str) -> Result<Option<Vec<MethodTarget>>> {
        if !is_plain_name(keyword) || store::is_reserved_method_name(keyword) {
            return Ok(None);
        }
        let path = store::method_path(&self.index_dir, keyword);
        if !path.is_file() {
            return Ok(None);
        }
        let (targets, malformed) = store::read_method_file(&path)?;
        for e in malformed {
            warn!("{}", e);
        }
        Ok(Some(targets))
    }

    fn url(&self, relative: &str) -> String {
        format!("{}{}", self.base_url, relative)
    }
}

/// Classes also match with a trailing underscore (`ofColor` finds `ofColor_`);
/// functions match exactly.
pub fn matches_keyword(entry: &IndexEntry, keyword: &str) -> bool {
    match entry {
        IndexEntry::Class { class_name, .. } => {
            class_name == keyword
                || class_name
                    .strip_suffix('_')
                    .is_some_and(|stem| stem == keyword)
        }
        IndexEntry::Function { function_name, .. } => function_name == keyword,
        IndexEntry::Method { .. } => false,
    }
}

/// Keywords used as file names must not leave the index directory.
fn is_plain_name(keyword: &str) -> bool {
    !keyword.is_empty()
        && !keyword
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '.' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BASE: &str = "http://www.openframeworks.cc/documentation/";

    /// Plays back a fixed answer and records what it was shown.
    struct Scripted {
        answer: Option<usize>,
        shown: Vec<String>,
    }

    impl Scripted {
        fn answering(answer: Option<usize>) -> Self {
            Self {
                answer,
                shown: Vec::new(),
            }
        }
    }

    impl Chooser for Scripted {
        fn choose(&mut self, _keyword: &str, choices: &[MethodTarget]) -> Result<Option<usize>> {
            self.shown = choices.iter().map(|c| c.class_name.clone()).collect();
            Ok(self.answer)
        }
    }

    fn index(primary: &str, methods: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(store::PRIMARY_INDEX), primary).unwrap();
        for (name, body) in methods {
            fs::write(dir.path().join(format!("{}.txt", name)), body).unwrap();
        }
        dir
    }

    fn resolve(dir: &TempDir, keyword: &str, chooser: &mut Scripted) -> Resolution {
        Resolver::new(dir.path(), BASE).resolve(keyword, chooser).unwrap()
    }

    #[test]
    fn class_lookup() {
        let dir = index("ofVec3f math/ofVec3f\n", &[]);
        let mut chooser = Scripted::answering(None);
        assert_eq!(
            resolve(&dir, "ofVec3f", &mut chooser),
            Resolution::Open(format!("{}math/ofVec3f.html", BASE))
        );
    }

    #[test]
    fn class_lookup_with_stored_underscore() {
        let dir = index("ofColor_ types/ofColor\n", &[]);
        let mut chooser = Scripted::answering(None);
        assert_eq!(
            resolve(&dir, "ofColor", &mut chooser),
            Resolution::Open(format!("{}types/ofColor.html", BASE))
        );
    }

    #[test]
    fn function_lookup_is_exact() {
        let dir = index(
            "ofBackground graphics/graphics show_ofBackground\n",
            &[],
        );
        let mut chooser = Scripted::answering(None);
        assert_eq!(
            resolve(&dir, "ofBackground", &mut chooser),
            Resolution::Open(format!("{}graphics/graphics.html#show_ofBackground", BASE))
        );
        assert!(matches!(
            resolve(&dir, "ofBackgroun", &mut chooser),
            Resolution::NotFound { .. }
        ));
        // the underscore rule is for classes only
        let dir = index("ofFoo_ x/y show_ofFoo_\n", &[]);
        assert!(matches!(
            resolve(&dir, "ofFoo", &mut chooser),
            Resolution::NotFound { .. }
        ));
    }

    #[test]
    fn first_match_wins_and_malformed_lines_are_skipped() {
        let dir = index(
            "%%% broken\nofNode 3d/ofNode\nofNode other/ofNode\n",
            &[],
        );
        let mut chooser = Scripted::answering(None);
        assert_eq!(
            resolve(&dir, "ofNode", &mut chooser),
            Resolution::Open(format!("{}3d/ofNode.html", BASE))
        );
    }

    #[test]
    fn unknown_keyword_falls_back_to_home() {
        let dir = index("ofVec3f math/ofVec3f\n", &[]);
        let mut chooser = Scripted::answering(Some(0));
        let resolution = resolve(&dir, "nothingHere", &mut chooser);
        assert_eq!(
            resolution,
            Resolution::NotFound {
                home: BASE.to_string()
            }
        );
        assert_eq!(resolution.url(), Some(BASE));
        assert!(chooser.shown.is_empty());
    }

    #[test]
    fn single_method_skips_chooser() {
        let dir = index(
            "ofVec3f math/ofVec3f\n",
            &[("normalize", "ofVec3f math/ofVec3f.html#show_normalize\n")],
        );
        let mut chooser = Scripted::answering(None);
        assert_eq!(
            resolve(&dir, "normalize", &mut chooser),
            Resolution::Open(format!("{}math/ofVec3f.html#show_normalize", BASE))
        );
        assert!(chooser.shown.is_empty());
    }

    #[test]
    fn shared_method_asks_with_sorted_choices() {
        let dir = index(
            "",
            &[(
                "draw",
                "ofMesh 3d/ofMesh.html#show_draw\nofImage graphics/ofImage.html#show_draw\n",
            )],
        );
        let mut chooser = Scripted::answering(Some(1));
        assert_eq!(
            resolve(&dir, "draw", &mut chooser),
            Resolution::Open(format!("{}3d/ofMesh.html#show_draw", BASE))
        );
        assert_eq!(chooser.shown, vec!["ofImage", "ofMesh"]);
    }

    #[test]
    fn cancelled_selection_opens_nothing() {
        let dir = index(
            "",
            &[(
                "draw",
                "ofMesh 3d/ofMesh.html#show_draw\nofImage graphics/ofImage.html#show_draw\n",
            )],
        );
        let mut chooser = Scripted::answering(None);
        let resolution = resolve(&dir, "draw", &mut chooser);
        assert_eq!(resolution, Resolution::Cancelled);
        assert_eq!(resolution.url(), None);
    }

    #[test]
    fn path_like_keywords_never_read_files() {
        let dir = index("", &[]);
        let mut chooser = Scripted::answering(Some(0));
        assert!(matches!(
            resolve(&dir, "../secret", &mut chooser),
            Resolution::NotFound { .. }
        ));
    }

    #[test]
    fn primary_index_name_is_not_a_method() {
        let dir = index("ofVec3f math/ofVec3f\nofNode 3d/ofNode\n", &[]);
        let mut chooser = Scripted::answering(Some(0));
        assert!(matches!(
            resolve(&dir, "classesAndGlobalFunctions", &mut chooser),
            Resolution::NotFound { .. }
        ));
        assert!(chooser.shown.is_empty());
    }

    #[test]
    fn line_with_invalid_utf8_is_skipped() {
        let dir = index("", &[]);
        fs::write(
            dir.path().join(store::PRIMARY_INDEX),
            b"caf\xe9 broken/line\nofVec3f math/ofVec3f\n",
        )
        .unwrap();
        let mut chooser = Scripted::answering(None);
        assert_eq!(
            resolve(&dir, "ofVec3f", &mut chooser),
            Resolution::Open(format!("{}math/ofVec3f.html", BASE))
        );
    }

    #[test]
    fn missing_index_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Resolver::new(dir.path(), BASE)
            .resolve("ofVec3f", &mut Scripted::answering(None))
            .unwrap_err();
        assert!(matches!(err, Error::IndexMissing(_)));
    }
}
