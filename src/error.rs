//! Error types shared by the indexer and the resolver.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // -- configuration (fatal) ------------------------------------------------
    /// The external converter could not be started at all.
    #[error("converter not found: {0} (install pandoc or set --converter)")]
    ConverterMissing(String),

    #[error("no index found in {}", .0.display())]
    IndexMissing(PathBuf),

    #[error("documentation directory not found: {}", .0.display())]
    DocsRootMissing(PathBuf),

    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    // -- per-document (recoverable) -------------------------------------------
    #[error("conversion of {} failed: {message}", path.display())]
    ConversionFailed { path: PathBuf, message: String },

    #[error("no table of contents in {0}")]
    MissingToc(String),

    #[error("no function list found in {0}")]
    MissingFunctionList(String),

    /// Link text was empty once stripped; carries the offending HTML.
    #[error("unable to read a name in {page}: {fragment}")]
    UnparsableLink { page: String, fragment: String },

    // -- query time (recoverable) ---------------------------------------------
    #[error("malformed index line {line_no} in {}: {line:?}", path.display())]
    MalformedLine {
        path: PathBuf,
        line_no: usize,
        line: String,
    },

    #[error("selection prompt failed: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error must abort the whole run instead of skipping one item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConverterMissing(_)
                | Error::IndexMissing(_)
                | Error::DocsRootMissing(_)
                | Error::Config { .. }
                | Error::Prompt(_)
        )
    }
}
