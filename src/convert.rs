//! Markup → HTML conversion through an external converter (pandoc).

use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Turns one source document into a standalone HTML page with a table of contents.
pub trait Converter {
    fn convert(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// Runs `pandoc <source> -s --toc -o <destination>`.
pub struct Pandoc {
    program: PathBuf,
}

impl Pandoc {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Converter for Pandoc {
    fn convert(&self, source: &Path, destination: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .arg(source)
            .args(["-s", "--toc", "-o"])
            .arg(destination)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    Error::ConverterMissing(self.program.display().to_string())
                }
                _ => Error::Io(e),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || !stderr.trim().is_empty() {
            let message = if stderr.trim().is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(Error::ConversionFailed {
                path: source.to_path_buf(),
                message,
            });
        }
        Ok(())
    }
}

/// Whether `html` must be (re)built from `source`.
///
/// Fresh means the HTML exists and is at least as recent as the source.
pub fn is_stale(source: &Path, html: &Path) -> Result<bool> {
    let html_time = match fs::metadata(html) {
        Ok(meta) => meta.modified()?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e.into()),
    };
    let source_time = fs::metadata(source)?.modified()?;
    Ok(source_time > html_time)
}

/// Convert `source` into `html` unless the existing output is fresh.
///
/// Returns whether a conversion ran.
pub fn convert_if_stale(
    converter: &dyn Converter,
    source: &Path,
    html: &Path,
    display_name: &str,
) -> Result<bool> {
    if !is_stale(source, html)? {
        debug!("{} is up to date", html.display());
        return Ok(false);
    }
    if let Some(parent) = html.parent() {
        fs::create_dir_all(parent)?;
    }
    info!("Convert \"{}\" to HTML", display_name);
    converter.convert(source, html)?;
    Ok(true)
}
