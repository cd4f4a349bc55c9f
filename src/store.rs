//! On-disk index format.
//!
//! ```text
//! index/
//! ├── classesAndGlobalFunctions.txt   "ofVec3f math/ofVec3f"
//! │                                   "ofBackground graphics/graphics show_ofBackground"
//! ├── length.txt                      "ofVec3f math/ofVec3f.html#show_length"
//! └── html/                           converted pages, kept for the staleness check
//! ```
//!
//! The primary file tells classes from functions by field count only. Lines are
//! turned into [`IndexEntry`] variants as soon as they are read.

use crate::error::{Error, Result};
use crate::model::{IndexEntry, MethodTarget};
use regex::Regex;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const PRIMARY_INDEX: &str = "classesAndGlobalFunctions.txt";
pub const HTML_DIR: &str = "html";
const METHOD_INDEX_EXT: &str = "txt";

/// Placeholder recorded for a line that is not valid UTF-8.
const INVALID_UTF8_LINE: &str = "<invalid UTF-8>";

static RE_ENTRY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\w+)\s+(.+)$").unwrap());

static RE_FUNCTION_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+(.+)$").unwrap());

pub fn primary_path(index_dir: &Path) -> PathBuf {
    index_dir.join(PRIMARY_INDEX)
}

/// Method names whose file would be the primary index itself.
pub fn is_reserved_method_name(method_name: &str) -> bool {
    method_path(Path::new(""), method_name) == Path::new(PRIMARY_INDEX)
}

pub fn method_path(index_dir: &Path, method_name: &str) -> PathBuf {
    index_dir.join(format!("{}.{}", method_name, METHOD_INDEX_EXT))
}

pub fn html_path(index_dir: &Path, relative_path: &str) -> PathBuf {
    index_dir.join(HTML_DIR).join(format!("{}.html", relative_path))
}

// -- writing ------------------------------------------------------------------

/// Appends class and function lines to the primary index.
///
/// The file is truncated when the writer is created, so a run that stops early
/// leaves the entries found so far.
pub struct PrimaryWriter {
    out: BufWriter<File>,
}

impl PrimaryWriter {
    pub fn create(index_dir: &Path) -> Result<Self> {
        fs::create_dir_all(index_dir)?;
        let file = File::create(primary_path(index_dir))?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }

    pub fn append(&mut self, entry: &IndexEntry) -> Result<()> {
        match entry {
            IndexEntry::Class {
                class_name,
                page_path,
            } => writeln!(self.out, "{} {}", class_name, page_path)?,
            IndexEntry::Function {
                function_name,
                page_path,
                anchor,
            } => writeln!(self.out, "{} {} {}", function_name, page_path, anchor)?,
            // methods live in their own files
            IndexEntry::Method { .. } => {}
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Write `<method>.txt` with one `<class> <page>.html#<anchor>` line per entry.
pub fn write_method_file(index_dir: &Path, method_name: &str, entries: &[IndexEntry]) -> Result<()> {
    let mut out = BufWriter::new(File::create(method_path(index_dir, method_name))?);
    for entry in entries {
        if let IndexEntry::Method { class_name, .. } = entry {
            writeln!(out, "{} {}", class_name, entry.relative_url())?;
        }
    }
    out.flush()?;
    Ok(())
}

// -- reading ------------------------------------------------------------------

/// Parse one primary index line into a class or function entry.
pub fn parse_primary_line(line: &str) -> Option<IndexEntry> {
    let caps = RE_ENTRY.captures(line.trim_end())?;
    let name = caps[1].to_string();
    let rest = &caps[2];
    Some(match RE_FUNCTION_TAIL.captures(rest) {
        Some(tail) => IndexEntry::Function {
            function_name: name,
            page_path: tail[1].to_string(),
            anchor: tail[2].to_string(),
        },
        None => IndexEntry::Class {
            class_name: name,
            page_path: rest.to_string(),
        },
    })
}

pub fn parse_method_line(line: &str) -> Option<MethodTarget> {
    let caps = RE_ENTRY.captures(line.trim_end())?;
    Some(MethodTarget {
        class_name: caps[1].to_string(),
        relative_url: caps[2].to_string(),
    })
}

/// Streams the primary index one entry at a time.
///
/// Malformed lines come out as [`Error::MalformedLine`] so the caller can log
/// them and keep going.
pub struct EntryReader<R> {
    lines: io::Lines<R>,
    path: PathBuf,
    line_no: usize,
}

impl EntryReader<BufReader<File>> {
    pub fn open(index_dir: &Path) -> Result<Self> {
        let path = primary_path(index_dir);
        if !path.is_file() {
            return Err(Error::IndexMissing(index_dir.to_path_buf()));
        }
        let file = File::open(&path)?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> EntryReader<R> {
    pub fn new(reader: R, path: PathBuf) -> Self {
        Self {
            lines: reader.lines(),
            path,
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for EntryReader<R> {
    type Item = Result<IndexEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.lines.next()?;
            self.line_no += 1;
            let line = match next {
                Ok(line) => line,
                // the bytes of the bad line are consumed, reading can go on
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    return Some(Err(Error::MalformedLine {
                        path: self.path.clone(),
                        line_no: self.line_no,
                        line: INVALID_UTF8_LINE.to_string(),
                    }));
                }
                Err(e) => return Some(Err(e.into())),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(parse_primary_line(&line).ok_or_else(|| Error::MalformedLine {
                path: self.path.clone(),
                line_no: self.line_no,
                line,
            }));
        }
    }
}

/// Read a per-method file. Returns the good entries and the malformed-line errors.
pub fn read_method_file(path: &Path) -> Result<(Vec<MethodTarget>, Vec<Error>)> {
    let reader = BufReader::new(File::open(path)?);
    let mut targets = Vec::new();
    let mut malformed = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                malformed.push(Error::MalformedLine {
                    path: path.to_path_buf(),
                    line_no: i + 1,
                    line: INVALID_UTF8_LINE.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_method_line(&line) {
            Some(target) => targets.push(target),
            None => malformed.push(Error::MalformedLine {
                path: path.to_path_buf(),
                line_no: i + 1,
                line,
            }),
        }
    }
    Ok((targets, malformed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn two_fields_is_a_class() {
        assert_eq!(
            parse_primary_line("ofVec3f math/ofVec3f"),
            Some(IndexEntry::Class {
                class_name: "ofVec3f".into(),
                page_path: "math/ofVec3f".into(),
            })
        );
    }

    #[test]
    fn three_fields_is_a_function() {
        assert_eq!(
            parse_primary_line("ofBackground graphics/graphics show_ofBackground\r"),
            Some(IndexEntry::Function {
                function_name: "ofBackground".into(),
                page_path: "graphics/graphics".into(),
                anchor: "show_ofBackground".into(),
            })
        );
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(parse_primary_line("lonely"), None);
        assert_eq!(parse_primary_line("not-a-word path"), None);
        assert_eq!(parse_method_line("ofNode"), None);
    }

    #[test]
    fn reader_skips_blank_and_reports_malformed() {
        let data = "ofVec3f math/ofVec3f\n\n???\nofBackground graphics/graphics show_ofBackground\n";
        let results: Vec<_> =
            EntryReader::new(Cursor::new(data), PathBuf::from("index.txt")).collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::MalformedLine { line_no: 3, .. })));
        assert_eq!(results[2].as_ref().unwrap().name(), "ofBackground");
    }

    #[test]
    fn written_primary_reads_back() {
        let dir = TempDir::new().unwrap();
        let entries = vec![
            IndexEntry::Class {
                class_name: "ofVec3f".into(),
                page_path: "math/ofVec3f".into(),
            },
            IndexEntry::Function {
                function_name: "ofBackground".into(),
                page_path: "graphics/graphics".into(),
                anchor: "show_ofBackground".into(),
            },
        ];
        let mut writer = PrimaryWriter::create(dir.path()).unwrap();
        for e in &entries {
            writer.append(e).unwrap();
        }
        writer.flush().unwrap();

        let text = fs::read_to_string(primary_path(dir.path())).unwrap();
        assert_eq!(
            text,
            "ofVec3f math/ofVec3f\nofBackground graphics/graphics show_ofBackground\n"
        );
        let read: Vec<_> = EntryReader::open(dir.path())
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(read, entries);
    }

    #[test]
    fn method_file_lines_carry_anchor() {
        let dir = TempDir::new().unwrap();
        let entries = vec![IndexEntry::Method {
            method_name: "draw".into(),
            class_name: "ofImage".into(),
            page_path: "graphics/ofImage".into(),
        }];
        write_method_file(dir.path(), "draw", &entries).unwrap();
        let text = fs::read_to_string(method_path(dir.path(), "draw")).unwrap();
        assert_eq!(text, "ofImage graphics/ofImage.html#show_draw\n");

        let (targets, malformed) = read_method_file(&method_path(dir.path(), "draw")).unwrap();
        assert!(malformed.is_empty());
        assert_eq!(targets[0].relative_url, "graphics/ofImage.html#show_draw");
    }

    #[test]
    fn reader_skips_line_with_invalid_utf8() {
        let data: &[u8] = b"caf\xe9 broken/line\nofVec3f math/ofVec3f\n";
        let results: Vec<_> =
            EntryReader::new(Cursor::new(data), PathBuf::from("index.txt")).collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Err(Error::MalformedLine { line_no: 1, .. })));
        assert_eq!(results[1].as_ref().unwrap().name(), "ofVec3f");
    }

    #[test]
    fn method_file_skips_line_with_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = method_path(dir.path(), "draw");
        fs::write(&path, b"of\xffImage graphics/ofImage.html#show_draw\nofMesh 3d/ofMesh.html#show_draw\n").unwrap();
        let (targets, malformed) = read_method_file(&path).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].class_name, "ofMesh");
        assert!(matches!(malformed[..], [Error::MalformedLine { line_no: 1, .. }]));
    }

    #[test]
    fn primary_stem_is_reserved() {
        assert!(is_reserved_method_name("classesAndGlobalFunctions"));
        assert!(!is_reserved_method_name("draw"));
    }

    #[test]
    fn missing_primary_is_index_missing() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            EntryReader::open(dir.path()),
            Err(Error::IndexMissing(_))
        ));
    }
}
