// LogLens - platform/fs.rs
//
// Filesystem probes used by the loading service.
//
// `FileProbe` is the seam that lets the ingestion pipeline be tested without
// depending on real permission bits: production code uses `FsProbe`, tests
// can substitute a probe that accepts or rejects any path.

use crate::util::error::LoadError;
use std::io::{self, BufRead};
use std::path::Path;

/// Checks that a path can be ingested before any worker is started.
pub trait FileProbe: Send {
    /// Returns the file size in bytes when the path is a readable regular file.
    fn check(&self, path: &Path) -> Result<u64, LoadError>;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn check(&self, path: &Path) -> Result<u64, LoadError> {
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => {
                return Err(LoadError::Unreadable {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        if !metadata.is_file() {
            return Err(LoadError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        // Metadata can succeed on files the process may not open.
        std::fs::File::open(path).map_err(|e| LoadError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(metadata.len())
    }
}

/// Read the first N lines of a file.
///
/// Invalid UTF-8 is replaced rather than treated as an error so a stray
/// binary byte never hides an otherwise readable header.
pub fn read_first_lines(path: &Path, max_lines: usize) -> io::Result<Vec<String>> {
    let file = std::fs::File::open(path)?;
    let mut reader = io::BufReader::new(file);

    let mut lines = Vec::with_capacity(max_lines.min(1024));
    let mut buf = Vec::new();
    while lines.len() < max_lines {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        lines.push(trim_line_ending(&String::from_utf8_lossy(&buf)).to_string());
    }
    Ok(lines)
}

/// Strip a trailing `\n` or `\r\n`.
pub fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
