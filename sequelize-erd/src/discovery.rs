//! Source discovery: which files in the models directory get scanned.

use std::path::{Path, PathBuf};

use log::warn;
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::errors::ScanError;

/// Dependency trees are never model sources.
const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// One source file read from disk.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute or caller-relative path to the file
    pub path: PathBuf,
    /// Path relative to the models directory
    pub relative_path: String,
    /// Bare file name, matched against the allow-list
    pub name: String,
    pub text: String,
}

/// Find and read every model source under `dir`.
///
/// Only the top level is scanned unless `config.recursive` is set. Hidden
/// entries and `node_modules` are skipped. Results are sorted by relative
/// path so repeated runs see files in the same order.
pub fn discover_sources(dir: &Path, config: &ScanConfig) -> Result<Vec<SourceFile>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::ModelsDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry));

    let mut sources = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_none_or(|ext| !config.accepts_extension(ext))
        {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if !config.allows(&name) {
            continue;
        }

        let relative_path = path.strip_prefix(dir).unwrap_or(path).to_string_lossy().to_string();
        let text = read_source(path)?;

        sources.push(SourceFile {
            path: path.to_path_buf(),
            relative_path,
            name,
            text,
        });
    }

    sources.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(sources)
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
}

/// Read a file as text, replacing invalid UTF-8 rather than failing.
fn read_source(path: &Path) -> Result<String, ScanError> {
    let bytes = std::fs::read(path).map_err(|err| ScanError::io(path, err))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            warn!("{} is not valid UTF-8, decoding lossily", path.display());
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}
