use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{OmlError, OmlResult};
use crate::facade::Oml;
use crate::mirror::XmlMirror;

/// Occurrences found in one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileMatch {
    pub file_name: String,
    pub path: PathBuf,
    pub occurrences: usize,
}

/// Outcome of one corpus scan.
#[derive(Clone, Debug, Serialize)]
pub struct SearchResult {
    pub total_files: usize,
    /// Per-file counts in discovery order.
    pub matches: Vec<FileMatch>,
    pub elapsed: Duration,
    /// Report lines: file count, one line per file, elapsed time.
    pub lines: Vec<String>,
}

impl SearchResult {
    pub fn total_occurrences(&self) -> usize {
        self.matches.iter().map(|m| m.occurrences).sum()
    }
}

/// Keyword counting across a directory of native documents.
pub struct CorpusSearch<'a> {
    oml: &'a Oml,
}

impl<'a> CorpusSearch<'a> {
    pub fn new(oml: &'a Oml) -> Self {
        Self { oml }
    }

    pub fn scan(
        &self,
        dir: impl AsRef<Path>,
        keyword: &str,
        version: &str,
    ) -> OmlResult<SearchResult> {
        self.scan_with_progress(dir, keyword, version, |_| {})
    }

    /// Like [`scan`](Self::scan), handing each report line to `progress` as
    /// soon as it is produced.
    pub fn scan_with_progress<F>(
        &self,
        dir: impl AsRef<Path>,
        keyword: &str,
        version: &str,
        mut progress: F,
    ) -> OmlResult<SearchResult>
    where
        F: FnMut(&str),
    {
        let dir = dir.as_ref();
        if keyword.is_empty() {
            return Err(OmlError::InvalidArgument(
                "a search expression is mandatory".into(),
            ));
        }
        if !dir.is_dir() {
            return Err(OmlError::DirectoryNotFound(dir.to_path_buf()));
        }
        self.oml.resolve_version(version)?;

        let started = Instant::now();
        let mut lines = Vec::new();
        let mut emit = |line: String, lines: &mut Vec<String>| {
            progress(&line);
            lines.push(line);
        };

        let files = self.discover(dir)?;
        let total = files.len();
        emit(format!("{total} files found."), &mut lines);

        let mut matches = Vec::with_capacity(total);
        for (index, path) in files.into_iter().enumerate() {
            let mut document = self.oml.open(&path, version)?;
            let text = XmlMirror::to_xml_with_headers(&mut document)?.to_unformatted_string()?;
            let occurrences = count_occurrences(&text, keyword);
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!(file = %file_name, occurrences, "scanned document");
            emit(
                format!(
                    "[{}/{}] - {} occurrences found in {}.",
                    index + 1,
                    total,
                    occurrences,
                    file_name
                ),
                &mut lines,
            );
            matches.push(FileMatch {
                file_name,
                path,
                occurrences,
            });
        }

        let elapsed = started.elapsed();
        emit(format!("Elapsed time {}.", format_elapsed(elapsed)), &mut lines);
        info!(
            dir = %dir.display(),
            files = total,
            elapsed_ms = elapsed.as_millis() as u64,
            "corpus scan complete"
        );

        Ok(SearchResult {
            total_files: total,
            matches,
            elapsed,
            lines,
        })
    }

    /// Native files directly inside `dir`, sorted by file name. Symlinks are
    /// judged by their target.
    fn discover(&self, dir: &Path) -> OmlResult<Vec<PathBuf>> {
        let extension = &self.oml.config().native_extension;
        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(std::io::Error::from)?;
            let is_native = entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
                    .unwrap_or(false);
            if is_native {
                files.push(entry.into_path());
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}

/// Non-overlapping occurrences of `needle`, scanning left to right.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// `HH:MM:SS`; hours keep counting past 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
