//! Writing sample discovery and loading

use crate::config::StyleExtractorConfig;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One writing sample, possibly truncated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// File name used as the delimiter label in the prompt
    pub name: String,
    /// Path relative to the samples directory
    pub relative_path: PathBuf,
    /// File content, cut to the character cap
    pub content: String,
    /// Whether the content was cut
    pub truncated: bool,
}

/// Selects and reads sample files from a directory
///
/// Files matching any configured pattern are taken in lexical order of their
/// relative path. Unreadable files are skipped and do not count towards
/// the limit.
#[derive(Debug, Clone)]
pub struct SampleLoader {
    patterns: GlobSet,
    max_samples: usize,
    max_chars: usize,
}

impl SampleLoader {
    /// Build a loader from the extractor configuration
    pub fn new(config: &StyleExtractorConfig) -> Result<Self, String> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.sample_patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| format!("Invalid sample pattern '{}': {}", pattern, e))?;
            builder.add(glob);
        }
        let patterns = builder
            .build()
            .map_err(|e| format!("Invalid sample patterns: {}", e))?;

        Ok(Self {
            patterns,
            max_samples: config.max_samples,
            max_chars: config.max_chars_per_sample,
        })
    }

    /// Load up to the configured number of samples from `dir`
    ///
    /// A missing or unreadable directory yields no samples.
    pub fn load(&self, dir: &Path) -> Vec<Sample> {
        let mut candidates = Vec::new();
        if let Err(e) = self.collect(dir, Path::new(""), &mut candidates) {
            warn!("Could not list samples in {}: {}", dir.display(), e);
            return Vec::new();
        }
        candidates.sort();

        debug!("Found {} candidate sample files in {}", candidates.len(), dir.display());

        let mut samples = Vec::new();
        for relative_path in candidates {
            if samples.len() >= self.max_samples {
                break;
            }
            let path = dir.join(&relative_path);
            match fs::read_to_string(&path) {
                Ok(raw) => {
                    let (content, truncated) = truncate_chars(&raw, self.max_chars);
                    samples.push(Sample {
                        name: file_name(&relative_path),
                        relative_path,
                        content,
                        truncated,
                    });
                }
                Err(e) => warn!("Could not read sample {}: {}", path.display(), e),
            }
        }
        samples
    }

    fn collect(&self, root: &Path, relative: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
        let entries = fs::read_dir(root.join(relative))?;
        self.collect_entries(root, relative, entries, out);
        Ok(())
    }

    /// A bad entry is logged and skipped; the rest of the directory is still walked.
    fn collect_entries(
        &self,
        root: &Path,
        relative: &Path,
        entries: impl IntoIterator<Item = io::Result<fs::DirEntry>>,
        out: &mut Vec<PathBuf>,
    ) {
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping entry in {}: {}", root.join(relative).display(), e);
                    continue;
                }
            };
            let relative_path = relative.join(entry.file_name());
            let path = entry.path();

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            if file_type.is_dir() {
                if let Err(e) = self.collect(root, &relative_path, out) {
                    warn!("Skipping directory {}: {}", path.display(), e);
                }
            } else if path.is_file() && self.patterns.is_match(&relative_path) {
                out.push(relative_path);
            }
        }
    }
}

/// Replace a leading `~` with the current user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Cut `text` to at most `max_chars` characters
fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (text[..byte_idx].to_string(), true),
        None => (text.to_string(), false),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
