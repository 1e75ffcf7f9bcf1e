//! Entry loading - reads the entries directory into a sorted site index.

use crate::{
    config::Config,
    markdown::{MarkdownError, MarkdownProcessor},
    models::{Entry, EntryMeta, SiteIndex},
    pagination::sort_entries,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to convert {path:?}: {source}")]
    Markdown {
        path: PathBuf,
        #[source]
        source: MarkdownError,
    },
}

/// Loads entries and classifies them into the main and galley streams
pub struct SiteBuilder {
    entries_dir: PathBuf,
    processor: MarkdownProcessor,
}

impl SiteBuilder {
    pub fn new(config: &Config) -> Self {
        Self::with_entries_dir(config.entries_dir())
    }

    pub fn with_entries_dir(entries_dir: impl Into<PathBuf>) -> Self {
        Self {
            entries_dir: entries_dir.into(),
            processor: MarkdownProcessor::new(),
        }
    }

    /// Load every entry, returning both streams sorted newest first
    pub fn build(&self) -> Result<SiteIndex, BuildError> {
        let files = self.discover_entry_files()?;
        tracing::debug!("Found {} entry files", files.len());

        let mut index = SiteIndex::default();
        for path in &files {
            if let Some(entry) = self.load_entry(path)? {
                tracing::info!("Processed {}", entry.title);
                index.push(entry);
            }
        }

        sort_entries(&mut index.main);
        sort_entries(&mut index.galley);

        tracing::info!(
            "Loaded {} entries ({} main, {} galley)",
            index.len(),
            index.main.len(),
            index.galley.len()
        );

        Ok(index)
    }

    /// Direct children of the entries directory, hidden files excluded,
    /// sorted by file name
    fn discover_entry_files(&self) -> Result<Vec<PathBuf>, BuildError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.entries_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| BuildError::Walk {
                path: self.entries_dir.clone(),
                source,
            })?;

            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            if !entry.file_type().is_file() {
                tracing::debug!("Skipping non-file {:?}", entry.path());
                continue;
            }

            files.push(entry.into_path());
        }

        Ok(files)
    }

    /// Read and convert one entry; `None` when title or date is missing
    fn load_entry(&self, path: &Path) -> Result<Option<Entry>, BuildError> {
        let raw = fs::read_to_string(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let converted = self
            .processor
            .convert(&raw)
            .map_err(|source| BuildError::Markdown {
                path: path.to_path_buf(),
                source,
            })?;

        let Some(meta) = EntryMeta::from_metadata(&converted.meta) else {
            tracing::debug!("Skipping {:?}: missing title or date", path);
            return Ok(None);
        };

        Ok(Some(Entry::new(meta, raw, converted.html)))
    }
}
