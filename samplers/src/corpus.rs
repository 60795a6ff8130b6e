//! Image discovery

use ocr_bench_core::SamplerError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions recognised as images (compared case-insensitively)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// The set of image files found under a root folder
///
/// Built once at startup and never rescanned; files added or removed
/// while a run is in progress are not noticed.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    paths: Vec<PathBuf>,
}

impl Corpus {
    /// Walk `root` recursively and collect every image file
    ///
    /// Entries that cannot be read (permissions, broken links) are skipped.
    /// A missing root behaves like an empty one.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError::CorpusEmpty` when no image is found.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, SamplerError> {
        let root = root.as_ref();
        let mut paths = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
        {
            if is_image(entry.path()) {
                paths.push(entry.into_path());
            }
        }

        Self::from_paths(root, paths)
    }

    /// Build a corpus from an explicit list of paths
    ///
    /// # Errors
    ///
    /// Returns `SamplerError::CorpusEmpty` when `paths` is empty.
    pub fn from_paths(root: impl Into<PathBuf>, paths: Vec<PathBuf>) -> Result<Self, SamplerError> {
        let root = root.into();
        if paths.is_empty() {
            return Err(SamplerError::CorpusEmpty { root });
        }

        tracing::debug!(root = %root.display(), images = paths.len(), "Corpus loaded");
        Ok(Self { root, paths })
    }

    /// Folder the corpus was loaded from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discovered image paths
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of images
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false for a successfully loaded corpus
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Whether `path` has one of the [`IMAGE_EXTENSIONS`]
pub(crate) fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
