use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use super::error::LoadError;
use super::loader::load_file;
use super::model::Dataset;

/// Memoised dataset loader owned by the application root.
///
/// The file is read on first access and the cleaned dataset is kept for the
/// lifetime of the cache. It is never re-read unless [`invalidate`] or
/// [`set_path`] is called. A failed load is not cached, so the next access
/// retries.
///
/// [`invalidate`]: DatasetCache::invalidate
/// [`set_path`]: DatasetCache::set_path
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    dataset: OnceCell<Dataset>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dataset: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }

    /// The cached dataset, loading it on first use.
    pub fn get(&self) -> Result<&Dataset, LoadError> {
        if let Some(ds) = self.dataset.get() {
            return Ok(ds);
        }
        let ds = load_file(&self.path)?;
        Ok(self.dataset.get_or_init(|| ds))
    }

    /// Drop the cached dataset; the next [`get`](Self::get) reloads it.
    pub fn invalidate(&mut self) {
        if self.dataset.take().is_some() {
            log::debug!("Dataset cache for {} cleared", self.path.display());
        }
    }

    /// Point the cache at another file.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.invalidate();
    }
}
