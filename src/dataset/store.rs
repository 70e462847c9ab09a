//! Shared handle to the live dataset.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use super::SiteDataset;
use crate::error::DatasetError;

/// Holds the current [`SiteDataset`] behind an `Arc`.
///
/// Readers take a snapshot and keep using it for the whole query. A reload
/// builds the new dataset completely before swapping the pointer, so a reader
/// sees either the old or the new dataset, never a partial one.
pub struct DatasetStore {
    path: PathBuf,
    current: RwLock<Arc<SiteDataset>>,
}

impl DatasetStore {
    /// Load the dataset at `path` and wrap it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref().to_path_buf();
        let dataset = SiteDataset::load(&path)?;
        Ok(Self::with_dataset(path, dataset))
    }

    pub fn with_dataset(path: PathBuf, dataset: SiteDataset) -> Self {
        Self {
            path,
            current: RwLock::new(Arc::new(dataset)),
        }
    }

    /// The dataset live at the time of the call.
    pub fn snapshot(&self) -> Arc<SiteDataset> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Reload from the configured path.
    ///
    /// On failure the current dataset stays live.
    pub fn reload(&self) -> Result<Arc<SiteDataset>, DatasetError> {
        let dataset = SiteDataset::load(&self.path)?;
        Ok(self.replace(dataset))
    }

    /// Swap in `dataset`, returning the new snapshot.
    pub fn replace(&self, dataset: SiteDataset) -> Arc<SiteDataset> {
        let next = Arc::new(dataset);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&next);
        info!("Dataset replaced: {} sites", next.len());
        next
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
