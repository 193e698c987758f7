use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::map::MetroMap;

/// File name of the map document inside the data directory.
pub const MAP_FILENAME: &str = "metro_data.json";

/// On-disk home of the map document.
///
/// The store only moves raw documents; decoding them into a [`MetroMap`]
/// is [`MapStore::load`] delegating to ingestion.
#[derive(Debug, Clone)]
pub struct MapStore {
    path: PathBuf,
}

impl MapStore {
    pub fn new(path: impl Into<PathBuf>) -> MapStore {
        MapStore { path: path.into() }
    }

    /// Store rooted at the platform data directory.
    pub fn default_location() -> Result<MapStore> {
        Ok(MapStore {
            path: default_map_path()?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the stored document without interpreting it.
    pub fn load_document(&self) -> Result<Value> {
        if !self.path.exists() {
            return Err(Error::DataFileNotFound {
                path: self.path.clone(),
            });
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load the stored document and build the map from it.
    pub fn load(&self) -> Result<MetroMap> {
        MetroMap::from_value(&self.load_document()?)
    }

    /// Replace the stored document atomically.
    ///
    /// The new content is written next to the destination and moved into
    /// place, so a crash mid-write never leaves a half-written file.
    pub fn replace(&self, document: &Value) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;
        let mut staged = NamedTempFile::new_in(&parent)?;
        serde_json::to_writer_pretty(&mut staged, document)?;
        staged.flush()?;
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        staged.persist(&self.path).map_err(|err| err.error)?;
        debug!(path = %self.path.display(), "map document replaced");
        Ok(())
    }
}

/// Platform-specific default path of the map document.
pub fn default_map_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("dev", "metronav", "metronav").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(MAP_FILENAME))
}
