//! Loading host update snapshots (`UpdateOptions`) from JSON or TOML files.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::UpdateOptions;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Toml,
}

impl SnapshotFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    pub fn parse(self, content: &str) -> Result<UpdateOptions, String> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Reads snapshot files through a [`FileSystem`].
pub struct SnapshotLoader {
    fs: Arc<dyn FileSystem>,
}

impl Default for SnapshotLoader {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl SnapshotLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> InfraResult<UpdateOptions> {
        let format = SnapshotFormat::from_path(path)
            .ok_or_else(|| InfraError::UnsupportedFormat(path.to_path_buf()))?;
        if !self.fs.exists(path) {
            return Err(InfraError::NotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;

        let options = format
            .parse(&content)
            .map_err(|message| InfraError::parse(path, message))?;
        debug!(
            data_views = options.data_views.as_ref().map_or(0, Vec::len),
            "loaded snapshot"
        );
        Ok(options)
    }

    pub fn load_all<P: AsRef<Path>>(&self, paths: &[P]) -> InfraResult<Vec<UpdateOptions>> {
        paths.iter().map(|p| self.load(p.as_ref())).collect()
    }
}
