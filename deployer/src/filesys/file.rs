//! File operations

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::deploy::definition::TemplateSource;
use crate::errors::DeployError;

/// A file wrapper with path
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    /// Create a new file reference
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reference `relative` inside the `root` directory
    pub fn in_workspace(root: impl AsRef<Path>, relative: impl AsRef<Path>) -> Self {
        Self::new(root.as_ref().join(relative))
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read file contents as string
    pub async fn read_string(&self) -> Result<String, DeployError> {
        let contents = fs::read_to_string(&self.path).await?;
        Ok(contents)
    }
}

#[async_trait]
impl TemplateSource for File {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> Result<String, DeployError> {
        self.read_string()
            .await
            .map_err(|_| DeployError::SourceNotFound(self.location()))
    }
}
