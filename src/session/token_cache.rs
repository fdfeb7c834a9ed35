use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Single-value durable store for the access token.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached token, or `None` when nothing usable has been stored yet.
    pub async fn load(&self) -> io::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No cached token at {}", self.path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrites any previously cached token.
    pub async fn store(&self, token: &str) -> io::Result<()> {
        tokio::fs::write(&self.path, token).await
    }
}
