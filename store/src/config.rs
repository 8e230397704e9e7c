use std::path::PathBuf;

/// Location of the storage namespace shared by the app and widget processes.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding one file per persisted key. Both processes must
    /// resolve the same path for the shared state to line up.
    pub dir: PathBuf,
}

impl StoreConfig {
    /// Create a new store configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let dir = std::env::var("COINWATCH_SHARED_DIR")
            .map_err(|_| "COINWATCH_SHARED_DIR environment variable not set")?;

        Ok(Self {
            dir: PathBuf::from(dir),
        })
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}
