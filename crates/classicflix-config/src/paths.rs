use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("CLASSICFLIX_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("classicflix");

        Ok(Self::with_base(base_dir))
    }

    /// Lay everything out under one directory (containers, tests)
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn from_docker_env() -> Self {
        Self::with_base(container_base_path())
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("cache")
    }

    /// Last catalog snapshot fetched from the store, used in offline mode
    pub fn catalog_cache_file(&self) -> PathBuf {
        self.cache_dir().join("catalog.json")
    }

    pub fn interactions_cache_file(&self) -> PathBuf {
        self.cache_dir().join("interactions.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("classicflix.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.cache_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // An explicit base path (or an existing container base) wins
        if std::env::var("CLASSICFLIX_BASE_PATH").is_ok() || container_base_path().exists() {
            return Self::from_docker_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_base() {
        let paths = PathManager::with_base(PathBuf::from("/tmp/cf"));
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/cf/config.toml"));
        assert_eq!(paths.catalog_cache_file(), PathBuf::from("/tmp/cf/data/cache/catalog.json"));
        assert_eq!(paths.log_file(), PathBuf::from("/tmp/cf/logs/classicflix.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path().join("cf"));
        paths.ensure_directories().unwrap();
        assert!(paths.cache_dir().is_dir());
        assert!(paths.log_dir().is_dir());
    }
}
