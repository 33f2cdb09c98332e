use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::estimation::PersistedState;
use crate::port::StateRepository;

#[derive(Debug, Deserialize, Clone)]
pub struct StateFile {
    pub path: PathBuf,
}

impl StateFile {
    pub fn new_repository(&self) -> JsonStateRepository {
        JsonStateRepository::new(&self.path)
    }
}

#[derive(Debug, Clone)]
pub struct JsonStateRepository {
    path: PathBuf,
}

impl JsonStateRepository {
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_owned() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateRepository for JsonStateRepository {
    async fn load(&self) -> anyhow::Result<Option<PersistedState>> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No state file at {}, starting fresh", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e).with_context(|| format!("Error reading state file {}", self.path.display())),
        };

        let state = serde_json::from_slice(&content)
            .with_context(|| format!("Error parsing state file {}", self.path.display()))?;

        Ok(Some(state))
    }

    async fn save(&self, state: &PersistedState) -> anyhow::Result<()> {
        let content = serde_json::to_vec_pretty(state)?;
        let temp_path = self.temp_path();

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Error creating state directory {}", dir.display()))?;
        }

        tokio::fs::write(&temp_path, content)
            .await
            .with_context(|| format!("Error writing state file {}", temp_path.display()))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .with_context(|| format!("Error replacing state file {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::unit::EfficiencyIndex;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pellet-estimator-{}-{}", std::process::id(), name))
            .join("state.json")
    }

    #[tokio::test]
    async fn test_missing_file_is_fresh_state() {
        let repo = JsonStateRepository::new(&temp_file("missing"));

        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let path = temp_file("roundtrip");
        let repo = JsonStateRepository::new(&path);
        let state = PersistedState {
            house_index: Some(EfficiencyIndex(0.91)),
            office_index: None,
            ..Default::default()
        };

        repo.save(&state).await.unwrap();
        let loaded = repo.load().await.unwrap().unwrap();

        assert_eq!(loaded.house_index, Some(EfficiencyIndex(0.91)));
        assert_eq!(loaded.office_index, None);
        assert!(!repo.temp_path().exists());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let path = temp_file("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{ not json").unwrap();

        let result = JsonStateRepository::new(&path).load().await;

        assert!(result.is_err());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
