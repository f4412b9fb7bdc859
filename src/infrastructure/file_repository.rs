// File-backed dashboard repository (JSON or TOML, chosen by extension)
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::dashboard::Dashboard;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileDashboardRepository;

impl FileDashboardRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DashboardRepository for FileDashboardRepository {
    async fn load(&self, path: &Path) -> Result<Dashboard> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read dashboard {}", path.display()))?;

        let dashboard = match DocumentFormat::for_path(path) {
            DocumentFormat::Json => serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse JSON dashboard {}", path.display()))?,
            DocumentFormat::Toml => toml::from_str(&raw)
                .with_context(|| format!("Failed to parse TOML dashboard {}", path.display()))?,
        };

        tracing::debug!("Loaded dashboard from {}", path.display());
        Ok(dashboard)
    }

    async fn save(&self, path: &Path, dashboard: &Dashboard) -> Result<()> {
        let body = match DocumentFormat::for_path(path) {
            DocumentFormat::Json => serde_json::to_string_pretty(dashboard)
                .context("Failed to encode dashboard as JSON")?,
            DocumentFormat::Toml => {
                toml::to_string_pretty(dashboard).context("Failed to encode dashboard as TOML")?
            }
        };

        // Write next to the target and rename so a failed write never truncates it
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        tracing::info!("Saved dashboard to {}", path.display());
        Ok(())
    }
}
