// Repository trait for dashboard persistence
use crate::domain::dashboard::Dashboard;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Load a dashboard document from `path`
    async fn load(&self, path: &Path) -> anyhow::Result<Dashboard>;

    /// Write a dashboard document to `path`, replacing its contents
    async fn save(&self, path: &Path, dashboard: &Dashboard) -> anyhow::Result<()>;
}
