// Immutable dashboard snapshot stored in the edit history
use super::dashboard::{Dashboard, View};
use serde::Serialize;

/// Owned copy of a dashboard at one point in time.
///
/// Fields are private so an entry can't be mutated once it is in the history;
/// `capture` clones the whole tree, so no two entries share data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DashboardSnapshot {
    dashboard: Dashboard,
}

impl DashboardSnapshot {
    pub fn capture(dashboard: &Dashboard) -> Self {
        Self {
            dashboard: dashboard.clone(),
        }
    }

    pub fn title(&self) -> &str {
        &self.dashboard.title
    }

    pub fn views(&self) -> &[View] {
        &self.dashboard.views
    }

    pub fn as_dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// A fresh, independently owned dashboard to use as live config.
    pub fn to_dashboard(&self) -> Dashboard {
        self.dashboard.clone()
    }
}
