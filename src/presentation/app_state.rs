// Application state for HTTP handlers
use crate::application::dashboard_repository::DashboardRepository;
use crate::application::editor_session::DashboardEditorSession;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    /// Every handler goes through this lock, so edits are applied one at a time.
    pub session: Mutex<DashboardEditorSession>,
    pub repository: Arc<dyn DashboardRepository>,
    pub compress: bool,
}
