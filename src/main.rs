// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use dashboard_layout_editor::application::dashboard_repository::DashboardRepository;
use dashboard_layout_editor::application::editor_session::DashboardEditorSession;
use dashboard_layout_editor::domain::dashboard::Dashboard;
use dashboard_layout_editor::infrastructure::config::load_editor_config;
use dashboard_layout_editor::infrastructure::file_repository::FileDashboardRepository;
use dashboard_layout_editor::presentation::app_state::AppState;
use dashboard_layout_editor::presentation::handlers::{
    add_card, begin_drag, cancel_drag, end_drag, get_dashboard, get_history, get_view_layout,
    health_check, put_dashboard, put_selection, put_view_layout, redo, remove_card, save, undo,
    update_drag,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_editor_config()?;

    // Open the dashboard (infrastructure layer)
    let repository: Arc<dyn DashboardRepository> = Arc::new(FileDashboardRepository::new());
    let path = config.dashboard.path.clone();
    let dashboard = if tokio::fs::try_exists(&path).await? {
        repository.load(&path).await?
    } else {
        tracing::warn!(
            "{} does not exist yet; starting an empty dashboard",
            path.display()
        );
        Dashboard::new(config.dashboard.default_title.clone(), Vec::new())
    };

    // Create the editor session (application layer)
    let session = DashboardEditorSession::open(dashboard, Some(path));

    // Create application state
    let state = Arc::new(AppState {
        session: Mutex::new(session),
        repository,
        compress: config.server.compress,
    });

    // Build router (presentation layer)
    // Compression is handled in our response builder, so no CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard).put(put_dashboard))
        .route("/views/:view/layout", get(get_view_layout).put(put_view_layout))
        .route("/views/:view/cards", post(add_card))
        .route("/views/:view/cards/:card", delete(remove_card))
        .route("/views/:view/drag", post(begin_drag))
        .route("/drag", put(update_drag).delete(cancel_drag))
        .route("/drag/end", post(end_drag))
        .route("/selection", put(put_selection))
        .route("/history", get(get_history))
        .route("/history/undo", post(undo))
        .route("/history/redo", post(redo))
        .route("/save", post(save))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind_addr.parse()?;
    tracing::info!("Starting dashboard layout editor on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
