use serde::Deserialize;
use std::path::PathBuf;

const ENV_PREFIX: &str = "DASHBOARD_EDITOR";

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
    /// Brotli-compress JSON responses for clients that accept `br`
    pub compress: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    /// Document to open at startup; a missing file starts an empty dashboard
    pub path: PathBuf,
    #[serde(default = "default_title")]
    pub default_title: String,
}

fn default_title() -> String {
    "Dashboard".to_string()
}

/// Load settings from `config/editor.*` (optional) and `DASHBOARD_EDITOR__*`
/// environment variables, over built-in defaults.
pub fn load_editor_config() -> anyhow::Result<EditorConfig> {
    let settings = config::Config::builder()
        .set_default("server.bind_addr", "127.0.0.1:8080")?
        .set_default("server.compress", true)?
        .set_default("dashboard.path", "dashboard.json")?
        .add_source(config::File::with_name("config/editor").required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
