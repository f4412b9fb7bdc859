// Application layer - Layout engine, edit history and the editor session
pub mod dashboard_repository;
pub mod edit_history;
pub mod editor_session;
pub mod error;
pub mod grid_format;
pub mod layout_selector;
pub mod masonry;
pub mod size_constraints;
