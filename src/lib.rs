// Dashboard layout editor - grid layout engine, edit history and HTTP surface
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
