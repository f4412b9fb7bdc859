// Domain layer - Dashboard documents and layout value types
pub mod card;
pub mod dashboard;
pub mod layout;
pub mod snapshot;
