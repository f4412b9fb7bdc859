// Errors raised by editor session operations
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("view {0} does not exist")]
    ViewNotFound(usize),

    #[error("card {card} does not exist in view {view}")]
    CardNotFound { view: usize, card: usize },

    #[error("a drag is already in progress on view {0}")]
    DragInProgress(usize),

    #[error("no drag in progress")]
    NoDragInProgress,
}

pub type Result<T> = std::result::Result<T, SessionError>;
