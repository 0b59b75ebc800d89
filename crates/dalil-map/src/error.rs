use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("the proximity pulse needs a running tokio runtime")]
    RuntimeUnavailable,

    #[error("no marker with id {0}")]
    UnknownMarker(String),

    #[error("primary action for marker {0} is disabled")]
    ActionDisabled(String),
}
