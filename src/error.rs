use thiserror::Error;

pub type BindingResult<T> = Result<T, BindingError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingError {
    #[error("canvas not found")]
    CanvasNotFound,

    #[error("chart binding already disposed")]
    Disposed,

    #[error("failed to load module `{module}`: {reason}")]
    ModuleLoad { module: String, reason: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("chart backend error: {0}")]
    Backend(String),
}
