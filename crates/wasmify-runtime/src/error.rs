use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to load module: {0}")]
    ModuleLoad(String),

    #[error("instantiation failed: {0}")]
    Instantiation(String),

    #[error("function not found: {0}")]
    FunctionNotFound(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The guest ran but did not complete successfully (trap, timeout, or a
    /// reported error).
    #[error("WebAssembly execution failed: {0}")]
    ExecutionFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
