#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout input: {0}")]
    Config(#[from] serde_json::Error),
    #[error("background layout failed: {message}")]
    WorkerFailed { message: String },
    #[error("background layout terminated without a result")]
    WorkerTerminated,
    #[error("background layout was stopped before completion")]
    WorkerStopped,
}

pub type Result<T> = std::result::Result<T, Error>;
