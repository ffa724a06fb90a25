use thiserror::Error;

#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("article unavailable: {0}")]
    ArticleUnavailable(String),

    #[error("engine invariant violated: {0}")]
    EngineInvariantViolation(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JudgeError>;
