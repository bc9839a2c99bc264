use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZanzibarError {
    #[error("Invalid tuple: {0}")]
    InvalidTuple(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<ZanzibarError> for history_engine::HistoryError {
    fn from(err: ZanzibarError) -> Self {
        history_engine::HistoryError::PermissionCheck(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ZanzibarError>;
