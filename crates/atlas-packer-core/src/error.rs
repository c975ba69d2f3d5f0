use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackerError {
    #[error("Invalid max size: {0} (must be at least 1)")]
    InvalidMaxSize(u32),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PackerError>;
