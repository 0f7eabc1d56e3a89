use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JDK tools error: {0}")]
    JdkTools(#[from] crate::runtime::JdkToolsError),

    #[error("GC log source unavailable ({source_name}): {reason}")]
    ListenerUnavailable { source_name: String, reason: String },

    #[error("Cannot compute {0} of an empty sample set")]
    EmptyInput(&'static str),

    #[error("Invalid stress level {0}, expected 1, 2 or 3")]
    InvalidStressLevel(u8),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
