use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Unrecognized hash format: {0}")]
    UnrecognizedHash(String),

    #[error("Invalid work factor {0}: bcrypt accepts 4 through 31")]
    InvalidCost(u32),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No hash was generated for user '{0}'")]
    MissingHash(String),

    #[error("Hash for user '{0}' has no matching credential")]
    UnusedHash(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
