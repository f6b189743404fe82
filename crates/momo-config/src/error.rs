use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A `${NAME}` placeholder referenced an unset or empty variable.
    #[error("Environment variable {0} is not set")]
    MissingEnvVar(String),
    /// The resolved field table did not fit the typed plugin config.
    #[error("resolved config does not match plugin schema: {0}")]
    Schema(#[from] serde_json::Error),
}
