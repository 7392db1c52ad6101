use thiserror::Error;

/// Errors raised while parsing a yard configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config has no stacks")]
    NoStacks,
    #[error("config must have at least one buffer stack between entry and outgoing")]
    NoBuffers,
    #[error("buffer_capacity must be at least 1, got {0}")]
    InvalidBufferCapacity(i64),
    #[error("duplicate container id: {0}")]
    DuplicateContainerId(String),
}
