use thiserror::Error;

/// Errors that can occur in the host layer.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("cycle scheduler error: {0}")]
    Cycle(#[from] takt_cycle::CycleError),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),
}
