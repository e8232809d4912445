//! Error types for the hydrogen-atom simulation.
//!
//! Physics invariant violations are not represented here; those are
//! programming errors and fail fast through assertions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Wavelength {wavelength} nm is outside [{min}, {max}] nm")]
    WavelengthOutOfRange { wavelength: f64, min: f64, max: f64 },

    #[error("Snapshot limit of {max} reached")]
    SnapshotLimit { max: usize },

    #[error("No snapshot with index {0}")]
    UnknownSnapshot(u32),

    #[error("Invalid quantum state (n={n}, l={l}, m={m})")]
    InvalidQuantumState { n: u8, l: u8, m: i8 },
}

impl SimulationError {
    pub fn config(message: impl Into<String>) -> Self {
        SimulationError::Config(message.into())
    }
}

pub type SimResult<T> = Result<T, SimulationError>;
