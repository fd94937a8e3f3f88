use thiserror::Error;

/// Failures of the sensor or button back-ends. Fault and Error verdicts are
/// not errors; they are ordinary resolver output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GearError {
    /// Back-end error of unknown type, carried as text.
    #[error("sensor back-end error: {0}")]
    Hardware(String),
    /// Known `HwError` from the SPI/GPIO back-ends.
    #[error("sensor hardware fault: {0}")]
    HardwareFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("sensor io error: {0}")]
    Io(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing hall sensors")]
    MissingSensors,
    #[error("missing button pins")]
    MissingButtons,
    #[error("invalid session config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
