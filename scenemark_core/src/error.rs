//! Error types for benchmark setup and execution.

use thiserror::Error;

/// Errors that stop a benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    #[error("scene '{scene}' rejected option {option}={value}: {reason}")]
    OptionRejected {
        scene: String,
        option: String,
        value: String,
        reason: OptionError,
    },

    #[error("invalid benchmark description '{description}': {reason}")]
    InvalidDescription {
        description: String,
        reason: &'static str,
    },

    #[error("display initialization failed: {0}")]
    Display(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Why a scene refused an option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("no option named '{option}'")]
    Unknown { option: String },

    #[error("'{value}' is not valid for '{option}' (expected {expected})")]
    Invalid {
        option: String,
        value: String,
        expected: String,
    },
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, BenchError>;
