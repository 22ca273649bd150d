use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while configuring or running the time-stepper.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{arity} parameters given: only 1 (acceleration) or 2 (rate) are supported")]
    UnsupportedFunctionSignature { arity: usize },

    /// The derivative function failed; the run is abandoned without a partial trajectory.
    #[error("derivative evaluation failed at t = {time}")]
    PropagatedComputation {
        time: f64,
        #[source]
        source: anyhow::Error,
    },
}

impl SolverError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Failures raised while loading or validating JSON configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{origin}' is not a valid JSON configuration: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("charge '{name}' is missing required keys (x, y, q)")]
    IncompleteCharge { name: String },

    #[error("invalid configuration value: {0}")]
    Invalid(String),
}

/// Rejected inputs for the field and projectile computations.
#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
