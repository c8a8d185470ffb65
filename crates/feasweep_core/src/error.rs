use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors found while validating or expanding a sweep configuration
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// The sweep declares no parameter specifications
    NoParameters,
    /// The sweep declares no output specifications
    NoOutputs,
    /// A parameter expanded to zero values
    EmptyValues { object: String, constraint: String },
    /// A generated value range is malformed (bad count or step)
    InvalidRange {
        min: f64,
        max: f64,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoParameters => write!(f, "no sweep parameters configured"),
            ConfigError::NoOutputs => write!(f, "no outputs configured"),
            ConfigError::EmptyValues { object, constraint } => {
                write!(f, "parameter {object}.{constraint} expands to no values")
            }
            ConfigError::InvalidRange { min, max, reason } => {
                write!(f, "invalid value range (min={min}, max={max}): {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors reported by a CAD/FEA backend
#[derive(Debug)]
pub enum BackendError {
    /// The document could not be opened
    Open { path: PathBuf, message: String },
    /// An operation was attempted with no document open
    DocumentClosed,
    /// Named object is not present in the document
    ObjectNotFound(String),
    /// Named constraint is not present in the object's driving sketch
    ConstraintNotFound { object: String, constraint: String },
    /// Named solver object is not present in the document
    SolverNotFound(String),
    /// Named results container is not present in the document
    ResultsNotFound(String),
    /// The results container carries no field of this name
    FieldNotFound(String),
    /// The solver's prerequisite check rejected the analysis
    Prerequisite(String),
    /// The solve itself failed
    Solve(String),
    /// The backend process could not be started
    Launch { command: PathBuf, source: io::Error },
    /// I/O failure talking to the backend process
    Io(io::Error),
    /// The backend process replied with something unintelligible
    Protocol(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Open { path, message } => {
                write!(f, "failed to open {}: {message}", path.display())
            }
            BackendError::DocumentClosed => write!(f, "no document is open"),
            BackendError::ObjectNotFound(name) => write!(f, "object {name:?} not found"),
            BackendError::ConstraintNotFound { object, constraint } => {
                write!(f, "constraint {constraint:?} not found in sketch of {object:?}")
            }
            BackendError::SolverNotFound(name) => write!(f, "solver {name:?} not found"),
            BackendError::ResultsNotFound(name) => {
                write!(f, "results container {name:?} not found")
            }
            BackendError::FieldNotFound(name) => {
                write!(f, "result field {name:?} not present on results container")
            }
            BackendError::Prerequisite(msg) => write!(f, "prerequisite check failed: {msg}"),
            BackendError::Solve(msg) => write!(f, "solver execution failed: {msg}"),
            BackendError::Launch { command, source } => {
                write!(f, "failed to launch {}: {source}", command.display())
            }
            BackendError::Io(e) => write!(f, "backend I/O error: {e}"),
            BackendError::Protocol(msg) => write!(f, "backend protocol error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackendError::Launch { source, .. } => Some(source),
            BackendError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BackendError {
    fn from(e: io::Error) -> Self {
        BackendError::Io(e)
    }
}

/// Errors reducing a raw result field to a scalar
#[derive(Debug, Clone)]
pub enum ReductionError {
    /// The field array came back empty, so no scalar can be produced
    EmptyField { field: String },
}

impl fmt::Display for ReductionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReductionError::EmptyField { field } => {
                write!(f, "result field {field:?} is empty")
            }
        }
    }
}

impl std::error::Error for ReductionError {}

/// Top-level error for a sweep run
#[derive(Debug)]
pub enum SweepError {
    Config(ConfigError),
    Backend(BackendError),
    /// The solve failed at a specific sweep point (abort policy)
    Solve { index: usize, source: BackendError },
    /// Reducing an output failed at a specific sweep point
    Reduction {
        index: usize,
        source: ReductionError,
    },
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::Config(e) => write!(f, "{e}"),
            SweepError::Backend(e) => write!(f, "{e}"),
            SweepError::Solve { index, source } => {
                write!(f, "solve failed for sweep point {index}: {source}")
            }
            SweepError::Reduction { index, source } => {
                write!(f, "reduction failed for sweep point {index}: {source}")
            }
        }
    }
}

impl std::error::Error for SweepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SweepError::Config(e) => Some(e),
            SweepError::Backend(e) => Some(e),
            SweepError::Solve { source, .. } => Some(source),
            SweepError::Reduction { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for SweepError {
    fn from(e: ConfigError) -> Self {
        SweepError::Config(e)
    }
}

impl From<BackendError> for SweepError {
    fn from(e: BackendError) -> Self {
        SweepError::Backend(e)
    }
}
