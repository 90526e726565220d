use thiserror::Error;

/// Errors surfaced by the chamber and Floquet engines.
///
/// Numerical blow-up of the explicit scheme is not an error: an unstable
/// `dt`/`dx`/`c` combination simply produces growing or non-finite fields.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid grid: nx = {nx} (need >= 3), dx = {dx} (need finite > 0)")]
    InvalidGrid { nx: usize, dx: f64 },

    #[error("invalid parameter `{name}` = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("array length {actual} does not match grid size {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("incident side must be 'left' or 'right', got '{0}'")]
    UnknownIncident(String),

    #[error("invalid Floquet configuration: {0}")]
    InvalidFloquetConfig(String),

    #[error("Floquet system of dimension {dim} is singular")]
    SingularSystem { dim: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;
