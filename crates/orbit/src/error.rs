use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrbitError {
    #[error("A carousel needs at least one item")]
    EmptyLayout,
    #[error("Unknown easing function '{0}'")]
    UnknownEasing(String),
    #[error("Invalid animation duration: {0}s")]
    InvalidDuration(f64),
    #[error("Invalid radius: {0}")]
    InvalidRadius(f64),
}
