use crate::instance::InstanceError;
use crate::models::{ConfigError, CoordinateError, ProblemError};
use crate::routing::RoutingError;
use crate::services::solver::EngineError;
use std::path::PathBuf;

/// Errors a solve can surface to the web layer.
///
/// Every variant carries a human message; [`Error::status`] supplies the
/// HTTP-style numeric severity the boundary's error translation maps
/// from.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Problem(#[from] ProblemError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("problem dimension {problem} does not match configured dimension {config}")]
    DimensionMismatch { problem: usize, config: usize },
    #[error("instance file not found: {path}")]
    InstanceFileMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("coordinates file unreadable: {path}")]
    CoordinatesUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("coordinates file empty: {path}")]
    CoordinatesEmpty { path: PathBuf },
    #[error("expected {expected} coordinates, found {found}")]
    CoordinateCountMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
    #[error(transparent)]
    Instance(#[from] InstanceError),
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl Error {
    /// HTTP-style severity of the error kind: bad input and missing
    /// resources are client-class, upstream and invariant failures are
    /// server-class.
    pub fn status(&self) -> u16 {
        match self {
            Error::Problem(_)
            | Error::Config(_)
            | Error::DimensionMismatch { .. }
            | Error::CoordinateCountMismatch { .. }
            | Error::Coordinate(_)
            | Error::Instance(_) => 400,
            Error::InstanceFileMissing { .. }
            | Error::CoordinatesUnreadable { .. }
            | Error::CoordinatesEmpty { .. } => 404,
            Error::Routing(routing) => match routing {
                RoutingError::UnsupportedApi(_) => 400,
                RoutingError::ApiKeyMissing => 500,
                _ => 502,
            },
            Error::Engine(_) => 500,
        }
    }
}
