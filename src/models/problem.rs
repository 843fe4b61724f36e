use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Travelling-salesman variant. Asymmetry needs no special handling in
/// the solver, the cost table simply stops being symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProblemType {
    Tsp,
    Atsp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeWeightType {
    #[serde(rename = "GEO")]
    Geo,
    #[serde(rename = "EUC_2D")]
    Euc2d,
    #[serde(rename = "EXPLICIT")]
    Explicit,
}

/// Tag for the solver backing a request. One value today; the set is
/// closed and adding to it is a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    Ga,
}

/// Where the cost table comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instance {
    /// Geographic coordinates resolved through an external routing
    /// provider, selected by name.
    Real {
        api_name: String,
        coordinates_path: PathBuf,
    },
    /// A TSPLIB-format file under the service's static instances
    /// directory, with the published optimum for reference.
    Synthetic {
        instance_name: String,
        best_known_cost: f64,
    },
}

/// The problem descriptor handed over by the HTTP collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub problem_type: ProblemType,
    pub edge_weight_type: EdgeWeightType,
    pub dimension: usize,
    pub algorithm: Algorithm,
    pub instance: Instance,
}

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum ProblemError {
    #[error("dimension must be between 3 and 100, got {0}")]
    DimensionOutOfRange(usize),
    #[error("instance name must not be empty")]
    EmptyInstanceName,
}

impl Problem {
    /// Boundary validation, run once before a solve begins.
    pub fn validate(&self) -> Result<(), ProblemError> {
        if !(3..=100).contains(&self.dimension) {
            return Err(ProblemError::DimensionOutOfRange(self.dimension));
        }

        if let Instance::Synthetic { instance_name, .. } = &self.instance {
            if instance_name.trim().is_empty() {
                return Err(ProblemError::EmptyInstanceName);
            }
        }

        Ok(())
    }
}
