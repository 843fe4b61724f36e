use super::{Engine, Error, ServiceBuilder, Terminated};
use crate::instance::TsplibInstance;
use crate::models::{CostTable, GeoPoint, Instance, Problem, SolvedProblem, SolverConfig};
use crate::routing::{self, HttpRouteSource, Provider, RoutingError, Vehicle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::instrument;

/// Solver service: resolves a problem descriptor to a cost table and runs
/// the genetic algorithm over it.
pub struct Service {
    pub(super) instances_dir: PathBuf,
    pub(super) http: reqwest::Client,
    pub(super) api_key: Option<String>,
    pub(super) vehicle: Vehicle,
    pub(super) rng_seed: Option<u64>,
}

impl Service {
    pub fn builder(instances_dir: PathBuf, http: reqwest::Client) -> ServiceBuilder {
        ServiceBuilder {
            instances_dir,
            http,
            api_key: None,
            vehicle: Vehicle::default(),
            rng_seed: None,
        }
    }

    /// Solves one problem under the given configuration.
    ///
    /// Validation happens once up front; the solve itself is synchronous
    /// CPU work and can only be interrupted through the cancellation
    /// handle at generation boundaries.
    #[instrument(level = "info", skip(self, problem, config, cancelled), fields(dimension = problem.dimension, problem_type = ?problem.problem_type, algorithm = ?problem.algorithm))]
    pub async fn solve(
        &self,
        problem: &Problem,
        config: &SolverConfig,
        cancelled: Option<&dyn Terminated>,
    ) -> Result<SolvedProblem, Error> {
        tracing::info!("Solve requested");

        problem.validate()?;

        if problem.dimension != config.dimension() {
            return Err(Error::DimensionMismatch {
                problem: problem.dimension,
                config: config.dimension(),
            });
        }

        let table = self.resolve_cost_table(problem).await?;

        let mut rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let solved = Engine::new(&table, config).solve(&mut rng, cancelled)?;

        tracing::info!(
            best_cost = solved.best_cost,
            generations = solved.generations,
            solved_in_ms = solved.solved_in_ms,
            "Solve finished"
        );

        Ok(solved)
    }

    /// Builds the cost table the solver consumes: parsed and computed
    /// locally for synthetic instances, fetched from the routing provider
    /// for real ones.
    async fn resolve_cost_table(&self, problem: &Problem) -> Result<CostTable, Error> {
        match &problem.instance {
            Instance::Synthetic { instance_name, .. } => {
                let path = self.instances_dir.join(instance_name);
                let content =
                    tokio::fs::read_to_string(&path)
                        .await
                        .map_err(|source| Error::InstanceFileMissing {
                            path: path.clone(),
                            source,
                        })?;

                let instance = TsplibInstance::parse(&content)?;
                Ok(instance.cost_table()?)
            }
            Instance::Real {
                api_name,
                coordinates_path,
            } => {
                let provider = Provider::from_name(api_name).map_err(RoutingError::from)?;
                let api_key = self
                    .api_key
                    .clone()
                    .ok_or(Error::Routing(RoutingError::ApiKeyMissing))?;

                let coordinates = self
                    .read_coordinates(coordinates_path, problem.dimension)
                    .await?;

                let source =
                    HttpRouteSource::new(self.http.clone(), provider, api_key, self.vehicle);
                let client = routing::Client::new(Arc::new(source));

                Ok(client.cost_table(&coordinates).await?)
            }
        }
    }

    /// Reads a real-instance coordinate file: one "lat,long" per line,
    /// blank lines tolerated.
    async fn read_coordinates(
        &self,
        path: &Path,
        expected: usize,
    ) -> Result<Vec<GeoPoint>, Error> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| Error::CoordinatesUnreadable {
                    path: path.to_path_buf(),
                    source,
                })?;

        let mut coordinates = Vec::with_capacity(expected);
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            coordinates.push(GeoPoint::parse(line)?);
        }

        if coordinates.is_empty() {
            return Err(Error::CoordinatesEmpty {
                path: path.to_path_buf(),
            });
        }

        if coordinates.len() != expected {
            return Err(Error::CoordinateCountMismatch {
                expected,
                found: coordinates.len(),
            });
        }

        Ok(coordinates)
    }
}
