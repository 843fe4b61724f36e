use super::Service;
use crate::routing::Vehicle;
use std::path::PathBuf;

/// Builder wiring the solver service's collaborators: the static
/// instances directory, the shared HTTP client and the routing
/// credentials.
pub struct ServiceBuilder {
    pub(super) instances_dir: PathBuf,
    pub(super) http: reqwest::Client,
    pub(super) api_key: Option<String>,
    pub(super) vehicle: Vehicle,
    pub(super) rng_seed: Option<u64>,
}

impl ServiceBuilder {
    /// Sets the routing provider credential. Without one, solving a real
    /// instance fails with an "API key missing" error.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicle = vehicle;
        self
    }

    /// Seeds the solver's random stream deterministically, making solves
    /// reproducible. Production runs normally leave this unset.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn build(self) -> Service {
        Service {
            instances_dir: self.instances_dir,
            http: self.http,
            api_key: self.api_key,
            vehicle: self.vehicle,
            rng_seed: self.rng_seed,
        }
    }
}
