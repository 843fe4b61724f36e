use crate::services::solver;
use std::path::PathBuf;

/// Environment variable carrying the routing provider credential.
pub const ROUTING_API_KEY_VAR: &str = "ROUTING_API_KEY";

/// Bootstraps the solver service with all required dependencies.
///
/// Builds the shared HTTP client, picks up the routing credential from
/// the environment when present, and returns a builder for the solver
/// service.
pub fn bootstrap(instances_dir: impl Into<PathBuf>) -> anyhow::Result<solver::ServiceBuilder> {
    let http = reqwest::Client::builder().build()?;

    let mut builder = solver::Service::builder(instances_dir.into(), http);

    if let Ok(api_key) = std::env::var(ROUTING_API_KEY_VAR) {
        builder = builder.with_api_key(api_key);
    }

    Ok(builder)
}
