use crate::models::{Cost, CostTable, CostTableError, GeoPoint};
use crate::routing::provider::{DirectionsResponse, Provider, UnsupportedApiError, Vehicle};
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::instrument;

/// Upper bound on in-flight provider requests. N can reach 100, putting
/// N(N-1) just under 10 000 pairs per construction.
const MAX_IN_FLIGHT: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error(transparent)]
    UnsupportedApi(#[from] UnsupportedApiError),
    #[error("API key missing")]
    ApiKeyMissing,
    #[error("fetching routing data failed: provider returned status {status}")]
    UpstreamStatus { status: u16, body: String },
    #[error("fetching routing data failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("fetching routing data failed: no route in provider response")]
    MissingRoute,
    #[error(transparent)]
    CostTable(#[from] CostTableError),
}

/// The single provider call: duration in seconds from origin to
/// destination. A trait seam so the assembly logic can be exercised
/// against stubbed providers.
pub(crate) trait RouteSource: Send + Sync {
    fn fetch_duration(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> BoxFuture<'_, Result<Cost, RoutingError>>;
}

/// Production source backed by the provider's HTTP directions endpoint.
pub(crate) struct HttpRouteSource {
    http: reqwest::Client,
    provider: Provider,
    api_key: String,
    vehicle: Vehicle,
}

impl HttpRouteSource {
    pub(crate) fn new(
        http: reqwest::Client,
        provider: Provider,
        api_key: String,
        vehicle: Vehicle,
    ) -> Self {
        Self {
            http,
            provider,
            api_key,
            vehicle,
        }
    }
}

impl RouteSource for HttpRouteSource {
    fn fetch_duration(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> BoxFuture<'_, Result<Cost, RoutingError>> {
        Box::pin(async move {
            let response = self
                .http
                .get(self.provider.base_url())
                .query(&[
                    ("type", self.vehicle.as_str().to_string()),
                    ("origin", origin.to_string()),
                    ("destination", destination.to_string()),
                ])
                .header(self.provider.api_key_header(), &self.api_key)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(RoutingError::UpstreamStatus {
                    status: status.as_u16(),
                    body,
                });
            }

            let directions: DirectionsResponse =
                response.json().await.map_err(RoutingError::Transport)?;

            directions.duration().ok_or(RoutingError::MissingRoute)
        })
    }
}

/// Assembles a cost table by fetching every off-diagonal pair from the
/// routing provider.
pub struct Client {
    source: Arc<dyn RouteSource>,
    max_in_flight: usize,
}

impl Client {
    pub(crate) fn new(source: Arc<dyn RouteSource>) -> Self {
        Self {
            source,
            max_in_flight: MAX_IN_FLIGHT,
        }
    }

    #[cfg(test)]
    fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Fetches the N(N-1) pairwise durations with bounded concurrency and
    /// awaits them collectively. The first failure aborts the whole
    /// construction; outstanding requests are dropped and no partial
    /// table is returned. Collected entries are sorted by
    /// (origin, destination) during assembly.
    #[instrument(level = "info", skip(self, coordinates), fields(dimension = coordinates.len(), max_in_flight = self.max_in_flight))]
    pub async fn cost_table(&self, coordinates: &[GeoPoint]) -> Result<CostTable, RoutingError> {
        let dimension = coordinates.len();

        let requests = (0..dimension)
            .flat_map(|from| (0..dimension).map(move |to| (from, to)))
            .filter(|(from, to)| from != to)
            .map(|(from, to)| {
                let source = Arc::clone(&self.source);
                let origin = coordinates[from];
                let destination = coordinates[to];

                async move {
                    let duration = source.fetch_duration(origin, destination).await?;
                    Ok::<_, RoutingError>((from, to, duration))
                }
            });

        let pairs: Vec<(usize, usize, Cost)> = stream::iter(requests)
            .buffer_unordered(self.max_in_flight)
            .try_collect()
            .await?;

        Ok(CostTable::from_pairs(dimension, pairs)?)
    }
}
