mod client;
mod provider;

pub use client::{Client, RoutingError};
pub use provider::{Provider, UnsupportedApiError, Vehicle};

pub(crate) use client::{HttpRouteSource, RouteSource};
