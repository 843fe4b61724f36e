use serde::{Deserialize, Serialize};

/// The closed set of supported routing providers. Adding a provider is a
/// code change, not configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Neshan,
}

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
#[error("unsupported API: {name:?}")]
pub struct UnsupportedApiError {
    pub name: String,
}

impl Provider {
    pub fn from_name(name: &str) -> Result<Self, UnsupportedApiError> {
        match name {
            "neshan" => Ok(Self::Neshan),
            _ => Err(UnsupportedApiError {
                name: name.to_string(),
            }),
        }
    }

    pub(crate) fn base_url(&self) -> &'static str {
        match self {
            Self::Neshan => "https://api.neshan.org/v4/direction",
        }
    }

    pub(crate) fn api_key_header(&self) -> &'static str {
        match self {
            Self::Neshan => "Api-Key",
        }
    }
}

/// Vehicle profile forwarded to the provider as the `type` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vehicle {
    #[default]
    Car,
    Motorcycle,
}

impl Vehicle {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Motorcycle => "motorcycle",
        }
    }
}

// ============================================================
// Wire types
// ============================================================

/// Subset of the provider's directions response the client consumes.
/// Distances are parsed but only durations become costs.
#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    #[serde(default)]
    pub(crate) routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Route {
    #[serde(default)]
    pub(crate) legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Leg {
    #[allow(dead_code)]
    pub(crate) distance: Measure,
    pub(crate) duration: Measure,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Measure {
    pub(crate) value: f64,
}

impl DirectionsResponse {
    /// The duration in seconds of the first leg of the first route.
    pub(crate) fn duration(&self) -> Option<f64> {
        let leg = self.routes.first()?.legs.first()?;
        Some(leg.duration.value)
    }
}
