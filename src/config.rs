//! Backend selection and credentials.
//!
//! An [`OptimizerConfig`] can be deserialized from the host application's
//! own configuration, or read from environment variables with
//! [`OptimizerConfig::from_env`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::haversine::HaversineRouter;
use crate::mapbox::{MapboxClient, MapboxConfig};
use crate::nominatim::{NominatimConfig, NominatimGeocoder};
use crate::opencage::{OpenCageConfig, OpenCageGeocoder};
use crate::openrouteservice::{OpenRouteServiceClient, OpenRouteServiceConfig};
use crate::route::{RouteMode, RouteOptions};
use crate::traffic::TimeOfDayTraffic;
use crate::traits::{Geocoder, RouteProvider};
use crate::workflow::{GeocodeMode, RouteOptimizer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum GeocoderConfig {
    #[serde(rename = "opencage")]
    OpenCage(OpenCageConfig),
    Nominatim(NominatimConfig),
}

impl GeocoderConfig {
    pub fn build(self) -> Result<Box<dyn Geocoder>, ConfigError> {
        Ok(match self {
            GeocoderConfig::OpenCage(config) => Box::new(OpenCageGeocoder::new(config)?),
            GeocoderConfig::Nominatim(config) => Box::new(NominatimGeocoder::new(config)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum RouterConfig {
    #[serde(rename = "openrouteservice")]
    OpenRouteService(OpenRouteServiceConfig),
    Mapbox(MapboxConfig),
    StraightLine(HaversineRouter),
}

impl RouterConfig {
    pub fn build(self) -> Result<Box<dyn RouteProvider>, ConfigError> {
        Ok(match self {
            RouterConfig::OpenRouteService(config) => {
                Box::new(OpenRouteServiceClient::new(config)?)
            }
            RouterConfig::Mapbox(config) => Box::new(MapboxClient::new(config)?),
            RouterConfig::StraightLine(router) => Box::new(router),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub geocoder: GeocoderConfig,
    pub router: RouterConfig,
    #[serde(default)]
    pub starting_point: Option<String>,
    #[serde(default)]
    pub route_options: RouteOptions,
    #[serde(default)]
    pub geocode_mode: GeocodeMode,
}

pub type DynRouteOptimizer =
    RouteOptimizer<Box<dyn Geocoder>, Box<dyn RouteProvider>, TimeOfDayTraffic>;

impl OptimizerConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &'static str| var(name).ok_or(ConfigError::MissingVariable(name));
        let invalid = |variable: &'static str, value: &str| ConfigError::InvalidValue {
            variable,
            value: value.to_string(),
        };

        let timeout = match var("HOMECARE_HTTP_TIMEOUT_SECS") {
            Some(value) => Some(
                value
                    .parse::<u64>()
                    .map_err(|_| invalid("HOMECARE_HTTP_TIMEOUT_SECS", &value))?,
            ),
            None => None,
        };

        let geocoder = match var("HOMECARE_GEOCODER").as_deref().unwrap_or("opencage") {
            "opencage" => {
                let mut config = OpenCageConfig::new(required("OPENCAGE_API_KEY")?);
                if let Some(secs) = timeout {
                    config.timeout_secs = secs;
                }
                GeocoderConfig::OpenCage(config)
            }
            "nominatim" => {
                let mut config = NominatimConfig::default();
                if let Some(agent) = var("NOMINATIM_USER_AGENT") {
                    config.user_agent = agent;
                }
                if let Some(secs) = timeout {
                    config.timeout_secs = secs;
                }
                GeocoderConfig::Nominatim(config)
            }
            other => return Err(invalid("HOMECARE_GEOCODER", other)),
        };

        let router = match var("HOMECARE_ROUTER").as_deref().unwrap_or("openrouteservice") {
            "openrouteservice" => {
                let mut config = OpenRouteServiceConfig::new(required("OPENROUTESERVICE_API_KEY")?);
                if let Some(secs) = timeout {
                    config.timeout_secs = secs;
                }
                RouterConfig::OpenRouteService(config)
            }
            "mapbox" => {
                let mut config = MapboxConfig::new(required("MAPBOX_ACCESS_TOKEN")?);
                if let Some(secs) = timeout {
                    config.timeout_secs = secs;
                }
                RouterConfig::Mapbox(config)
            }
            "straight-line" => RouterConfig::StraightLine(HaversineRouter::default()),
            other => return Err(invalid("HOMECARE_ROUTER", other)),
        };

        let mode = match var("HOMECARE_ROUTE_MODE").as_deref() {
            None | Some("directions") => RouteMode::Directions,
            Some("matrix") => RouteMode::Matrix,
            Some(other) => return Err(invalid("HOMECARE_ROUTE_MODE", other)),
        };

        let geocode_mode = match var("HOMECARE_GEOCODE_MODE").as_deref() {
            None | Some("sequential") => GeocodeMode::Sequential,
            Some("concurrent") => GeocodeMode::Concurrent,
            Some(other) => return Err(invalid("HOMECARE_GEOCODE_MODE", other)),
        };

        Ok(Self {
            geocoder,
            router,
            starting_point: var("HOMECARE_STARTING_POINT"),
            route_options: RouteOptions {
                mode,
                ..RouteOptions::default()
            },
            geocode_mode,
        })
    }

    /// Builds the HTTP clients and an optimizer over them.
    pub fn build(self) -> Result<DynRouteOptimizer, ConfigError> {
        let mut optimizer = RouteOptimizer::new(
            self.geocoder.build()?,
            self.router.build()?,
            TimeOfDayTraffic,
        )
        .with_route_options(self.route_options)
        .with_geocode_mode(self.geocode_mode);

        if let Some(address) = self.starting_point {
            optimizer = optimizer.with_starting_point(address);
        }

        Ok(optimizer)
    }
}
