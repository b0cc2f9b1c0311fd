//! `DirectionsProvider` backed by the ORS directions API.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use log::debug;
use reqwest::Client;
use smartpoi_core::{Directions, DirectionsError, DirectionsProvider, TravelProfile};
use thiserror::Error;
use url::Url;

use super::ors::DirectionsResponse;

/// Public ORS directions endpoint; the profile is appended as a path segment.
pub const DEFAULT_ORS_BASE_URL: &str = "https://api.openrouteservice.org/v2/directions";

/// Default user agent for directions requests.
pub const DEFAULT_USER_AGENT: &str = "smartpoi-routing/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Error type for [`HttpDirectionsProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The base URL does not parse or cannot carry path segments.
    #[error("invalid directions base URL {url:?}: {message}")]
    InvalidBaseUrl {
        /// Rejected URL.
        url: String,
        /// Parser detail.
        message: String,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Configuration for [`HttpDirectionsProvider`].
#[derive(Clone)]
pub struct HttpDirectionsProviderConfig {
    /// Base URL; requests go to `{base_url}/{profile}`.
    pub base_url: String,
    /// Credential sent as the `api_key` query parameter.
    pub api_key: Option<String>,
    /// Whole-request timeout, including connection setup.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for HttpDirectionsProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDirectionsProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for HttpDirectionsProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ORS_BASE_URL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpDirectionsProviderConfig {
    /// Create a configuration for a non-default endpoint.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Directions provider speaking the ORS v2 `GET` directions API.
///
/// The provider is stateless between calls apart from the pooled HTTP
/// client, so a single instance can serve every profile concurrently.
/// URLs quoted in errors and logs never include the API key.
#[derive(Debug)]
pub struct HttpDirectionsProvider {
    client: Client,
    base_url: Url,
    config: HttpDirectionsProviderConfig,
}

impl HttpDirectionsProvider {
    /// Create a provider for the public endpoint with the given key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpDirectionsProviderConfig::default().with_api_key(api_key))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is unusable or the HTTP client fails
    /// to build.
    pub fn with_config(config: HttpDirectionsProviderConfig) -> Result<Self, ProviderBuildError> {
        let invalid = |message: String| ProviderBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            message,
        };
        let base_url = Url::parse(&config.base_url).map_err(|err| invalid(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_owned()));
        }
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Endpoint for one profile: the base URL with the profile appended.
    fn profile_url(&self, profile: TravelProfile) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(profile.provider_id());
        }
        url
    }

    async fn fetch(
        &self,
        profile: TravelProfile,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<DirectionsResponse, DirectionsError> {
        let url = self.profile_url(profile);
        let shown = url.as_str().to_owned();

        let mut query = vec![
            ("start", format!("{},{}", origin.x, origin.y)),
            ("end", format!("{},{}", destination.x, destination.y)),
        ];
        if let Some(key) = &self.config.api_key {
            query.push(("api_key", key.clone()));
        }

        debug!("requesting {profile} directions from {shown}");
        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &shown))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectionsError::HttpError {
                url: shown,
                status: status.as_u16(),
                message: body.trim().to_owned(),
            });
        }

        response.json().await.map_err(|err| {
            if err.is_timeout() {
                self.timeout_error(&shown)
            } else {
                DirectionsError::ParseError {
                    message: err.without_url().to_string(),
                }
            }
        })
    }

    fn timeout_error(&self, url: &str) -> DirectionsError {
        DirectionsError::Timeout {
            url: url.to_owned(),
            timeout_secs: self.config.timeout.as_secs(),
        }
    }

    /// Convert a reqwest error to a `DirectionsError`.
    ///
    /// The request URL is stripped from the message because reqwest records
    /// it with the query string, API key included.
    fn convert_reqwest_error(&self, error: reqwest::Error, url: &str) -> DirectionsError {
        if error.is_timeout() {
            return self.timeout_error(url);
        }

        if let Some(status) = error.status() {
            return DirectionsError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.without_url().to_string(),
            };
        }

        DirectionsError::NetworkError {
            url: url.to_owned(),
            message: error.without_url().to_string(),
        }
    }
}

/// Turn a decoded response into [`Directions`] for `profile`.
fn convert_response(
    profile: TravelProfile,
    response: DirectionsResponse,
) -> Result<Directions, DirectionsError> {
    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or(DirectionsError::MissingRoute { profile })?;
    let geometry =
        feature
            .geometry
            .to_coords()
            .map_err(|index| DirectionsError::ParseError {
                message: format!("position {index} has fewer than two ordinates"),
            })?;
    let summary = feature.properties.summary;
    Ok(Directions {
        geometry,
        distance_m: summary.distance,
        duration_s: summary.duration,
    })
}

#[async_trait]
impl DirectionsProvider for HttpDirectionsProvider {
    async fn directions(
        &self,
        profile: TravelProfile,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Directions, DirectionsError> {
        let response = self.fetch(profile, origin, destination).await?;
        convert_response(profile, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::ors::{Feature, LineString, Properties, Summary};
    use rstest::rstest;

    fn feature(coordinates: Vec<Vec<f64>>, distance: f64, duration: f64) -> Feature {
        Feature {
            geometry: LineString { coordinates },
            properties: Properties {
                summary: Summary { distance, duration },
            },
        }
    }

    #[rstest]
    #[case("https://api.openrouteservice.org/v2/directions")]
    #[case("https://api.openrouteservice.org/v2/directions/")]
    fn profile_url_appends_profile(#[case] base: &str) {
        let provider = HttpDirectionsProvider::with_config(HttpDirectionsProviderConfig::new(base))
            .expect("provider should build");

        let url = provider.profile_url(TravelProfile::Driving);

        assert_eq!(
            url.as_str(),
            "https://api.openrouteservice.org/v2/directions/driving-car"
        );
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:routes@example.com")]
    fn rejects_unusable_base_urls(#[case] base: &str) {
        let err = HttpDirectionsProvider::with_config(HttpDirectionsProviderConfig::new(base))
            .expect_err("should fail");
        assert!(matches!(err, ProviderBuildError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    fn convert_response_uses_first_feature() {
        let response = DirectionsResponse {
            features: vec![
                feature(vec![vec![77.5, 12.9], vec![77.6, 13.0]], 15_000.0, 900.0),
                feature(vec![vec![0.0, 0.0]], 1.0, 1.0),
            ],
        };

        let directions =
            convert_response(TravelProfile::Cycling, response).expect("should convert");

        assert_eq!(directions.distance_km(), 15.0);
        assert_eq!(directions.duration_min(), 15.0);
        assert_eq!(
            directions.geometry,
            vec![Coord { x: 77.5, y: 12.9 }, Coord { x: 77.6, y: 13.0 }]
        );
    }

    #[rstest]
    fn convert_response_without_features_is_missing_route() {
        let response = DirectionsResponse {
            features: Vec::new(),
        };

        let err = convert_response(TravelProfile::Walking, response).expect_err("should fail");

        assert_eq!(
            err,
            DirectionsError::MissingRoute {
                profile: TravelProfile::Walking
            }
        );
    }

    #[rstest]
    fn convert_response_rejects_short_positions() {
        let response = DirectionsResponse {
            features: vec![feature(vec![vec![77.5]], 10.0, 10.0)],
        };

        let err = convert_response(TravelProfile::Driving, response).expect_err("should fail");

        assert!(matches!(err, DirectionsError::ParseError { .. }));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpDirectionsProviderConfig::default()
            .with_api_key("secret")
            .with_timeout(Duration::from_secs(3))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, DEFAULT_ORS_BASE_URL);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[rstest]
    fn debug_output_redacts_api_key() {
        let config = HttpDirectionsProviderConfig::default().with_api_key("secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[rstest]
    fn default_timeout_is_ten_seconds() {
        assert_eq!(
            HttpDirectionsProviderConfig::default().timeout,
            Duration::from_secs(10)
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        // Port 9 on loopback is the discard service and is closed in practice.
        let config = HttpDirectionsProviderConfig::new("http://127.0.0.1:9/v2/directions")
            .with_api_key("secret")
            .with_timeout(Duration::from_secs(2));
        let provider = HttpDirectionsProvider::with_config(config).expect("provider should build");

        let err = provider
            .directions(
                TravelProfile::Walking,
                Coord { x: 77.5, y: 12.9 },
                Coord { x: 77.6, y: 13.0 },
            )
            .await
            .expect_err("should fail");

        match err {
            DirectionsError::NetworkError { url, message } => {
                assert_eq!(url, "http://127.0.0.1:9/v2/directions/foot-walking");
                assert!(!message.contains("secret"));
            }
            DirectionsError::Timeout { .. } => {}
            other => panic!("expected a network error, got {other:?}"),
        }
    }
}
