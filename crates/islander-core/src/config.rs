use std::env;
use std::time::Duration;

/// Addresses and policy for the two external services.
///
/// Reads `ISLANDER_PLANNER_URL` and `ISLANDER_GEOCODER_URL`, falling back
/// to the defaults below when unset.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the planner backend; `/api/plan` is appended.
    pub planner_url: String,
    /// Full URL of the geocoding search endpoint.
    pub geocoder_url: String,
    /// Appended to every search query to scope results to the region.
    pub region_hint: String,
    /// Per-request timeout for both services.
    pub timeout: Duration,
}

impl ClientConfig {
    pub const DEFAULT_PLANNER_URL: &str = "http://localhost:8000";
    pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
    pub const DEFAULT_REGION_HINT: &str = "Andaman";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Build a config from the environment.
    pub fn from_env() -> Self {
        let planner_url = env::var("ISLANDER_PLANNER_URL")
            .unwrap_or_else(|_| Self::DEFAULT_PLANNER_URL.to_owned());
        let geocoder_url = env::var("ISLANDER_GEOCODER_URL")
            .unwrap_or_else(|_| Self::DEFAULT_GEOCODER_URL.to_owned());
        Self::new(planner_url, geocoder_url)
    }

    /// Build a config from explicit URLs (tests and CLI flags).
    pub fn new(planner_url: impl Into<String>, geocoder_url: impl Into<String>) -> Self {
        Self {
            planner_url: planner_url.into(),
            geocoder_url: geocoder_url.into(),
            region_hint: Self::DEFAULT_REGION_HINT.to_owned(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// The planner endpoint, tolerant of a trailing slash on the base URL.
    pub fn plan_endpoint(&self) -> String {
        format!("{}/api/plan", self.planner_url.trim_end_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
