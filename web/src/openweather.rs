//! Current-conditions lookup against an OpenWeatherMap-compatible API.
//! One outbound call per request; no retries, no caching, transport
//! defaults for timeouts.

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather lookups are not configured (missing api key)")]
    NotConfigured,

    #[error("no weather data for the requested location")]
    NotFound,

    #[error("weather api request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The subset of the current-weather payload the page renders.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherReading {
    pub name: String,
    pub main: Conditions,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub wind: Wind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Conditions {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

impl WeatherReading {
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or("unknown conditions")
    }
}

#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl WeatherClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>, base_url: String) -> Self {
        Self {
            http,
            api_key,
            base_url,
        }
    }

    pub async fn lookup(&self, location: &str) -> Result<WeatherReading, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::NotConfigured)?;

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("q", location), ("appid", api_key), ("units", "metric")])
            .send()
            .await?;

        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(WeatherError::NotFound);
        }
        let res = res.error_for_status()?;

        Ok(res.json().await?)
    }
}
