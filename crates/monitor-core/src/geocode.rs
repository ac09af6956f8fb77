//! Reverse geocoding of child locations.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{MonitorError, Result};

/// Label used when an address cannot be resolved.
pub const ADDRESS_NOT_FOUND: &str = "Address not found";

/// Default public geocoding service.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

const USER_AGENT: &str = concat!("parent-dashboard/", env!("CARGO_PKG_VERSION"));

/// Turns coordinates into a human-readable address.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

/// Geocoder speaking the Nominatim `/reverse` API.
pub struct ReverseGeocoder {
    client: Client,
    base_url: String,
}

impl ReverseGeocoder {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for ReverseGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<String> {
        let url = format!("{}/reverse", self.base_url);
        debug!(latitude, longitude, "Reverse geocoding");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::Upstream {
                service: "geocoder",
                status: status.as_u16(),
            });
        }

        let body: ReverseResponse = response.json().await?;
        body.display_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(MonitorError::EmptyResponse("geocoder"))
    }
}

/// Resolve an address, falling back to [`ADDRESS_NOT_FOUND`] on any failure.
pub async fn address_or_fallback(geocoder: &dyn Geocoder, latitude: f64, longitude: f64) -> String {
    match geocoder.reverse(latitude, longitude).await {
        Ok(address) => address,
        Err(err) => {
            warn!(latitude, longitude, error = %err, "Reverse geocoding failed");
            ADDRESS_NOT_FOUND.to_string()
        }
    }
}
