//! Forward geocoding against a Nominatim-compatible service.

use crate::config::Config;
use crate::profile::draft::Location;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Candidates shown under the address field
pub const MAX_SUGGESTIONS: usize = 5;

/// One address candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressSuggestion {
    pub place_id: u64,
    pub display_name: String,
    pub location: Location,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde(default)]
    place_id: u64,
    display_name: String,
    lat: String,
    lon: String,
}

/// Free-text query scoped to the selected commune.
pub fn build_query(text: &str, commune: &str) -> String {
    format!("{}, {}, Chile", text.trim(), commune)
}

#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http_client: Client,
    base_url: String,
    user_agent: String,
}

impl GeocodingClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http_client,
            base_url: config.geocoding_url.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Up to [`MAX_SUGGESTIONS`] candidates. Entries with unparsable coordinates are skipped.
    pub async fn search(&self, text: &str, commune: &str) -> Result<Vec<AddressSuggestion>> {
        let query = build_query(text, commune);
        debug!("Geocoding query: {}", query);

        let response = self
            .http_client
            .get(format!("{}/search", self.base_url))
            .header("User-Agent", &self.user_agent)
            .query(&[
                ("format", "json"),
                ("addressdetails", "1"),
                ("countrycodes", "cl"),
                ("accept-language", "es"),
                ("limit", "5"),
                ("q", query.as_str()),
            ])
            .send()
            .await
            .context("Failed to reach geocoding service")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Geocoding service error ({})", status);
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .context("Failed to parse geocoding response")?;

        Ok(places
            .into_iter()
            .filter_map(|place| {
                let latitude = place.lat.trim().parse().ok()?;
                let longitude = place.lon.trim().parse().ok()?;
                Some(AddressSuggestion {
                    place_id: place.place_id,
                    display_name: place.display_name,
                    location: Location {
                        latitude,
                        longitude,
                    },
                })
            })
            .take(MAX_SUGGESTIONS)
            .collect())
    }
}
