use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Country lookup request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Country lookup returned status {0}")]
    Status(u16),
    #[error("Country lookup unavailable: {0}")]
    Unavailable(String),
}

/// Remote collection of candidate names.
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Fetches every candidate name, in the order the source returns them.
    async fn country_names(&self) -> Result<Vec<String>, LookupError>;
}

#[derive(Debug, Deserialize)]
struct CountryName {
    common: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountryRecord {
    name: Option<CountryName>,
}

/// `CountrySource` backed by the restcountries.com JSON API.
#[derive(Debug, Clone)]
pub struct RestCountriesSource {
    client: reqwest::Client,
    url: String,
}

impl RestCountriesSource {
    /// Builds a source whose requests give up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CountrySource for RestCountriesSource {
    async fn country_names(&self) -> Result<Vec<String>, LookupError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let records: Vec<CountryRecord> = response.json().await?;
        let total = records.len();
        let names: Vec<String> = records
            .into_iter()
            .filter_map(|record| record.name.and_then(|name| name.common))
            .collect();
        if names.len() < total {
            log::debug!("Skipped {} country records without a common name", total - names.len());
        }
        Ok(names)
    }
}

/// Fixed in-memory list, handy for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCountrySource {
    names: Vec<String>,
}

impl StaticCountrySource {
    pub fn new(names: Vec<impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl CountrySource for StaticCountrySource {
    async fn country_names(&self) -> Result<Vec<String>, LookupError> {
        Ok(self.names.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source() {
        let source = StaticCountrySource::new(vec!["Peru", "Chile"]);
        let names = tokio_test::block_on(source.country_names()).unwrap();
        assert_eq!(names, vec!["Peru", "Chile"]);
    }
}
