use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use dogdisk_core::config::DogApiConfig;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::{ImageSource, ImageUrl};

// Every dog.ceo payload wraps its data in `message`
#[derive(Deserialize, Debug)]
struct DogCeoResponse<T> {
    message: Option<T>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// An image source backed by the public dog.ceo API.
#[derive(Debug)]
pub struct DogCeoSource {
    base_url: Url,
    images_per_source: u32,
    client: Client,
}

impl DogCeoSource {
    pub fn from_config(config: &DogApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base_url for dog.ceo: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("dog.ceo base_url cannot be a base: {}", base_url));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build dog.ceo http client")?;

        Ok(Self {
            base_url,
            images_per_source: config.images_per_source.max(1),
            client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base is rejected in from_config
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_message<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        debug!(%url, "Requesting dog.ceo");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send request to dog.ceo: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!(
                "dog.ceo request {} failed with status {}: {}",
                url,
                status,
                text
            ));
        }

        let body: DogCeoResponse<T> = response
            .json()
            .await
            .context("Failed to parse JSON response from dog.ceo")?;
        Ok(body.message)
    }

    async fn random_images(&self, path: &[&str]) -> Result<Vec<ImageUrl>> {
        let count = self.images_per_source.to_string();
        let mut segments = path.to_vec();
        segments.extend(["images", "random"]);
        if self.images_per_source > 1 {
            segments.push(&count);
        }

        let urls = self
            .get_message::<OneOrMany>(self.endpoint(&segments))
            .await?
            .map(OneOrMany::into_vec)
            .unwrap_or_default();
        if urls.is_empty() {
            return Err(anyhow!("dog.ceo returned no images for {}", path.join("/")));
        }

        urls.iter()
            .map(|u| ImageUrl::parse(u).map_err(anyhow::Error::from))
            .collect()
    }
}

#[async_trait]
impl ImageSource for DogCeoSource {
    #[instrument(skip(self))]
    async fn get_sub_breeds(&self, breed: &str) -> Result<Vec<String>> {
        let sub_breeds = self
            .get_message::<Vec<String>>(self.endpoint(&["breed", breed, "list"]))
            .await
            .with_context(|| format!("Failed to list sub-breeds of {breed}"))?
            .unwrap_or_default();
        debug!(?sub_breeds, "Resolved sub-breeds");
        Ok(sub_breeds)
    }

    #[instrument(skip(self))]
    async fn get_urls(&self, breed: &str, sub_breeds: &[String]) -> Result<Vec<Vec<ImageUrl>>> {
        if sub_breeds.is_empty() {
            let urls = self
                .random_images(&["breed", breed])
                .await
                .with_context(|| format!("Failed to fetch images of {breed}"))?;
            return Ok(vec![urls]);
        }

        let mut groups = Vec::with_capacity(sub_breeds.len());
        for sub_breed in sub_breeds {
            let urls = self
                .random_images(&["breed", breed, sub_breed])
                .await
                .with_context(|| format!("Failed to fetch images of {breed}/{sub_breed}"))?;
            groups.push(urls);
        }
        Ok(groups)
    }
}
