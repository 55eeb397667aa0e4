use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::assets::{get_config_dir, get_default_config};

/// Breeds exercised when the config does not name any.
pub const DEFAULT_BREEDS: [&str; 4] = ["doberman", "bulldog", "collie", "greyhound"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Settings for waiting on asynchronous disk operations.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
    /// Zero disables polling entirely.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            max_attempts: 60,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DiskConfig {
    pub base_url: String,
    /// Literal token or `env:VARIABLE`.
    pub token: Option<String>,
    pub request_timeout_secs: u64,
    pub poll: PollConfig,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cloud-api.yandex.net/v1/disk/resources".to_string(),
            token: None,
            request_timeout_secs: 30,
            poll: PollConfig::default(),
        }
    }
}

impl DiskConfig {
    /// Endpoint for upload-by-url requests, always under the resources base.
    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DogApiConfig {
    pub base_url: String,
    pub images_per_source: u32,
    pub request_timeout_secs: u64,
}

impl Default for DogApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dog.ceo/api".to_string(),
            images_per_source: 1,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub folder_prefix: String,
    pub breeds: Vec<String>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            folder_prefix: default_folder_prefix(),
            breeds: DEFAULT_BREEDS.iter().map(|b| b.to_string()).collect(),
        }
    }
}

impl ScenarioConfig {
    /// Remote folder used for a breed, e.g. `test_folder_bulldog`.
    pub fn folder_name(&self, breed: &str) -> String {
        format!("{}{}", self.folder_prefix, breed)
    }
}

fn default_folder_prefix() -> String {
    "test_folder_".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    pub disk: DiskConfig,
    pub dog_api: DogApiConfig,
    pub scenario: ScenarioConfig,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum StringOrList {
    String(String),
    List(Vec<String>),
}

#[derive(Deserialize, Debug, Default)]
struct RawScenarioConfig {
    folder_prefix: Option<String>,
    breeds: Option<StringOrList>,
}

#[derive(Deserialize, Debug, Default)]
struct RawConfig {
    #[serde(default)]
    disk: DiskConfig,
    #[serde(default)]
    dog_api: DogApiConfig,
    #[serde(default)]
    scenario: RawScenarioConfig,
}

impl RawConfig {
    #[instrument]
    fn to_config(&self) -> Result<Config, ConfigError> {
        for (name, base_url) in [
            ("disk", &self.disk.base_url),
            ("dog_api", &self.dog_api.base_url),
        ] {
            Url::parse(base_url).map_err(|e| {
                ConfigError::Config(format!("Invalid {name}.base_url '{base_url}': {e}"))
            })?;
        }

        if self.dog_api.images_per_source == 0 {
            return Err(ConfigError::Config(
                "dog_api.images_per_source must be at least 1".to_string(),
            ));
        }

        let breeds = match &self.scenario.breeds {
            Some(StringOrList::String(s)) => vec![s.clone()],
            Some(StringOrList::List(l)) => l.clone(),
            None => ScenarioConfig::default().breeds,
        };
        if breeds.is_empty() {
            return Err(ConfigError::Config(
                "scenario.breeds must name at least one breed".to_string(),
            ));
        }
        for breed in &breeds {
            validate_breed(breed)?;
        }

        Ok(Config {
            disk: self.disk.clone(),
            dog_api: self.dog_api.clone(),
            scenario: ScenarioConfig {
                folder_prefix: self
                    .scenario
                    .folder_prefix
                    .clone()
                    .unwrap_or_else(default_folder_prefix),
                breeds,
            },
        })
    }
}

/// Rejects breed names that cannot map onto a dog API path and a folder of
/// their own: blank names and names containing `/`.
pub fn validate_breed(breed: &str) -> Result<(), ConfigError> {
    if breed.trim().is_empty() || breed.contains('/') {
        return Err(ConfigError::Config(format!("Invalid breed name '{breed}'")));
    }
    Ok(())
}

#[instrument(skip(config_path))]
pub fn create_or_get_config_file(
    config_path: Option<PathBuf>,
) -> Result<(bool, PathBuf), ConfigError> {
    let actual_path = config_path.unwrap_or_else(|| {
        let config_dir = get_config_dir();
        config_dir.join("dogdisk.yml")
    });

    let parent_dir = actual_path.parent().ok_or_else(|| {
        ConfigError::IO(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Config path has no parent directory",
        ))
    })?;

    if !parent_dir.exists() {
        fs::create_dir_all(parent_dir)?;
    }

    if actual_path.exists() {
        Ok((true, actual_path))
    } else {
        File::create(&actual_path)?.write_all(get_default_config().as_bytes())?;
        Ok((false, actual_path))
    }
}

#[instrument(skip(config_path))]
pub fn get_config(config_path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let (_, config_file) = create_or_get_config_file(config_path)?;
    let content = fs::read_to_string(&config_file)?;
    let raw: RawConfig = if content.trim().is_empty() {
        RawConfig::default()
    } else {
        serde_yaml::from_str(&content)?
    };
    raw.to_config()
}
