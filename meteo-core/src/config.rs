use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Placeholder replaced by the dataset identifier in the station URL template.
pub const STATION_ID_PLACEHOLDER: &str = "{station_id}";

/// Remote endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub catalog_url: String,

    /// Example:
    /// `https://.../datasets/{station_id}/records?order_by=-heure_de_paris`
    pub station_url_template: String,

    #[serde(default = "default_delimiter")]
    pub catalog_delimiter: char,
}

/// Column names in the catalog and in station payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnsConfig {
    pub city: String,
    pub station_id: String,
    pub timestamp: String,
    /// Station data columns shown to the user, in display order.
    pub station_data: Vec<String>,
}

/// Keywords applied to the station-id column of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiltersConfig {
    pub include_keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_keyword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub max_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { max_rows: 10 }
    }
}

/// Top-level configuration stored on disk.
///
/// Loaded once at startup and handed to the components that need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub columns: ColumnsConfig,
    pub filters: FiltersConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_delimiter() -> char {
    ';'
}

impl Default for Config {
    /// Toulouse Métropole open data portal.
    fn default() -> Self {
        Self {
            api: ApiConfig {
                catalog_url: "https://data.toulouse-metropole.fr/api/explore/v2.1/catalog/exports/csv?delimiter=%3B&list_separator=%2C&quote_all=false&with_bom=true".to_string(),
                station_url_template: "https://data.toulouse-metropole.fr/api/explore/v2.1/catalog/datasets/{station_id}/records?order_by=-heure_de_paris".to_string(),
                catalog_delimiter: default_delimiter(),
            },
            columns: ColumnsConfig {
                city: "publisher".to_string(),
                station_id: "datasetid".to_string(),
                timestamp: "heure_de_paris".to_string(),
                station_data: vec![
                    "heure_de_paris".to_string(),
                    "temperature_en_degre_c".to_string(),
                    "humidite".to_string(),
                    "pression".to_string(),
                ],
            },
            filters: FiltersConfig {
                include_keyword: "meteo".to_string(),
                exclude_keyword: Some("archive".to_string()),
            },
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Load and validate the config at `path`, or at the platform default.
    ///
    /// Unlike a first-run preference file, a missing config is an error:
    /// the column names and endpoints cannot be guessed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        if !path.exists() {
            bail!(
                "Config file not found: {}\n\
                 Hint: run `meteo init` to write the default configuration.",
                path.display()
            );
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to `path` (or the platform default), creating parent directories.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.api.station_url_template.contains(STATION_ID_PLACEHOLDER) {
            bail!(
                "api.station_url_template must contain the {STATION_ID_PLACEHOLDER} placeholder"
            );
        }

        let columns = [
            ("columns.city", &self.columns.city),
            ("columns.station_id", &self.columns.station_id),
            ("columns.timestamp", &self.columns.timestamp),
            ("filters.include_keyword", &self.filters.include_keyword),
        ];
        for (key, value) in columns {
            if value.trim().is_empty() {
                bail!("{key} must not be empty");
            }
        }

        if self.display.max_rows == 0 {
            bail!("display.max_rows must be greater than zero");
        }

        if !self.api.catalog_delimiter.is_ascii() {
            bail!("api.catalog_delimiter must be a single ASCII character");
        }

        Ok(())
    }
}
