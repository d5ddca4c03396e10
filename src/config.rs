// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    pub dataset: String,
    pub config_name: String,
    pub split: String,
    pub rows_endpoint: String,
    pub page_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    pub dataset: String,
    pub hub_endpoint: String,
    pub token_env: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub chunk_size: usize,
    pub source_label: String,
    pub work_dir: Option<PathBuf>,
    pub keep_local: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub skip_suffixes: Vec<String>,
    pub allowed_types: Vec<String>,
    pub drop_empty: bool,
    pub require_xml: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dataset: "vGassen/Dutch-Basisbestandwetten-Legislation-Laws".to_string(),
            config_name: "default".to_string(),
            split: "train".to_string(),
            rows_endpoint: "https://datasets-server.huggingface.co".to_string(),
            page_size: 100,
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            dataset: "vGassen/Dutch-Basisbestandwetten-Legislation-Laws-XML-Clean".to_string(),
            hub_endpoint: "https://huggingface.co".to_string(),
            token_env: "HF_TOKEN".to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            source_label: "Basiswettenbestand".to_string(),
            work_dir: None,
            keep_local: false,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            skip_suffixes: vec!["manifest.xml".to_string()],
            allowed_types: vec![],
            drop_empty: true,
            require_xml: true,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("BWB_CLEAN")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            source: SourceConfig::default(),
            target: TargetConfig::default(),
            pipeline: PipelineConfig::default(),
            filter: FilterConfig::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        Validator::validate_dataset_name(&self.source.dataset)?;
        Validator::validate_dataset_name(&self.target.dataset)?;
        Validator::validate_url(&self.source.rows_endpoint)?;
        Validator::validate_url(&self.target.hub_endpoint)?;
        Validator::validate_chunk_size(self.pipeline.chunk_size)?;

        if self.source.page_size == 0 {
            return Err(PipelineError::Config(
                "page_size must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.source_label.trim().is_empty() {
            return Err(PipelineError::Config(
                "source_label must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
