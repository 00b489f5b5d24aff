use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::adapters::groq::DEFAULT_GROQ_MODEL;
use crate::adapters::llm::ModelConfig;
use crate::adapters::openai::DEFAULT_OPENAI_MODEL;
use crate::core::prompt::PromptConfig;
use crate::core::Provider;

const CONFIG_FILE_NAMES: [&str; 2] = [".sentiscope.yml", ".sentiscope.yaml"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub default_provider: Option<Provider>,

    #[serde(flatten)]
    pub providers: ProviderSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub openai: ProviderConfig,

    #[serde(default)]
    pub groq: ProviderConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: None,
            openai: ProviderConfig::default(),
            groq: ProviderConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        for name in CONFIG_FILE_NAMES {
            let candidate = PathBuf::from(name);
            if candidate.exists() {
                return Self::load_from_path(&candidate);
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(CONFIG_FILE_NAMES[0]);
            if home_config.exists() {
                return Self::load_from_path(&home_config);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        dotenv::dotenv().ok();
        self.apply_credentials_from(|name| std::env::var(name).ok());
    }

    // Keys already present in the config file win over `lookup`.
    pub fn apply_credentials_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for provider in Provider::ALL {
            let section = self.providers.section_mut(provider);
            let has_key = section
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty());
            if !has_key {
                section.api_key = lookup(provider.api_key_env()).filter(|key| !key.trim().is_empty());
            }
        }
    }
}

impl ProviderSettings {
    pub fn section(&self, provider: Provider) -> &ProviderConfig {
        match provider {
            Provider::OpenAI => &self.openai,
            Provider::Groq => &self.groq,
        }
    }

    fn section_mut(&mut self, provider: Provider) -> &mut ProviderConfig {
        match provider {
            Provider::OpenAI => &mut self.openai,
            Provider::Groq => &mut self.groq,
        }
    }

    pub fn model_for(&self, provider: Provider) -> String {
        self.section(provider).model.clone().unwrap_or_else(|| {
            match provider {
                Provider::OpenAI => DEFAULT_OPENAI_MODEL,
                Provider::Groq => DEFAULT_GROQ_MODEL,
            }
            .to_string()
        })
    }

    pub fn model_config(&self, provider: Provider) -> Option<ModelConfig> {
        let section = self.section(provider);
        let api_key = section.api_key.clone().filter(|key| !key.trim().is_empty())?;
        Some(ModelConfig {
            model_name: self.model_for(provider),
            api_key: Some(api_key),
            base_url: section.base_url.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout_secs: self.timeout_secs,
        })
    }

    pub fn prompt_config(&self) -> PromptConfig {
        PromptConfig {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            ..PromptConfig::default()
        }
    }
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> usize {
    1000
}
