use std::collections::BTreeMap;

use tracing::{error, info};

use crate::adapters::llm::{create_adapter, LLMAdapter};
use crate::config::ProviderSettings;
use crate::core::error::AnalysisError;
use crate::core::interpreter::ResponseInterpreter;
use crate::core::prompt::{PromptConfig, SentimentPromptBuilder};
use crate::core::provider::Provider;
use crate::core::sentiment::SentimentResult;

// Adapters are built once in `new`; later credential changes are not picked up.
pub struct SentimentAnalyzer {
    adapters: BTreeMap<Provider, Box<dyn LLMAdapter>>,
    prompt_builder: SentimentPromptBuilder,
}

impl SentimentAnalyzer {
    pub fn new(settings: &ProviderSettings) -> Self {
        let mut analyzer = Self::empty(settings.prompt_config());

        for provider in Provider::ALL {
            let Some(model_config) = settings.model_config(provider) else {
                continue;
            };
            match create_adapter(provider, &model_config) {
                Ok(adapter) => {
                    info!("{} client initialized with model {}", provider, adapter.model_name());
                    analyzer.adapters.insert(provider, adapter);
                }
                Err(err) => error!("Error initializing {}: {:#}", provider, err),
            }
        }

        analyzer
    }

    pub fn empty(prompt_config: PromptConfig) -> Self {
        Self {
            adapters: BTreeMap::new(),
            prompt_builder: SentimentPromptBuilder::new(prompt_config),
        }
    }

    pub fn with_adapter(mut self, provider: Provider, adapter: Box<dyn LLMAdapter>) -> Self {
        self.adapters.insert(provider, adapter);
        self
    }

    pub fn get_available_providers(&self) -> Vec<Provider> {
        self.adapters.keys().copied().collect()
    }

    pub fn is_available(&self, provider: Provider) -> bool {
        self.adapters.contains_key(&provider)
    }

    pub fn model_name(&self, provider: Provider) -> Option<&str> {
        self.adapters.get(&provider).map(|adapter| adapter.model_name())
    }

    pub async fn analyze_sentiment(
        &self,
        review_text: &str,
        provider_id: &str,
    ) -> Result<SentimentResult, AnalysisError> {
        if review_text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let provider: Provider = provider_id.parse()?;
        self.analyze_with(review_text, provider).await
    }

    pub async fn analyze_with(
        &self,
        review_text: &str,
        provider: Provider,
    ) -> Result<SentimentResult, AnalysisError> {
        if review_text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let adapter = self
            .adapters
            .get(&provider)
            .ok_or(AnalysisError::ProviderUnconfigured(provider))?;

        info!(
            "Starting analysis with {} for text of {} characters",
            provider,
            review_text.chars().count()
        );

        let request = self.prompt_builder.build_request(review_text);
        let response = adapter.complete(request).await.map_err(|err| {
            error!("Error analyzing with {}: {:#}", provider, err);
            AnalysisError::ProviderCallFailed {
                provider,
                message: format!("{:#}", err),
            }
        })?;

        Ok(ResponseInterpreter::parse(&response.content))
    }
}
