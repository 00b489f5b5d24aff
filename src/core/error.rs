use thiserror::Error;

use crate::core::provider::Provider;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Review text cannot be empty")]
    EmptyInput,

    #[error("Provider '{0}' is not supported. Use 'openai' or 'groq'")]
    UnknownProvider(String),

    #[error("{0} is not configured: set {env} or add an api_key to the config file", env = .0.api_key_env())]
    ProviderUnconfigured(Provider),

    #[error("Error processing with {provider}: {message}")]
    ProviderCallFailed { provider: Provider, message: String },
}

impl AnalysisError {
    pub fn guidance(&self) -> &'static [&'static str] {
        match self {
            AnalysisError::EmptyInput => &["Provide the review as an argument, with --file, --sample, or on stdin"],
            AnalysisError::UnknownProvider(_) => &["Run `sentiscope providers` to list the supported providers"],
            AnalysisError::ProviderUnconfigured(_) => &[
                "Check that your API keys are configured",
                "Try the other provider",
            ],
            AnalysisError::ProviderCallFailed { .. } => &[
                "Check that your API keys are configured correctly",
                "Try the other provider",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_message_names_the_env_var() {
        let err = AnalysisError::ProviderUnconfigured(Provider::Groq);
        assert_eq!(
            err.to_string(),
            "Groq is not configured: set GROQ_API_KEY or add an api_key to the config file"
        );
    }

    #[test]
    fn call_failure_keeps_underlying_message() {
        let err = AnalysisError::ProviderCallFailed {
            provider: Provider::OpenAI,
            message: "OpenAI API error (429 Too Many Requests): quota".to_string(),
        };
        assert!(err.to_string().starts_with("Error processing with OpenAI:"));
        assert!(err.to_string().contains("quota"));
        assert_eq!(err.guidance().len(), 2);
    }
}
