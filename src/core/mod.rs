pub mod analyzer;
pub mod error;
pub mod interpreter;
pub mod prompt;
pub mod provider;
pub mod report;
pub mod samples;
pub mod sentiment;

pub use analyzer::SentimentAnalyzer;
pub use error::AnalysisError;
pub use provider::Provider;
