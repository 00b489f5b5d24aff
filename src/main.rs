mod adapters;
mod config;
mod core;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::core::samples::SampleKind;
use crate::core::{AnalysisError, Provider, SentimentAnalyzer};

#[derive(Parser)]
#[command(name = "sentiscope")]
#[command(about = "Product review sentiment analysis backed by hosted LLMs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Path to a YAML config file")]
    config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    output_format: OutputFormat,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Analyze the sentiment of a product review")]
    Analyze {
        #[arg(help = "Review text (reads --file, --sample or stdin if not provided)")]
        text: Option<String>,

        #[arg(long, conflicts_with_all = ["text", "sample"])]
        file: Option<PathBuf>,

        #[arg(long, conflicts_with = "text")]
        sample: Option<SampleKind>,

        #[arg(long, help = "Provider to use: openai or groq")]
        provider: Option<String>,

        #[arg(
            short,
            long,
            help = "Output file path (prints to stdout if not provided)"
        )]
        output: Option<PathBuf>,
    },
    #[command(about = "List providers and whether they are configured")]
    Providers,
    #[command(about = "Print the built-in sample reviews")]
    Samples,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::Config::load(cli.config.as_deref())?;
    config.apply_env();

    let analyzer = SentimentAnalyzer::new(&config.providers);

    let outcome = match cli.command {
        Commands::Analyze {
            text,
            file,
            sample,
            provider,
            output,
        } => {
            let source = ReviewSource::from_args(text, file, sample);
            analyze_command(&analyzer, &config, source, provider, output, cli.output_format).await
        }
        Commands::Providers => {
            providers_command(&analyzer, &config);
            Ok(())
        }
        Commands::Samples => {
            samples_command();
            Ok(())
        }
    };

    if let Err(err) = &outcome {
        if let Some(analysis_err) = err.downcast_ref::<AnalysisError>() {
            eprintln!("🚨 Analysis failed: {}", analysis_err);
            for hint in analysis_err.guidance() {
                eprintln!("  - {}", hint);
            }
            std::process::exit(1);
        }
    }

    outcome
}

enum ReviewSource {
    Inline(String),
    File(PathBuf),
    Sample(SampleKind),
    Stdin,
}

impl ReviewSource {
    fn from_args(text: Option<String>, file: Option<PathBuf>, sample: Option<SampleKind>) -> Self {
        if let Some(text) = text {
            ReviewSource::Inline(text)
        } else if let Some(path) = file {
            ReviewSource::File(path)
        } else if let Some(kind) = sample {
            ReviewSource::Sample(kind)
        } else {
            ReviewSource::Stdin
        }
    }

    async fn read(self) -> Result<String> {
        match self {
            ReviewSource::Inline(text) => Ok(text),
            ReviewSource::File(path) => tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read review from {}", path.display())),
            ReviewSource::Sample(kind) => Ok(kind.text().to_string()),
            ReviewSource::Stdin => {
                if std::io::stdin().is_terminal() {
                    // Nothing piped in: an empty review is rejected by the analyzer.
                    return Ok(String::new());
                }
                use std::io::Read;
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                Ok(buffer)
            }
        }
    }
}

async fn analyze_command(
    analyzer: &SentimentAnalyzer,
    config: &config::Config,
    source: ReviewSource,
    provider: Option<String>,
    output_path: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let available = analyzer.get_available_providers();
    if available.is_empty() {
        anyhow::bail!(
            "No provider is configured. Set {} or {} (a .env file works too), or add an api_key to .sentiscope.yml",
            Provider::OpenAI.api_key_env(),
            Provider::Groq.api_key_env()
        );
    }

    let provider_id = select_provider_id(provider, config.default_provider, &available);
    let review_text = source.read().await?;

    let result = analyzer.analyze_sentiment(&review_text, &provider_id).await?;
    info!(
        "Analysis complete: {} ({}/10)",
        result.overall_sentiment(),
        result.score()
    );

    // Parsing cannot fail here: analyze_sentiment already accepted the id.
    let provider: Provider = provider_id.parse()?;
    let output = match format {
        OutputFormat::Json => core::report::format_as_json(&result, provider)?,
        OutputFormat::Markdown => core::report::format_as_markdown(&result, provider),
        OutputFormat::Text => core::report::format_as_text(&result, provider),
    };

    if let Some(path) = output_path {
        tokio::fs::write(&path, output)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn select_provider_id(
    cli_provider: Option<String>,
    default_provider: Option<Provider>,
    available: &[Provider],
) -> String {
    cli_provider
        .or_else(|| default_provider.map(|p| p.id().to_string()))
        .or_else(|| available.first().map(|p| p.id().to_string()))
        .unwrap_or_else(|| Provider::OpenAI.id().to_string())
}

fn providers_command(analyzer: &SentimentAnalyzer, config: &config::Config) {
    let available = analyzer.get_available_providers();
    if available.is_empty() {
        println!("🚨 No provider configured. Set OPENAI_API_KEY or GROQ_API_KEY.");
    } else {
        let names: Vec<&str> = available.iter().map(|p| p.display_name()).collect();
        println!("✅ Available providers: {}", names.join(", "));
    }

    for provider in Provider::ALL {
        let status = if analyzer.is_available(provider) {
            "configured"
        } else {
            "not configured"
        };
        let model = analyzer
            .model_name(provider)
            .map(str::to_string)
            .unwrap_or_else(|| config.providers.model_for(provider));
        let marker = if config.default_provider == Some(provider) {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {:<8} {:<16} model: {}{}",
            provider.id(),
            status,
            model,
            marker
        );
    }
}

fn samples_command() {
    for kind in SampleKind::ALL {
        println!("## {}\n{}\n", kind.title(), kind.text());
    }
}
