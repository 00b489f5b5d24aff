use anyhow::Result;
use serde::Serialize;
use std::fmt;

use crate::core::provider::Provider;
use crate::core::sentiment::{ResultSource, Sentiment, SentimentResult};

// Bands: 1-2 and 8-10 High, 3-4 and 6-7 Medium, 5 Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: i64) -> Self {
        match score.clamp(1, 10) {
            1..=2 | 8..=10 => ConfidenceLevel::High,
            3..=4 | 6..=7 => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::Low,
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
        };
        f.write_str(label)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    provider: Provider,
    confidence: ConfidenceLevel,
    #[serde(flatten)]
    result: &'a SentimentResult,
}

pub fn format_as_json(result: &SentimentResult, provider: Provider) -> Result<String> {
    let report = JsonReport {
        provider,
        confidence: ConfidenceLevel::from_score(result.score()),
        result,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn format_as_markdown(result: &SentimentResult, provider: Provider) -> String {
    let mut output = String::new();

    output.push_str("# Sentiment Analysis Results\n\n");
    output.push_str(&format!(
        "{} **Overall Sentiment:** {}\n",
        sentiment_emoji(result.overall_sentiment()),
        result.overall_sentiment()
    ));
    output.push_str(&format!("⭐ **Score:** {}/10\n", result.display_score()));
    output.push_str(&format!(
        "🎯 **Confidence:** {}\n",
        ConfidenceLevel::from_score(result.score())
    ));
    output.push_str(&format!("🤖 **Provider:** {}\n\n", provider));

    if result.source() == ResultSource::Heuristic {
        output.push_str(
            "> ⚠️ The model response could not be decoded; this result comes from keyword analysis.\n\n",
        );
    }

    output.push_str("## Positive Aspects\n\n");
    push_bullets(&mut output, result.positive_aspects());

    output.push_str("## Negative Aspects\n\n");
    push_bullets(&mut output, result.negative_aspects());

    output.push_str("## Recommendations\n\n");
    if result.recommendations().is_empty() {
        output.push_str("_None_\n\n");
    } else {
        for (index, recommendation) in result.recommendations().iter().enumerate() {
            output.push_str(&format!("{}. {}\n", index + 1, recommendation));
        }
        output.push('\n');
    }

    output.push_str("## Summary\n\n");
    output.push_str(result.summary());
    output.push('\n');

    output
}

pub fn format_as_text(result: &SentimentResult, provider: Provider) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Sentiment:   {} {}\n",
        sentiment_emoji(result.overall_sentiment()),
        result.overall_sentiment()
    ));
    output.push_str(&format!("Score:       {}/10\n", result.display_score()));
    output.push_str(&format!(
        "Confidence:  {}\n",
        ConfidenceLevel::from_score(result.score())
    ));
    output.push_str(&format!("Provider:    {}\n", provider));
    if result.is_degraded() {
        output.push_str("Source:      keyword analysis (model response could not be decoded)\n");
    }

    push_text_section(&mut output, "Positive aspects", result.positive_aspects(), |_| "-".to_string());
    push_text_section(&mut output, "Negative aspects", result.negative_aspects(), |_| "-".to_string());
    push_text_section(&mut output, "Recommendations", result.recommendations(), |i| {
        format!("{}.", i + 1)
    });

    output.push_str("\nSummary:\n");
    output.push_str(&format!("  {}\n", result.summary()));

    output
}

fn push_bullets(output: &mut String, items: &[String]) {
    if items.is_empty() {
        output.push_str("_None_\n\n");
        return;
    }
    for item in items {
        output.push_str(&format!("- {}\n", item));
    }
    output.push('\n');
}

fn push_text_section<F>(output: &mut String, title: &str, items: &[String], marker: F)
where
    F: Fn(usize) -> String,
{
    output.push_str(&format!("\n{}:\n", title));
    if items.is_empty() {
        output.push_str("  (none)\n");
        return;
    }
    for (index, item) in items.iter().enumerate() {
        output.push_str(&format!("  {} {}\n", marker(index), item));
    }
}

fn sentiment_emoji(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "😊",
        Sentiment::Negative => "😞",
        Sentiment::Neutral => "😐",
    }
}
