use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" | "positivo" | "positiva" => Some(Sentiment::Positive),
            "negative" | "negativo" | "negativa" => Some(Sentiment::Negative),
            "neutral" | "neutro" | "neutra" => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    /// Never fails: decorated labels ("Muy positivo", "Positivo.") match on
    /// their stem, anything else is Neutral.
    pub fn from_label_lenient(label: &str) -> Self {
        if let Some(sentiment) = Self::from_label(label) {
            return sentiment;
        }
        let lower = label.to_lowercase();
        if lower.contains("posit") {
            Sentiment::Positive
        } else if lower.contains("negat") {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Model,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    #[serde(rename = "sentimiento_general")]
    overall_sentiment: Sentiment,
    #[serde(rename = "puntuacion")]
    score: i64,
    #[serde(rename = "aspectos_positivos")]
    positive_aspects: Vec<String>,
    #[serde(rename = "aspectos_negativos")]
    negative_aspects: Vec<String>,
    #[serde(rename = "recomendaciones")]
    recommendations: Vec<String>,
    #[serde(rename = "resumen")]
    summary: String,
    source: ResultSource,
}

impl SentimentResult {
    pub fn new(
        overall_sentiment: Sentiment,
        score: i64,
        positive_aspects: Vec<String>,
        negative_aspects: Vec<String>,
        recommendations: Vec<String>,
        summary: String,
        source: ResultSource,
    ) -> Self {
        Self {
            overall_sentiment,
            score,
            positive_aspects,
            negative_aspects,
            recommendations,
            summary,
            source,
        }
    }

    pub fn overall_sentiment(&self) -> Sentiment {
        self.overall_sentiment
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Score clamped into 1..=10 for display.
    pub fn display_score(&self) -> u8 {
        self.score.clamp(1, 10) as u8
    }

    pub fn positive_aspects(&self) -> &[String] {
        &self.positive_aspects
    }

    pub fn negative_aspects(&self) -> &[String] {
        &self.negative_aspects
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn source(&self) -> ResultSource {
        self.source
    }

    pub fn is_degraded(&self) -> bool {
        self.source == ResultSource::Heuristic
    }
}
