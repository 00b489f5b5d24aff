use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::sentiment::{ResultSource, Sentiment, SentimentResult};

const POSITIVE_WORDS: [&str; 5] = ["positivo", "bueno", "excelente", "recomendado", "satisfecho"];
const NEGATIVE_WORDS: [&str; 5] = ["negativo", "malo", "terrible", "decepcionado", "insatisfecho"];

const POSITIVE_SCORE: i64 = 7;
const NEGATIVE_SCORE: i64 = 3;
const NEUTRAL_SCORE: i64 = 5;

const SUMMARY_MAX_CHARS: usize = 200;
const TRUNCATION_MARKER: &str = "...";

const MANUAL_REVIEW_ASPECT: &str = "Análisis automático - revisar manualmente";
const MANUAL_REVIEW_RECOMMENDATION: &str = "Revisar análisis manual por error en procesamiento";

#[derive(Error, Debug)]
enum ExtractionError {
    #[error("no JSON object found in response")]
    NoObject,

    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("missing mandatory field '{0}'")]
    MissingField(&'static str),
}

pub struct ResponseInterpreter;

impl ResponseInterpreter {
    /// Never fails: anything that cannot be decoded degrades to the keyword
    /// heuristic.
    pub fn parse(raw: &str) -> SentimentResult {
        match Self::extract_structured(raw) {
            Ok(result) => {
                debug!("Decoded structured model response");
                result
            }
            Err(err) => {
                warn!("Falling back to keyword analysis: {}", err);
                Self::heuristic(raw)
            }
        }
    }

    fn extract_structured(raw: &str) -> Result<SentimentResult, ExtractionError> {
        let json_str = Self::object_span(raw).ok_or(ExtractionError::NoObject)?;
        let record: Map<String, Value> = serde_json::from_str(json_str)?;

        // Only the presence of the mandatory keys is checked; their values
        // are coerced below.
        let sentiment_value = Self::field(&record, "sentimiento_general", "overall_sentiment")
            .ok_or(ExtractionError::MissingField("sentimiento_general"))?;
        let score_value = Self::field(&record, "puntuacion", "score")
            .ok_or(ExtractionError::MissingField("puntuacion"))?;
        let summary_value = Self::field(&record, "resumen", "summary")
            .ok_or(ExtractionError::MissingField("resumen"))?;

        let overall_sentiment = match sentiment_value {
            Value::String(label) => Sentiment::from_label_lenient(label),
            Value::Null => Sentiment::Neutral,
            other => Sentiment::from_label_lenient(&other.to_string()),
        };
        let score = Self::coerce_score(score_value).unwrap_or_else(|| {
            debug!("Unusable score {}, using {}", score_value, NEUTRAL_SCORE);
            NEUTRAL_SCORE
        });
        let summary = match summary_value {
            Value::String(summary) => summary.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };

        Ok(SentimentResult::new(
            overall_sentiment,
            score,
            Self::coerce_list(Self::field(&record, "aspectos_positivos", "positive_aspects")),
            Self::coerce_list(Self::field(&record, "aspectos_negativos", "negative_aspects")),
            Self::coerce_list(Self::field(&record, "recomendaciones", "recommendations")),
            summary,
            ResultSource::Model,
        ))
    }

    fn field<'a>(record: &'a Map<String, Value>, key: &str, alias: &str) -> Option<&'a Value> {
        record.get(key).or_else(|| record.get(alias))
    }

    // First `{` to last `}`; braces inside string values are not accounted for.
    fn object_span(raw: &str) -> Option<&str> {
        let start = raw.find('{')?;
        let end = raw.rfind('}')?;
        if end < start {
            return None;
        }
        Some(&raw[start..=end])
    }

    fn coerce_score(value: &Value) -> Option<i64> {
        match value {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|f| f.round() as i64)),
            Value::String(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i64))
            }
            _ => None,
        }
    }

    fn coerce_list(value: Option<&Value>) -> Vec<String> {
        match value {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
            Some(Value::String(text)) => vec![text.clone()],
            Some(other) => vec![other.to_string()],
        }
    }

    fn heuristic(raw: &str) -> SentimentResult {
        let (sentiment, score) = Self::classify_keywords(raw);

        SentimentResult::new(
            sentiment,
            score,
            vec![MANUAL_REVIEW_ASPECT.to_string()],
            vec![MANUAL_REVIEW_ASPECT.to_string()],
            vec![MANUAL_REVIEW_RECOMMENDATION.to_string()],
            Self::truncate_summary(raw),
            ResultSource::Heuristic,
        )
    }

    // Each indicator word counts once, however often it appears.
    fn classify_keywords(raw: &str) -> (Sentiment, i64) {
        let lower = raw.to_lowercase();
        let positive = POSITIVE_WORDS.iter().filter(|word| lower.contains(*word)).count();
        let negative = NEGATIVE_WORDS.iter().filter(|word| lower.contains(*word)).count();

        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => (Sentiment::Positive, POSITIVE_SCORE),
            std::cmp::Ordering::Less => (Sentiment::Negative, NEGATIVE_SCORE),
            std::cmp::Ordering::Equal => (Sentiment::Neutral, NEUTRAL_SCORE),
        }
    }

    fn truncate_summary(raw: &str) -> String {
        if raw.chars().count() > SUMMARY_MAX_CHARS {
            let mut summary: String = raw.chars().take(SUMMARY_MAX_CHARS).collect();
            summary.push_str(TRUNCATION_MARKER);
            summary
        } else {
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_heuristic(result: &SentimentResult) {
        assert_eq!(result.source(), ResultSource::Heuristic);
        assert!([3, 5, 7].contains(&result.score()));
        assert_eq!(result.positive_aspects(), [MANUAL_REVIEW_ASPECT.to_string()]);
        assert_eq!(result.negative_aspects(), [MANUAL_REVIEW_ASPECT.to_string()]);
        assert_eq!(result.recommendations(), [MANUAL_REVIEW_RECOMMENDATION.to_string()]);
    }

    #[test]
    fn parses_complete_json_response() {
        let raw = r#"{
            "sentimiento_general": "Positivo",
            "puntuacion": 9,
            "aspectos_positivos": ["Fast shipping", "Great build quality"],
            "aspectos_negativos": [],
            "recomendaciones": ["Keep the packaging"],
            "resumen": "Very satisfied customer."
        }"#;

        let result = ResponseInterpreter::parse(raw);

        assert_eq!(result.source(), ResultSource::Model);
        assert_eq!(result.overall_sentiment(), Sentiment::Positive);
        assert_eq!(result.score(), 9);
        assert_eq!(
            result.positive_aspects(),
            ["Fast shipping".to_string(), "Great build quality".to_string()]
        );
        assert!(result.negative_aspects().is_empty());
        assert_eq!(result.recommendations(), ["Keep the packaging".to_string()]);
        assert_eq!(result.summary(), "Very satisfied customer.");
    }

    #[test]
    fn extracts_json_surrounded_by_prose_and_fences() {
        let raw = "Here is the analysis:\n```json\n{\"sentimiento_general\": \"Negative\", \"puntuacion\": 2, \"resumen\": \"Arrived broken.\"}\n```\nHope it helps!";

        let result = ResponseInterpreter::parse(raw);

        assert_eq!(result.source(), ResultSource::Model);
        assert_eq!(result.overall_sentiment(), Sentiment::Negative);
        assert_eq!(result.score(), 2);
        assert_eq!(result.summary(), "Arrived broken.");
    }

    #[test]
    fn keeps_out_of_range_scores_unmodified() {
        let raw = r#"{"sentimiento_general": "Neutral", "puntuacion": 15, "resumen": "x"}"#;
        let result = ResponseInterpreter::parse(raw);
        assert_eq!(result.source(), ResultSource::Model);
        assert_eq!(result.score(), 15);
    }

    #[test]
    fn accepts_english_keys() {
        let raw = r#"{"overall_sentiment": "positive", "score": 6, "summary": "Good value", "recommendations": "Ship faster"}"#;
        let result = ResponseInterpreter::parse(raw);

        assert_eq!(result.source(), ResultSource::Model);
        assert_eq!(result.overall_sentiment(), Sentiment::Positive);
        assert_eq!(result.score(), 6);
        assert_eq!(result.summary(), "Good value");
        assert_eq!(result.recommendations(), ["Ship faster".to_string()]);
    }

    #[test]
    fn fractional_scores_round_to_nearest_integer() {
        let raw = r#"{"sentimiento_general": "Positivo", "puntuacion": 7.6, "resumen": "ok"}"#;
        let result = ResponseInterpreter::parse(raw);

        assert_eq!(result.source(), ResultSource::Model);
        assert_eq!(result.score(), 8);

        let half = r#"{"sentimiento_general": "Negativo", "puntuacion": "2.5", "resumen": "ok"}"#;
        assert_eq!(ResponseInterpreter::parse(half).score(), 3);
    }

    #[test]
    fn missing_optional_lists_decode_as_empty() {
        let raw = r#"{"sentimiento_general": "Neutral", "puntuacion": "5", "resumen": "Average"}"#;
        let result = ResponseInterpreter::parse(raw);

        assert_eq!(result.source(), ResultSource::Model);
        assert_eq!(result.score(), 5);
        assert!(result.positive_aspects().is_empty());
        assert!(result.recommendations().is_empty());
    }

    #[test]
    fn missing_mandatory_field_falls_back() {
        let raw = r#"{"sentimiento_general": "Positivo", "puntuacion": 9}"#;
        let result = ResponseInterpreter::parse(raw);

        assert_heuristic(&result);
        assert_eq!(result.overall_sentiment(), Sentiment::Positive);
        assert_eq!(result.score(), 7);
        assert_eq!(result.summary(), raw);
    }

    #[test]
    fn null_mandatory_values_keep_the_model_record() {
        let raw = r#"{"sentimiento_general": null, "puntuacion": null, "aspectos_positivos": ["Precio"], "resumen": null}"#;
        let result = ResponseInterpreter::parse(raw);

        assert_eq!(result.source(), ResultSource::Model);
        assert_eq!(result.overall_sentiment(), Sentiment::Neutral);
        assert_eq!(result.score(), 5);
        assert_eq!(result.summary(), "");
        assert_eq!(result.positive_aspects(), ["Precio".to_string()]);
    }

    #[test]
    fn invalid_json_falls_back() {
        let raw = "{sentimiento_general: Negativo, puntuacion: 2}";
        let result = ResponseInterpreter::parse(raw);

        assert_heuristic(&result);
        assert_eq!(result.overall_sentiment(), Sentiment::Negative);
        assert_eq!(result.score(), 3);
    }

    #[test]
    fn decorated_label_keeps_model_values() {
        let raw = r#"{
            "sentimiento_general": "Muy positivo",
            "puntuacion": 9,
            "aspectos_positivos": ["Calidad"],
            "aspectos_negativos": ["Envío lento"],
            "recomendaciones": ["Mejorar la logística"],
            "resumen": "Cliente feliz"
        }"#;
        let result = ResponseInterpreter::parse(raw);

        assert_eq!(result.source(), ResultSource::Model);
        assert_eq!(result.overall_sentiment(), Sentiment::Positive);
        assert_eq!(result.score(), 9);
        assert_eq!(result.positive_aspects(), ["Calidad".to_string()]);
        assert_eq!(result.negative_aspects(), ["Envío lento".to_string()]);
        assert_eq!(result.recommendations(), ["Mejorar la logística".to_string()]);
        assert_eq!(result.summary(), "Cliente feliz");
    }

    #[test]
    fn unrecognized_values_are_mapped_best_effort() {
        let cases = [
            (r#"{"sentimiento_general": "Positivo.", "puntuacion": 8, "resumen": "x"}"#, Sentiment::Positive, 8, "x"),
            (r#"{"sentimiento_general": "Mayormente negativo", "puntuacion": 2, "resumen": "x"}"#, Sentiment::Negative, 2, "x"),
            (r#"{"sentimiento_general": "Mixed", "puntuacion": 5, "resumen": "x"}"#, Sentiment::Neutral, 5, "x"),
            (r#"{"sentimiento_general": "Positive", "puntuacion": "high", "resumen": "x"}"#, Sentiment::Positive, 5, "x"),
            (r#"{"sentimiento_general": "Positive", "puntuacion": 6, "resumen": ["x"]}"#, Sentiment::Positive, 6, r#"["x"]"#),
        ];

        for (raw, sentiment, score, summary) in cases {
            let result = ResponseInterpreter::parse(raw);
            assert_eq!(result.source(), ResultSource::Model, "{}", raw);
            assert_eq!(result.overall_sentiment(), sentiment, "{}", raw);
            assert_eq!(result.score(), score, "{}", raw);
            assert_eq!(result.summary(), summary, "{}", raw);
        }
    }

    #[test]
    fn reversed_braces_fall_back() {
        let result = ResponseInterpreter::parse("} nothing here {");
        assert_heuristic(&result);
        assert_eq!(result.overall_sentiment(), Sentiment::Neutral);
    }

    #[test]
    fn braces_inside_trailing_prose_break_extraction() {
        let raw = r#"{"sentimiento_general": "Positive", "puntuacion": 8, "resumen": "ok"} note: {see above}"#;
        assert_heuristic(&ResponseInterpreter::parse(raw));
    }

    #[test]
    fn positive_keywords_only_yield_positive() {
        let result = ResponseInterpreter::parse("El producto es EXCELENTE y muy bueno");
        assert_heuristic(&result);
        assert_eq!(result.overall_sentiment(), Sentiment::Positive);
        assert_eq!(result.score(), 7);
    }

    #[test]
    fn spanish_prose_reply_is_classified() {
        let result = ResponseInterpreter::parse(
            "La reseña es muy positiva: producto excelente y recomendado para la cocina.",
        );
        assert_heuristic(&result);
        assert_eq!(result.overall_sentiment(), Sentiment::Positive);
        assert_eq!(result.score(), 7);
    }

    #[test]
    fn negative_keywords_win_when_more_frequent() {
        let result = ResponseInterpreter::parse("Terrible. Muy malo, bueno solo el precio.");
        assert_eq!(result.overall_sentiment(), Sentiment::Negative);
        assert_eq!(result.score(), 3);
    }

    #[test]
    fn ties_yield_neutral() {
        let none = ResponseInterpreter::parse("no indicator words at all");
        assert_eq!(none.overall_sentiment(), Sentiment::Neutral);
        assert_eq!(none.score(), 5);

        let balanced = ResponseInterpreter::parse("bueno pero malo");
        assert_eq!(balanced.overall_sentiment(), Sentiment::Neutral);
        assert_eq!(balanced.score(), 5);

        let empty = ResponseInterpreter::parse("");
        assert_eq!(empty.overall_sentiment(), Sentiment::Neutral);
        assert_eq!(empty.summary(), "");
    }

    #[test]
    fn substring_matches_count_both_lists() {
        // "insatisfecho" contains "satisfecho", so both sides score once.
        let result = ResponseInterpreter::parse("cliente insatisfecho");
        assert_eq!(result.overall_sentiment(), Sentiment::Neutral);
    }

    #[test]
    fn repeated_word_counts_once() {
        let result = ResponseInterpreter::parse("bueno bueno bueno malo terrible");
        assert_eq!(result.overall_sentiment(), Sentiment::Negative);
    }

    #[test]
    fn summary_is_truncated_after_200_characters() {
        let exact = "a".repeat(200);
        assert_eq!(ResponseInterpreter::parse(&exact).summary(), exact);

        let long = "é".repeat(250);
        let summary = ResponseInterpreter::parse(&long).summary().to_string();
        assert_eq!(summary, format!("{}...", "é".repeat(200)));
    }
}
