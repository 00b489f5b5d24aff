use serde::{Deserialize, Serialize};

use crate::adapters::llm::LLMRequest;

// Keep in Spanish: the keyword fallback only knows Spanish indicator words.
pub const SYSTEM_PROMPT: &str = "Eres un experto analista de sentimientos.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    pub system_prompt: String,
    pub user_prompt_template: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt_template: r#"Eres un experto analista de sentimientos especializado en reseñas de productos.

Analiza la siguiente reseña de producto y proporciona:

1. **Sentimiento General**: Positivo, Negativo o Neutral
2. **Puntuación de Sentimiento**: Del 1 al 10 (1=muy negativo, 10=muy positivo)
3. **Aspectos Positivos**: Lista los aspectos que destacan positivamente
4. **Aspectos Negativos**: Lista los aspectos que se mencionan negativamente
5. **Recomendaciones**: Sugerencias para el vendedor basadas en el análisis
6. **Resumen**: Resumen ejecutivo del análisis

Formato de respuesta en JSON:
{
    "sentimiento_general": "string",
    "puntuacion": number,
    "aspectos_positivos": ["string"],
    "aspectos_negativos": ["string"],
    "recomendaciones": ["string"],
    "resumen": "string"
}

Reseña a analizar:
"#
            .to_string(),
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

pub struct SentimentPromptBuilder {
    config: PromptConfig,
}

impl SentimentPromptBuilder {
    pub fn new(config: PromptConfig) -> Self {
        Self { config }
    }

    pub fn build_prompt(&self, review_text: &str) -> (String, String) {
        let user_prompt = format!("{}\n{}", self.config.user_prompt_template, review_text);
        (self.config.system_prompt.clone(), user_prompt)
    }

    pub fn build_request(&self, review_text: &str) -> LLMRequest {
        let (system_prompt, user_prompt) = self.build_prompt(review_text);
        LLMRequest {
            system_prompt,
            user_prompt,
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
        }
    }
}

impl Default for SentimentPromptBuilder {
    fn default() -> Self {
        Self::new(PromptConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_is_appended_after_template() {
        let builder = SentimentPromptBuilder::default();
        let (system, user) = builder.build_prompt("Great blender, a bit loud.");

        assert_eq!(system, SYSTEM_PROMPT);
        assert!(user.ends_with("Reseña a analizar:\n\nGreat blender, a bit loud."));
        for key in [
            "sentimiento_general",
            "puntuacion",
            "aspectos_positivos",
            "aspectos_negativos",
            "recomendaciones",
            "resumen",
        ] {
            assert!(user.contains(key), "prompt is missing {}", key);
        }
    }

    #[test]
    fn prompt_is_in_spanish_like_the_fallback_keywords() {
        let (system, user) = SentimentPromptBuilder::default().build_prompt("x");

        assert_eq!(system, "Eres un experto analista de sentimientos.");
        assert!(user.starts_with("Eres un experto analista de sentimientos especializado"));
        assert!(user.contains("Positivo, Negativo o Neutral"));
    }

    #[test]
    fn request_carries_call_parameters() {
        let request = SentimentPromptBuilder::default().build_request("ok");
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, Some(1000));
    }
}
