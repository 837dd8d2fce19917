use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use quiz_core::model::{OPTION_COUNT, QUESTIONS_PER_QUIZ, QuestionSet};
use quiz_core::validate::parse_generated_quiz;

use crate::error::GeneratorError;
use crate::search::SearchClient;

pub const MIN_TOPIC_LEN: usize = 3;
pub const MAX_TOPIC_LEN: usize = 200;

/// Output language for generated quizzes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    English,
    German,
}

impl Locale {
    /// Parse a BCP 47-ish tag, defaulting to English for unknown tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        if tag == "de" || tag.starts_with("de-") {
            Self::German
        } else {
            Self::English
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GeneratorConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("QUIZ_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("QUIZ_AI_BASE_URL")
            .unwrap_or_else(|_| "https://openrouter.ai/api/v1".into());
        let model = env::var("QUIZ_AI_MODEL").unwrap_or_else(|_| "openai/gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Generates quizzes via an OpenAI-compatible chat completions endpoint,
/// optionally grounded with web search context.
#[derive(Clone)]
pub struct QuizGenerator {
    client: Client,
    config: Option<GeneratorConfig>,
    search: SearchClient,
}

impl QuizGenerator {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GeneratorConfig::from_env(), SearchClient::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GeneratorConfig>, search: SearchClient) -> Self {
        Self {
            client: Client::new(),
            config,
            search,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Generate a validated ten-question quiz about `topic`.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError` when the generator is disabled, the topic is
    /// out of bounds, the request fails, or the model response does not pass
    /// payload validation.
    pub async fn generate(
        &self,
        topic: &str,
        locale: Locale,
    ) -> Result<QuestionSet, GeneratorError> {
        let config = self.config.as_ref().ok_or(GeneratorError::Disabled)?;

        let topic = topic.trim();
        if topic.chars().count() < MIN_TOPIC_LEN || topic.chars().count() > MAX_TOPIC_LEN {
            return Err(GeneratorError::InvalidTopic);
        }

        let context = self.search.context_for(topic).await;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(locale).to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(topic, locale, &context),
                },
            ],
            temperature: 0.7,
            max_tokens: 3000,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeneratorError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GeneratorError::EmptyResponse)?;

        parse_model_content(&content)
    }
}

/// Runs the model's raw text through payload validation.
///
/// # Errors
///
/// Returns `GeneratorError::Validation` for unparsable or structurally
/// invalid content.
fn parse_model_content(content: &str) -> Result<QuestionSet, GeneratorError> {
    Ok(parse_generated_quiz(content)?)
}

fn system_prompt(locale: Locale) -> &'static str {
    match locale {
        Locale::English => {
            "You are a trivia quiz generator. Respond with valid JSON only, \
             with no markdown fences and no commentary. All question text, \
             options, and explanations must be in English."
        }
        Locale::German => {
            "Du bist ein Quiz-Generator. Antworte ausschliesslich mit gueltigem \
             JSON, ohne Markdown und ohne Kommentare. Alle Fragen, \
             Antwortoptionen und Erklaerungen muessen auf Deutsch sein."
        }
    }
}

fn user_prompt(topic: &str, locale: Locale, context: &str) -> String {
    let mut prompt = String::new();

    let instruction = match locale {
        Locale::English => format!(
            "Create a quiz about \"{topic}\" with exactly {QUESTIONS_PER_QUIZ} \
             multiple-choice questions. Each question has exactly \
             {OPTION_COUNT} options and one correct answer."
        ),
        Locale::German => format!(
            "Erstelle ein Quiz zum Thema \"{topic}\" mit genau \
             {QUESTIONS_PER_QUIZ} Multiple-Choice-Fragen. Jede Frage hat genau \
             {OPTION_COUNT} Antwortoptionen und eine richtige Antwort."
        ),
    };
    prompt.push_str(&instruction);

    if !context.trim().is_empty() {
        prompt.push_str("\n\nUse the following context where it is relevant:\n");
        prompt.push_str(context.trim());
    }

    prompt.push_str(
        "\n\nReturn JSON with this exact shape:\n\
         {\"questions\": [{\"id\": \"q1\", \"question\": \"...\", \
         \"options\": [\"...\", \"...\", \"...\", \"...\"], \
         \"correctAnswer\": 0, \"explanation\": \"...\"}]}\n\
         correctAnswer is the zero-based index of the right option.",
    );

    prompt
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_from_tag_handles_variants() {
        assert_eq!(Locale::from_tag("de"), Locale::German);
        assert_eq!(Locale::from_tag("de-AT"), Locale::German);
        assert_eq!(Locale::from_tag("en"), Locale::English);
        assert_eq!(Locale::from_tag("fr"), Locale::English);
        assert_eq!(Locale::from_tag(""), Locale::English);
    }

    #[test]
    fn user_prompt_embeds_topic_and_context() {
        let prompt = user_prompt("Roman history", Locale::English, "WEB SEARCH SUMMARY:\nRome.");
        assert!(prompt.contains("Roman history"));
        assert!(prompt.contains("WEB SEARCH SUMMARY"));
        assert!(prompt.contains("correctAnswer"));
    }

    #[test]
    fn user_prompt_skips_empty_context() {
        let prompt = user_prompt("Space", Locale::German, "   ");
        assert!(prompt.contains("Space"));
        assert!(!prompt.contains("context"));
    }

    #[tokio::test]
    async fn disabled_generator_errors() {
        let generator = QuizGenerator::new(None, SearchClient::new(None));
        assert!(!generator.enabled());
        let err = generator.generate("History", Locale::English).await;
        assert!(matches!(err, Err(GeneratorError::Disabled)));
    }

    #[test]
    fn malformed_model_content_surfaces_validation_errors() {
        use quiz_core::ValidationError;

        let err = parse_model_content("I could not generate a quiz.").unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::Validation(ValidationError::UnparsableContent)
        ));

        let nine: Vec<String> = (0..9)
            .map(|i| {
                format!(
                    r#"{{"id": "q{i}", "question": "Question {i}?",
                        "options": ["A", "B", "C", "D"], "correctAnswer": 0}}"#
                )
            })
            .collect();
        let short_payload = format!(r#"{{"questions": [{}]}}"#, nine.join(","));
        let err = parse_model_content(&short_payload).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::Validation(ValidationError::WrongQuestionCount { found: 9 })
        ));
    }

    #[tokio::test]
    async fn short_topic_is_rejected() {
        let config = GeneratorConfig {
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key: "test".into(),
            model: "openai/gpt-4o-mini".into(),
        };
        let generator = QuizGenerator::new(Some(config), SearchClient::new(None));
        let err = generator.generate("  ab ", Locale::English).await;
        assert!(matches!(err, Err(GeneratorError::InvalidTopic)));
    }
}
