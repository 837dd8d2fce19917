//! Validation of untrusted quiz-generation payloads.
//!
//! The generator's model response is free-form text that should contain
//! a JSON object with exactly ten questions. This module is the last
//! line of defense before that content reaches a session: it extracts a
//! candidate JSON value (direct parse, fenced code block, or outermost
//! brace pair, in that order) and checks every structural rule. A
//! payload that fails any rule is rejected outright — there is no
//! partial acceptance.

use serde_json::Value;
use thiserror::Error;

use crate::model::{
    OPTION_COUNT, QUESTIONS_PER_QUIZ, Question, QuestionSet, QuestionSetError,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("no JSON object found in generated content")]
    UnparsableContent,

    #[error("payload has no questions array")]
    MalformedPayload,

    #[error("expected exactly 10 questions, got {found}")]
    WrongQuestionCount { found: usize },

    #[error("question {index} is malformed: {reason}")]
    MalformedQuestion { index: usize, reason: String },
}

//
// ─── EXTRACTION ────────────────────────────────────────────────────────────────
//

/// Extracts the first plausible JSON value from free-form model output.
///
/// Models asked for bare JSON still wrap it in markdown fences or prose
/// often enough that the fallbacks earn their keep.
///
/// # Errors
///
/// Returns `ValidationError::UnparsableContent` if no strategy yields
/// valid JSON.
pub fn extract_json(content: &str) -> Result<Value, ValidationError> {
    if let Ok(value) = serde_json::from_str::<Value>(content.trim()) {
        return Ok(value);
    }
    if let Some(block) = fenced_block(content) {
        if let Ok(value) = serde_json::from_str::<Value>(block) {
            return Ok(value);
        }
    }
    if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
        if end > start {
            if let Ok(value) = serde_json::from_str::<Value>(&content[start..=end]) {
                return Ok(value);
            }
        }
    }
    Err(ValidationError::UnparsableContent)
}

/// The body of the first markdown code fence, preferring a ```json one.
fn fenced_block(content: &str) -> Option<&str> {
    let rest = content
        .split_once("```json")
        .or_else(|| content.split_once("```"))
        .map(|(_, rest)| rest)?;
    let (block, _) = rest.split_once("```")?;
    Some(block.trim())
}

//
// ─── VALIDATION ────────────────────────────────────────────────────────────────
//

/// Validates an untyped payload into a trusted question set.
///
/// # Errors
///
/// Returns `ValidationError::MalformedPayload` if the `questions` array
/// is missing, `WrongQuestionCount` if it does not hold exactly ten
/// elements, or `MalformedQuestion` (with the offending index) if any
/// element breaks a per-question rule.
pub fn validate_payload(value: &Value) -> Result<QuestionSet, ValidationError> {
    let questions = value
        .get("questions")
        .and_then(Value::as_array)
        .ok_or(ValidationError::MalformedPayload)?;
    if questions.len() != QUESTIONS_PER_QUIZ {
        return Err(ValidationError::WrongQuestionCount {
            found: questions.len(),
        });
    }

    let mut validated = Vec::with_capacity(QUESTIONS_PER_QUIZ);
    for (index, raw) in questions.iter().enumerate() {
        validated.push(validate_question(index, raw)?);
    }

    QuestionSet::new(validated).map_err(|QuestionSetError::WrongQuestionCount { found }| {
        ValidationError::WrongQuestionCount { found }
    })
}

/// Convenience for the full pipeline: extract, then validate.
///
/// # Errors
///
/// Propagates [`extract_json`] and [`validate_payload`] errors.
pub fn parse_generated_quiz(content: &str) -> Result<QuestionSet, ValidationError> {
    validate_payload(&extract_json(content)?)
}

fn validate_question(index: usize, raw: &Value) -> Result<Question, ValidationError> {
    let malformed = |reason: &str| ValidationError::MalformedQuestion {
        index,
        reason: reason.to_string(),
    };

    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing `id`"))?;
    let text = raw
        .get("question")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing `question` text"))?;
    let options = raw
        .get("options")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("missing `options` array"))?;
    let mut option_texts = Vec::with_capacity(options.len());
    for option in options {
        let text = option
            .as_str()
            .ok_or_else(|| malformed("non-string entry in `options`"))?;
        option_texts.push(text.to_string());
    }
    let correct = raw
        .get("correctAnswer")
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed("`correctAnswer` is not a non-negative integer"))?;
    if correct >= OPTION_COUNT as u64 {
        return Err(malformed("`correctAnswer` is out of range"));
    }
    let explanation = match raw.get("explanation") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => return Err(malformed("`explanation` is not a string")),
    };

    Question::new(id, text, option_texts, correct as usize, explanation)
        .map_err(|e| ValidationError::MalformedQuestion {
            index,
            reason: e.to_string(),
        })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
