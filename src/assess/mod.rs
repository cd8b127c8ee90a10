//! Assessment engines
//!
//! An engine assesses one file against the task requirements and later
//! reduces the per-file assessments into a repository summary and grade.
//! Failures come back as [`AssessmentError`] values, never as panics.

pub mod openai;
pub mod prompt;

pub use openai::OpenAiEngine;

use crate::error::AssessmentError;
use crate::review::model::Grade;
use async_trait::async_trait;
use serde_json::Value;

/// Repository-level outcome of the aggregation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryAssessment {
    pub message: String,
    pub grade: Option<Grade>,
}

/// Abstract assessment engine interface
#[async_trait]
pub trait AssessmentEngine: Send + Sync {
    /// Assess one decoded file against the requirements
    async fn assess_file(
        &self,
        content: &str,
        requirements: &str,
    ) -> Result<String, AssessmentError>;

    /// Reduce concatenated file assessments into a summary and grade
    async fn assess_repository(
        &self,
        reviews: &str,
    ) -> Result<RepositoryAssessment, AssessmentError>;

    /// Get the human-readable engine name for display
    fn engine_name(&self) -> &'static str;
}

/// Strip a Markdown code fence the model may wrap around its JSON
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Read a grade that may arrive as a number or a numeric string.
///
/// Values outside 0..=5 become `None`; non-numeric values are a decode failure.
fn parse_grade(value: &Value) -> Result<Option<Grade>, AssessmentError> {
    let number = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    number
        .map(Grade::new)
        .ok_or_else(|| AssessmentError::Decode(format!("grade is not an integer: {}", value)))
}

/// Parse the aggregation reply: a JSON object with `message` and `grade`
pub fn parse_repository_assessment(text: &str) -> Result<RepositoryAssessment, AssessmentError> {
    let value: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| AssessmentError::Decode(e.to_string()))?;

    let (Some(message), Some(grade)) = (value.get("message"), value.get("grade")) else {
        return Err(AssessmentError::Decode(
            "response must contain 'message' and 'grade'".to_string(),
        ));
    };
    let message = message
        .as_str()
        .ok_or_else(|| AssessmentError::Decode("'message' is not a string".to_string()))?;

    Ok(RepositoryAssessment {
        message: message.to_string(),
        grade: parse_grade(grade)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_json() {
        let a = parse_repository_assessment(r#"{"message": "Good work", "grade": 4}"#).unwrap();
        assert_eq!(a.message, "Good work");
        assert_eq!(a.grade.map(Grade::value), Some(4));
    }

    #[test]
    fn parse_string_grade_in_fence() {
        let text = "```json\n{\"message\": \"ok\", \"grade\": \"3\"}\n```";
        let a = parse_repository_assessment(text).unwrap();
        assert_eq!(a.grade.map(Grade::value), Some(3));
    }

    #[test]
    fn out_of_range_grade_is_nulled() {
        let a = parse_repository_assessment(r#"{"message": "m", "grade": 9}"#).unwrap();
        assert_eq!(a.grade, None);
        let a = parse_repository_assessment(r#"{"message": "m", "grade": -1}"#).unwrap();
        assert_eq!(a.grade, None);
    }

    #[test]
    fn missing_fields_is_decode_error() {
        let err = parse_repository_assessment(r#"{"message": "m"}"#).unwrap_err();
        assert!(matches!(err, AssessmentError::Decode(_)));
    }

    #[test]
    fn non_json_is_decode_error() {
        let err = parse_repository_assessment("The repository is great!").unwrap_err();
        assert!(matches!(err, AssessmentError::Decode(_)));
    }

    #[test]
    fn junk_grade_is_decode_error() {
        let err = parse_repository_assessment(r#"{"message": "m", "grade": "four"}"#).unwrap_err();
        assert!(matches!(err, AssessmentError::Decode(_)));
    }
}
