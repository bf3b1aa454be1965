// file: src/utils/validation.rs
// description: input validation for queries, weights and endpoints
// reference: input validation patterns

use crate::error::{RagError, Result};

pub struct Validator;

impl Validator {
    pub fn validate_question(question: &str) -> Result<()> {
        if question.trim().is_empty() {
            return Err(RagError::Validation("Question is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_weight(weight: f32) -> Result<()> {
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(RagError::Validation(format!(
                "Semantic weight must be within [0, 1], got {}",
                weight
            )));
        }
        Ok(())
    }

    pub fn validate_top_k(k: usize) -> Result<()> {
        if k == 0 {
            return Err(RagError::Validation(
                "top_k must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(RagError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn is_remote_source(source: &str) -> bool {
        Self::validate_url(source).is_ok()
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
