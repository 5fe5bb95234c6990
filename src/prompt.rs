use dialoguer::{Completion, Input};

use crate::error::AppResult;

/// Accepts input that exactly matches a member of the valid set, or empty
/// input when the configured default is itself a member. Everything else is
/// rejected with the caller-supplied message.
#[derive(Debug, Clone)]
pub struct ValueInListValidator {
    valid_values: Vec<String>,
    default_value: Option<String>,
    error_message: String,
}

/// Rejection carries the cursor position (end of the rejected input) so the
/// interactive prompt can re-position for correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub cursor: usize,
    pub message: String,
}

impl ValueInListValidator {
    pub fn new(
        valid_values: Vec<String>,
        default_value: Option<String>,
        error_message: &str,
    ) -> Self {
        Self {
            valid_values,
            default_value,
            error_message: error_message.to_string(),
        }
    }

    pub fn check(&self, input: &str) -> Result<(), ValidationFailure> {
        if self.valid_values.iter().any(|value| value == input) {
            return Ok(());
        }

        if input.is_empty()
            && let Some(default) = &self.default_value
            && self.valid_values.iter().any(|value| value == default)
        {
            return Ok(());
        }

        Err(ValidationFailure {
            cursor: input.len(),
            message: self.error_message.clone(),
        })
    }
}

struct ListCompletion {
    candidates: Vec<String>,
}

impl Completion for ListCompletion {
    fn get(&self, input: &str) -> Option<String> {
        self.candidates
            .iter()
            .find(|candidate| candidate.starts_with(input))
            .cloned()
    }
}

#[derive(Debug, Default)]
pub struct Prompter;

impl Prompter {
    /// Prompt for a value with tab completion, re-prompting until the
    /// validator accepts. `current_value` pre-fills the input; clearing it
    /// and submitting empty falls back to that value when the validator
    /// allows empty input.
    pub fn get_value(
        prompt_text: &str,
        current_value: Option<&str>,
        completions: &[String],
        validator: &ValueInListValidator,
    ) -> AppResult<String> {
        let completion = ListCompletion {
            candidates: completions.to_vec(),
        };

        let mut input = Input::<String>::new()
            .with_prompt(prompt_text)
            .allow_empty(true)
            .completion_with(&completion)
            .validate_with(|value: &String| {
                validator.check(value).map_err(|failure| failure.message)
            });

        if let Some(current) = current_value {
            input = input.with_initial_text(current);
        }

        let value = input.interact_text()?;
        if value.is_empty()
            && let Some(current) = current_value
        {
            return Ok(current.to_string());
        }

        Ok(value)
    }
}
