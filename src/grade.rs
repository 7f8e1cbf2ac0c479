use serde::Serialize;
use thiserror::Error;

/// Lowest accepted grade.
pub const GRADE_MIN: f64 = 0.0;
/// Grades must stay strictly below this bound.
pub const GRADE_MAX_EXCLUSIVE: f64 = 10.0;
/// The entry field holds at most this many characters, e.g. `9.99`.
pub const GRADE_MAX_CHARS: usize = 4;

pub const GRADE_PROMPT: &str = "Enter your average school grade (0.0 up to, but not including, 10.0)";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    #[error("'{0}' is not a number; grade must be a number from 0.0 up to (but not including) 10.0")]
    NotANumber(String),
    #[error("{0} is out of range; grade must be a number from 0.0 up to (but not including) 10.0")]
    OutOfRange(String),
    #[error("'{0}' is longer than 4 characters; grade must be a number from 0.0 up to (but not including) 10.0")]
    TooLong(String),
}

/// A validated grade, guaranteed to lie in `[0.0, 10.0)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Grade(f64);

impl Grade {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses the grade text field.
///
/// Empty input means "no grade" and is not an error. On error callers must
/// treat the grade as absent; no partially parsed value is ever returned.
pub fn parse_grade(text: &str) -> Result<Option<Grade>, GradeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > GRADE_MAX_CHARS {
        return Err(GradeError::TooLong(trimmed.to_string()));
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| GradeError::NotANumber(trimmed.to_string()))?;

    // NaN fails the range check as well.
    if !(GRADE_MIN..GRADE_MAX_EXCLUSIVE).contains(&value) {
        return Err(GradeError::OutOfRange(trimmed.to_string()));
    }

    Ok(Some(Grade(value)))
}

/// Outcome of validating the field, as shown next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeStatus {
    pub grade: Option<Grade>,
    pub error: Option<String>,
}

impl GradeStatus {
    pub fn from_text(text: &str) -> Self {
        match parse_grade(text) {
            Ok(grade) => Self { grade, error: None },
            Err(err) => {
                tracing::debug!(input = text, error = %err, "rejected grade input");
                Self {
                    grade: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}
