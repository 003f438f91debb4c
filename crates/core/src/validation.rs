//! Field-level validation for inbound payloads.

use std::fmt;

pub const COURSE_NAME_MIN: usize = 5;
pub const COURSE_NAME_MAX: usize = 100;
pub const LESSON_NAME_MIN: usize = 3;
pub const LESSON_NAME_MAX: usize = 100;
pub const YOUTUBE_TOKEN_MAX: usize = 11;

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered collection of field failures.
///
/// Displays as `field: message` pairs joined by `", "`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Implemented by payloads that are checked before reaching a service.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Records "required" for blank text and a range message for lengths outside `min..=max`.
///
/// Both are reported when blank text is also too short.
pub(crate) fn check_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    label: &str,
    min: usize,
    max: usize,
) {
    if value.trim().is_empty() {
        errors.push(field, format!("{label} is required"));
    }
    let len = value.chars().count();
    if len < min || len > max {
        errors.push(
            field,
            format!("{label} must be between {min} and {max} characters"),
        );
    }
}

pub(crate) fn check_youtube_token(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, "YouTube URL is required");
    } else if value.chars().count() > YOUTUBE_TOKEN_MAX {
        errors.push(
            field,
            format!("YouTube URL must be at most {YOUTUBE_TOKEN_MAX} characters"),
        );
    }
}
