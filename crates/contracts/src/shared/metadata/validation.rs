//! Validation rules for metadata fields

use regex::Regex;

/// Validation rules for a field
/// Copy trait for efficient passing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationRules {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static str>,
    pub custom_error: Option<&'static str>,
}

impl ValidationRules {
    /// Create empty validation rules (all optional, no constraints)
    pub const fn none() -> Self {
        Self {
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            custom_error: None,
        }
    }

    /// Create validation rules for required field
    pub const fn required() -> Self {
        Self {
            required: true,
            ..Self::none()
        }
    }

    /// Attach a shape pattern together with the message shown on mismatch
    pub const fn with_pattern(self, pattern: &'static str, custom_error: &'static str) -> Self {
        Self {
            pattern: Some(pattern),
            custom_error: Some(custom_error),
            ..self
        }
    }

    pub const fn with_max_length(self, max: usize) -> Self {
        Self {
            max_length: Some(max),
            ..self
        }
    }

    /// Check if field is required
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Validate a string value against the rules
    ///
    /// Generic check used by the backend for plain text columns. The metadata
    /// form has dedicated validators with precompiled patterns.
    pub fn validate_string(&self, value: &str, field_label: &str) -> Result<(), String> {
        if self.required && value.trim().is_empty() {
            return Err(format!("{} is required", field_label));
        }

        if let Some(min) = self.min_length {
            if value.chars().count() < min {
                return Err(format!("{} must be at least {} characters", field_label, min));
            }
        }

        if let Some(max) = self.max_length {
            if value.chars().count() > max {
                return Err(format!("{} must not exceed {} characters", field_label, max));
            }
        }

        if let Some(pattern) = self.pattern {
            if !value.is_empty() {
                let re = Regex::new(pattern).map_err(|e| format!("bad pattern: {}", e))?;
                if !re.is_match(value) {
                    return Err(self
                        .custom_error
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("{} has an invalid format", field_label)));
                }
            }
        }

        Ok(())
    }
}
