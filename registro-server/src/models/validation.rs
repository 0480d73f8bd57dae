//! Validation error types

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Validation error for a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is missing or empty when it shouldn't be
    Empty { field: &'static str },

    /// String doesn't match required format (e.g., email)
    InvalidFormat { field: &'static str, reason: &'static str },
}

impl ValidationError {
    /// Name of the offending field, as it appears on the wire.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::InvalidFormat { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Every violation found in a submission, grouped by field.
///
/// Serializes as `{ "field": ["message", ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.0.entry(err.field()).or_default().push(err.to_string());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for one field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for messages in self.0.values() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                f.write_str(message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::InvalidFormat {
            field: "email",
            reason: "must be a valid email address",
        };
        assert_eq!(err.to_string(), "email: must be a valid email address");
    }

    #[test]
    fn groups_by_field() {
        let mut errors = FieldErrors::new();
        errors.push(ValidationError::Empty { field: "nombre" });
        errors.push(ValidationError::Empty { field: "email" });
        errors.push(ValidationError::InvalidFormat {
            field: "email",
            reason: "must be a valid email address",
        });

        assert_eq!(errors.fields().count(), 2);
        assert_eq!(errors.get("email").map(<[String]>::len), Some(2));
        assert!(errors.contains("nombre"));
        assert!(!errors.contains("twitter"));
    }

    #[test]
    fn serializes_as_map() {
        let mut errors = FieldErrors::new();
        errors.push(ValidationError::Empty { field: "ocupacion" });

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["ocupacion"][0], "ocupacion cannot be empty");
    }
}
