//! Field-scoped validation errors.
//!
//! Boundary validation accumulates problems per input field instead of
//! bailing on the first one, so a response can report everything wrong with
//! a payload at once. Serializes as `{"field": ["message", ...], ...}`.

use core::fmt;
use std::collections::BTreeMap;

use serde::Serialize;

/// A collection of validation messages keyed by input field name.
///
/// ## Examples
///
/// ```
/// use bazaar_core::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("email", "email must contain an @ symbol");
/// errors.add("prices", "Units must be a valid integer");
///
/// assert!(!errors.is_empty());
/// assert_eq!(errors.field("email").len(), 1);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    /// Merge another collection into this one.
    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    /// Messages recorded against a field (empty slice if none).
    #[must_use]
    pub fn field(&self, name: &str) -> &[String] {
        self.errors.get(name).map_or(&[], Vec::as_slice)
    }

    /// Whether no messages have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of messages across all fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Iterate `(field, messages)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// `Ok(value)` when empty, `Err(self)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns the collection itself when any message was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_by_default() {
        let errors = ValidationErrors::new();
        assert!(errors.is_empty());
        assert_eq!(errors.len(), 0);
        assert!(errors.into_result(42).is_ok());
    }

    #[test]
    fn test_add_accumulates_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "email cannot be empty");
        errors.add("email", "email must contain an @ symbol");
        errors.add("phone", "phone number must have at least 7 digits");

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.field("email").len(), 2);
        assert_eq!(errors.field("phone").len(), 1);
        assert!(errors.field("zip").is_empty());
    }

    #[test]
    fn test_into_result_err_when_non_empty() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "name cannot be empty");
        assert!(errors.into_result(()).is_err());
    }

    #[test]
    fn test_merge() {
        let mut a = ValidationErrors::new();
        a.add("name", "name cannot be empty");

        let mut b = ValidationErrors::new();
        b.add("name", "name is too long");
        b.add("slug", "slug already taken");

        a.merge(b);
        assert_eq!(a.field("name").len(), 2);
        assert_eq!(a.field("slug").len(), 1);
    }

    #[test]
    fn test_serialize_shape() {
        let mut errors = ValidationErrors::new();
        errors.add("prices", "Duplicate prices found: 150");
        errors.add("email", "email cannot be empty");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "email": ["email cannot be empty"],
                "prices": ["Duplicate prices found: 150"],
            })
        );
    }

    #[test]
    fn test_display() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "email cannot be empty");
        errors.add("name", "name cannot be empty");
        assert_eq!(
            errors.to_string(),
            "email: email cannot be empty; name: name cannot be empty"
        );
    }
}
