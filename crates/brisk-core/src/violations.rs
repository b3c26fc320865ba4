//! Constraint violation records.

use serde::{Deserialize, Serialize};

/// A recorded input-validation failure.
///
/// Compared by value: two violations with the same constraint and message
/// are the same violation and are not double-counted by the context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    constraint: String,
    message: String,
}

impl Violation {
    /// Create a violation for a named constraint.
    pub fn new(constraint: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            constraint: constraint.into(),
            message: message.into(),
        }
    }

    /// Name of the violated constraint.
    pub fn constraint(&self) -> &str {
        &self.constraint
    }

    /// Human-readable failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Join violation messages with a separator, without a trailing separator.
pub(crate) fn join_messages(violations: &[Violation], separator: &str) -> String {
    violations
        .iter()
        .map(Violation::message)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_messages() {
        let violations = vec![
            Violation::new("not_empty", "name is required"),
            Violation::new("max_len", "name is too long"),
        ];
        assert_eq!(
            join_messages(&violations, ", "),
            "name is required, name is too long"
        );
    }

    #[test]
    fn test_join_single_message_has_no_separator() {
        let violations = vec![Violation::new("not_empty", "name is required")];
        assert_eq!(join_messages(&violations, "\n"), "name is required");
    }

    #[test]
    fn test_join_empty() {
        assert_eq!(join_messages(&[], ","), "");
    }

    #[test]
    fn test_value_equality() {
        let a = Violation::new("not_empty", "name is required");
        let b = Violation::new("not_empty", "name is required");
        assert_eq!(a, b);
    }
}
