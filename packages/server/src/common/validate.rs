//! Request-boundary validation, resolved before any store access.

use crate::common::ApiError;

/// Collects per-field validation messages for one request.
#[derive(Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` unless the condition holds.
    pub fn check(&mut self, condition: bool, message: &str) {
        if !condition {
            self.errors.push(message.to_string());
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

/// Good-enough email shape check: one `@`, a dot in the domain, no spaces.
/// Deliverability is the mail system's problem.
pub fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("mairie.lyon+grants@ville.fr"));
    }

    #[test]
    fn rejects_obviously_broken_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn validator_collects_all_failures() {
        let mut validator = Validator::new();
        validator.check(false, "email is required");
        validator.check(true, "this one passes");
        validator.check(false, "password must be at least 8 characters");

        let err = validator.finish().unwrap_err();
        match err {
            ApiError::Validation(messages) => assert_eq!(messages.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
