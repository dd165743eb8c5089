// LucidQuant - Signup
// Interest form: check the address, thank the visitor. Nothing is stored.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SignupOutcome {
    Success(String),
    Error(String),
}

impl SignupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SignupOutcome::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            SignupOutcome::Success(msg) | SignupOutcome::Error(msg) => msg,
        }
    }
}

/// Loose check: something with an `@` and a `.` in it
pub fn validate_email(email: Option<&str>) -> SignupOutcome {
    let email = match email.map(str::trim) {
        Some(e) if !e.is_empty() => e,
        _ => return SignupOutcome::Error("Please provide an email address.".to_string()),
    };

    if !email.contains('@') || !email.contains('.') {
        return SignupOutcome::Error("Please provide a valid email address.".to_string());
    }

    SignupOutcome::Success(format!(
        "Thank you for signing up! We'll be in touch at {}",
        email
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_email() {
        assert_eq!(
            validate_email(None),
            SignupOutcome::Error("Please provide an email address.".to_string())
        );
        assert!(!validate_email(Some("  ")).is_success());
    }

    #[test]
    fn test_malformed_email() {
        for bad in ["someone", "someone@example", "example.com"] {
            let outcome = validate_email(Some(bad));
            assert_eq!(outcome.message(), "Please provide a valid email address.", "{}", bad);
        }
    }

    #[test]
    fn test_valid_email() {
        let outcome = validate_email(Some("ada@example.com"));

        assert!(outcome.is_success());
        assert_eq!(
            outcome.message(),
            "Thank you for signing up! We'll be in touch at ada@example.com"
        );
    }

    #[test]
    fn test_outcome_serializes_with_status() {
        let json = serde_json::to_value(validate_email(None)).unwrap();

        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Please provide an email address.");
    }
}
