//! Request field checks shared by the DTOs

use contactdesk::DomainError;

/// Collects field errors so a request reports all of them at once
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, field: &str, value: &str, max_len: usize) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(format!("{} is required", field));
        } else {
            self.max_len(field, value, max_len);
        }
        self
    }

    pub fn optional(&mut self, field: &str, value: Option<&str>, max_len: usize) -> &mut Self {
        if let Some(value) = value {
            self.max_len(field, value, max_len);
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !value.trim().is_empty() && !looks_like_email(value) {
            self.errors.push(format!("{} is not a valid e-mail address", field));
        }
        self
    }

    pub fn finish(&self) -> Result<(), DomainError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.errors.join("; ")))
        }
    }

    fn max_len(&mut self, field: &str, value: &str, max_len: usize) {
        if value.chars().count() > max_len {
            self.errors.push(format!(
                "{} must be at most {} characters",
                field, max_len
            ));
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_all_errors() {
        let err = FieldErrors::new()
            .required("fullName", " ", 200)
            .required("subject", &"x".repeat(501), 500)
            .optional("phoneNumber", Some("0123456789012345678901"), 20)
            .email("email", "not-an-email")
            .finish()
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("fullName is required"));
        assert!(message.contains("subject must be at most 500 characters"));
        assert!(message.contains("phoneNumber must be at most 20 characters"));
        assert!(message.contains("email is not a valid e-mail address"));
    }

    #[test]
    fn test_valid_fields_pass() {
        assert!(FieldErrors::new()
            .required("fullName", "John Doe", 200)
            .optional("company", None, 200)
            .email("email", "john@x.com")
            .finish()
            .is_ok());
    }

    #[test]
    fn test_length_counts_characters() {
        // 50 Thai characters are 150 bytes
        let name = "ก".repeat(50);
        assert!(FieldErrors::new()
            .required("firstName", &name, 50)
            .finish()
            .is_ok());
    }
}
