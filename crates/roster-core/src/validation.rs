use crate::error::ValidationError;
use crate::person::Person;

/// Validator for person records submitted by callers.
///
/// The data facade never calls this; it is applied at the edges before a
/// record is handed over for create or update.
pub struct Validator;

impl Validator {
    /// Name must be non-empty after trimming.
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        Ok(())
    }

    /// Email must be non-empty and shaped like `local@domain.tld`.
    /// No whitespace anywhere, exactly one `@`, and a dot in the domain with
    /// characters on both sides of it. Only the emptiness check trims.
    pub fn validate_email(email: &str) -> Result<(), ValidationError> {
        if email.trim().is_empty() {
            return Err(ValidationError::EmailRequired);
        }

        let invalid = || ValidationError::InvalidEmail(email.to_string());

        if email.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
        if local.is_empty() || domain.contains('@') {
            return Err(invalid());
        }

        let has_inner_dot = domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
        if !has_inner_dot {
            return Err(invalid());
        }

        Ok(())
    }

    /// Validate a complete person.
    pub fn validate_person(person: &Person) -> Result<(), ValidationError> {
        Self::validate_name(&person.name)?;
        Self::validate_email(&person.email)?;
        Ok(())
    }
}
