//! Extracted-file validator for the extraction mission

use crate::validators::{ValidationError, ValidationResult};

/// Validates an uploaded file against known-expected bytes.
///
/// Exact byte-for-byte equality; no line-ending or whitespace
/// normalization, no partial credit.
pub struct FileContentValidator<'a> {
    expected: &'a [u8],
}

impl<'a> FileContentValidator<'a> {
    pub fn new(expected: &'a [u8]) -> Self {
        Self { expected }
    }

    /// Validate raw upload bytes against the expected contents
    pub fn validate(&self, bytes: &[u8]) -> ValidationResult {
        if bytes == self.expected {
            Ok(())
        } else {
            Err(ValidationError::ContentMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_pass() {
        let validator = FileContentValidator::new(b"the expected payload\n");
        validator.validate(b"the expected payload\n").unwrap();
    }

    #[test]
    fn different_bytes_are_a_mismatch() {
        let validator = FileContentValidator::new(b"the expected payload\n");
        let err = validator
            .validate(b"This is certainly not what it wants!")
            .unwrap_err();
        assert_eq!(err, ValidationError::ContentMismatch);
    }

    #[test]
    fn line_endings_are_not_normalized() {
        let validator = FileContentValidator::new(b"line one\nline two\n");
        let err = validator.validate(b"line one\r\nline two\r\n").unwrap_err();
        assert_eq!(err, ValidationError::ContentMismatch);
    }

    #[test]
    fn empty_upload_against_nonempty_expectation_fails() {
        let validator = FileContentValidator::new(b"something");
        assert!(validator.validate(b"").is_err());
    }
}
