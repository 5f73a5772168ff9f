//! Validation system for configuration values
//!
//! Each config section implements the `ConfigSection` trait which includes validation.

pub use crate::error::ValidationError;

/// Trait for configuration sections that can validate themselves
///
/// New sections can be added to the root `Config` without touching the
/// existing ones.
pub trait ConfigSection: Default {
    /// Validates the configuration section
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Merges another config section into this one
    ///
    /// Values from `other` take precedence. This is used for override chains.
    fn merge(&mut self, other: Self);

    /// Returns the section name for error reporting
    fn section_name(&self) -> &'static str;
}

/// Common validators for config values
pub struct Validator;

impl Validator {
    /// Validates that a numeric value is within a range
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            Err(ValidationError::with_value(
                field,
                format!("must be between {} and {}", min, max),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that `value` does not exceed `limit`
    pub fn at_most<T>(value: T, limit: T, field: &str, limit_name: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value > limit {
            Err(ValidationError::with_value(
                field,
                format!("must not exceed {} ({})", limit_name, limit),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that a string is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::new(field, "must not be empty"))
        } else {
            Ok(())
        }
    }

    /// Collects multiple validation results into a single result
    pub fn collect_errors(
        results: Vec<Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(|r| r.err()).collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_valid() {
        assert!(Validator::in_range(50, 0, 100, "test").is_ok());
        assert!(Validator::in_range(0, 0, 100, "test").is_ok());
        assert!(Validator::in_range(100, 0, 100, "test").is_ok());
    }

    #[test]
    fn test_in_range_invalid() {
        assert!(Validator::in_range(-1, 0, 100, "test").is_err());
        assert!(Validator::in_range(101, 0, 100, "test").is_err());
    }

    #[test]
    fn test_at_most() {
        assert!(Validator::at_most(50, 3000, "tick", "story duration").is_ok());
        let err = Validator::at_most(5000, 3000, "tick", "story duration").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field 'tick': must not exceed story duration (3000) (got: 5000)"
        );
    }

    #[test]
    fn test_not_empty() {
        assert!(Validator::not_empty("hello", "test").is_ok());
        assert!(Validator::not_empty("", "test").is_err());
        assert!(Validator::not_empty("   ", "test").is_err());
    }

    #[test]
    fn test_collect_errors() {
        assert!(Validator::collect_errors(vec![Ok(()), Ok(())]).is_ok());

        let result = Validator::collect_errors(vec![
            Ok(()),
            Err(ValidationError::new("field1", "error1")),
            Err(ValidationError::new("field2", "error2")),
        ]);
        assert_eq!(result.unwrap_err().len(), 2);
    }
}
