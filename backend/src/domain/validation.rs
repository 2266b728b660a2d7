//! Pattern validation for user names and email addresses.
//!
//! Each field has a [`FieldValidator`]; [`ProfileValidator`] applies both in a
//! fixed order (name, then email) and can be switched off entirely for the
//! lenient service policy.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::domain::UserProfile;

/// Capability to accept or reject a single field value.
pub trait FieldValidator: Send + Sync {
    /// Return `true` when `value` is acceptable.
    fn validate(&self, value: &str) -> bool;
}

/// Letters, apostrophe, hyphen, and underscore only.
const NAME_PATTERN: &str = r"^[A-Za-z'\-_]+$";

/// Simplified `local@domain.tld`; the TLD is letters only.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._+%-]+@[A-Za-z0-9.-]+[.][A-Za-z]+$";

static NAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("pattern {pattern} failed to compile: {error}"))
    })
}

/// Validator for user names.
///
/// # Examples
/// ```
/// use user_registry::domain::{FieldValidator, NamePattern};
///
/// assert!(NamePattern.validate("O'Brien-Smith"));
/// assert!(!NamePattern.validate("john123"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NamePattern;

impl FieldValidator for NamePattern {
    fn validate(&self, value: &str) -> bool {
        compiled(&NAME_RE, NAME_PATTERN).is_match(value)
    }
}

/// Validator for email addresses.
///
/// # Examples
/// ```
/// use user_registry::domain::{EmailPattern, FieldValidator};
///
/// assert!(EmailPattern.validate("a.b+c@example.co"));
/// assert!(!EmailPattern.validate("not-an-email"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailPattern;

impl FieldValidator for EmailPattern {
    fn validate(&self, value: &str) -> bool {
        compiled(&EMAIL_RE, EMAIL_PATTERN).is_match(value)
    }
}

/// Reasons a profile fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    /// The name does not match the name pattern.
    #[error("Invalid name")]
    InvalidName,
    /// The email does not match the email pattern.
    #[error("Invalid email")]
    InvalidEmail,
}

impl ProfileValidationError {
    /// Request field the failure refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::InvalidName => "name",
            Self::InvalidEmail => "email",
        }
    }

    /// Stable machine-readable code for error details.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidName => "invalid_name",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

/// Applies the name and email validators to a profile.
#[derive(Clone)]
pub struct ProfileValidator {
    name: Arc<dyn FieldValidator>,
    email: Arc<dyn FieldValidator>,
    enabled: bool,
}

impl ProfileValidator {
    /// Build a validator from explicit field validators.
    pub fn new(name: Arc<dyn FieldValidator>, email: Arc<dyn FieldValidator>) -> Self {
        Self {
            name,
            email,
            enabled: true,
        }
    }

    /// Validator using [`NamePattern`] and [`EmailPattern`].
    pub fn strict() -> Self {
        Self::new(Arc::new(NamePattern), Arc::new(EmailPattern))
    }

    /// Validator that accepts every profile.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::strict()
        }
    }

    /// Whether the checks run at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check the name, then the email.
    ///
    /// # Errors
    /// Returns the first failing field.
    pub fn check(&self, profile: &UserProfile) -> Result<(), ProfileValidationError> {
        if !self.enabled {
            return Ok(());
        }
        if !self.name.validate(profile.name()) {
            return Err(ProfileValidationError::InvalidName);
        }
        if !self.email.validate(profile.email()) {
            return Err(ProfileValidationError::InvalidEmail);
        }
        Ok(())
    }
}

impl Default for ProfileValidator {
    fn default() -> Self {
        Self::strict()
    }
}

impl std::fmt::Debug for ProfileValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileValidator")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
