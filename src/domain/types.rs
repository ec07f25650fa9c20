//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email, Indian phone formats, GSTIN layout) so that once
//! a value reaches the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Mobile number is not a 10-digit Indian mobile number.
    #[error("Invalid mobile number format. Please enter a valid 10-digit Indian mobile number.")]
    InvalidMobile,
    /// Phone number is neither a mobile nor a landline number.
    #[error("Invalid phone number format.")]
    InvalidPhone,
    /// GSTIN does not follow the 15 character layout.
    #[error("Invalid GSTIN format. GSTIN should be 15 characters with proper format.")]
    InvalidGstin,
}

static PHONE_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-.\s]").expect("valid separator regex"));

static MOBILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+91)?[6-9]\d{9}$").expect("valid mobile regex"));

static LANDLINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+91)?[0-9]{2,4}[0-9]{6,8}$").expect("valid landline regex"));

static GSTIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").expect("valid gstin regex")
});

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Removes dashes, dots and whitespace from a phone number.
pub fn strip_phone_separators(value: &str) -> String {
    PHONE_SEPARATORS.replace_all(value.trim(), "").into_owned()
}

/// Returns `true` when the value is an Indian mobile number, separators allowed.
pub fn is_mobile_number(value: &str) -> bool {
    MOBILE_PATTERN.is_match(&strip_phone_separators(value))
}

/// Returns `true` when the value is a mobile or landline number.
pub fn is_phone_number(value: &str) -> bool {
    let cleaned = strip_phone_separators(value);
    MOBILE_PATTERN.is_match(&cleaned) || LANDLINE_PATTERN.is_match(&cleaned)
}

/// Strips unsafe markup from long free-form text.
pub fn sanitize_long_text(value: &str) -> String {
    ammonia::clean(value).trim().to_string()
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(HubId, "Unique identifier for a hub (tenant).");
id_newtype!(ContactId, "Unique identifier for a contact.");
id_newtype!(CommunicationId, "Unique identifier for a communication entry.");
id_newtype!(SavedViewId, "Unique identifier for a saved list view.");

/// Lower-cased and validated contact email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ContactEmail(String);

impl ContactEmail {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ContactEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for ContactEmail {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(ViewLabel, "Saved view label enforcing trimmed, non-empty values.");

non_empty_string_newtype!(
    EmployeeCode,
    "Employee code wrapper enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(
    CommunicationSubject,
    "Communication subject wrapper enforcing trimmed, non-empty values."
);

/// Indian mobile number with separators removed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Strips separators and checks the `+91` optional, 10-digit mobile layout.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let cleaned = strip_phone_separators(&value.into());
        if cleaned.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if !MOBILE_PATTERN.is_match(&cleaned) {
            return Err(TypeConstraintError::InvalidMobile);
        }
        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for MobileNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mobile or landline (with STD code) number with separators removed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Strips separators and accepts either a mobile or a landline layout.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let cleaned = strip_phone_separators(&value.into());
        if cleaned.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if !MOBILE_PATTERN.is_match(&cleaned) && !LANDLINE_PATTERN.is_match(&cleaned) {
            return Err(TypeConstraintError::InvalidPhone);
        }
        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upper-cased GST identification number.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Gstin(String);

impl Gstin {
    /// Upper-cases the input and validates the state/PAN/check layout.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = value.into().trim().to_uppercase();
        if normalized.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if !GSTIN_PATTERN.is_match(&normalized) {
            return Err(TypeConstraintError::InvalidGstin);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Gstin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_number_accepts_separators_and_country_code() {
        let mobile = MobileNumber::new("+91 98765-43210").expect("valid mobile");
        assert_eq!(mobile.as_str(), "+919876543210");

        let plain = MobileNumber::new("9876543210").expect("valid mobile");
        assert_eq!(plain.as_str(), "9876543210");
    }

    #[test]
    fn mobile_number_rejects_landline_prefix() {
        assert_eq!(
            MobileNumber::new("5876543210"),
            Err(TypeConstraintError::InvalidMobile)
        );
        assert_eq!(
            MobileNumber::new("98765"),
            Err(TypeConstraintError::InvalidMobile)
        );
    }

    #[test]
    fn phone_number_accepts_landline_with_std_code() {
        let phone = PhoneNumber::new("022-2345 6789").expect("valid landline");
        assert_eq!(phone.as_str(), "02223456789");
        assert!(PhoneNumber::new("12").is_err());
    }

    #[test]
    fn gstin_is_uppercased_before_validation() {
        let gstin = Gstin::new("27aapfu0939f1zv").expect("valid gstin");
        assert_eq!(gstin.as_str(), "27AAPFU0939F1ZV");
        assert_eq!(Gstin::new("INVALID123"), Err(TypeConstraintError::InvalidGstin));
    }

    #[test]
    fn email_is_normalized() {
        let email = ContactEmail::new("  John@Example.COM ").expect("valid email");
        assert_eq!(email.as_str(), "john@example.com");
        assert!(ContactEmail::new("not-an-email").is_err());
    }

    #[test]
    fn ids_must_be_positive() {
        assert!(ContactId::new(0).is_err());
        assert_eq!(ContactId::new(7).map(ContactId::get), Ok(7));
    }

    #[test]
    fn long_text_is_sanitized() {
        let cleaned = sanitize_long_text("<script>alert(1)</script><b>note</b>");
        assert_eq!(cleaned, "<b>note</b>");
    }
}
