//! Seller contact number and messaging deep links.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Minimum number of digits a contact number must carry.
pub const CONTACT_MIN_DIGITS: usize = 10;

const MESSAGING_BASE: &str = "https://wa.me/";

/// Validation errors for [`ContactNumber`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactNumberError {
    #[error("contact number must only contain digits")]
    NonDigit,
    #[error("contact number must have at least {min} digits")]
    TooShort { min: usize },
}

/// Phone-like contact string reduced to its digits.
///
/// Spaces, dashes, parentheses and one leading `+` are accepted on input and
/// dropped; anything else is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContactNumber(String);

impl ContactNumber {
    /// Normalise and validate a contact number.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::ContactNumber;
    ///
    /// let number = ContactNumber::new("+91 98765-43210").expect("valid number");
    /// assert_eq!(number.digits(), "919876543210");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ContactNumberError> {
        let trimmed = raw.as_ref().trim();
        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let mut digits = String::with_capacity(body.len());
        for ch in body.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                ' ' | '-' | '(' | ')' => {}
                _ => return Err(ContactNumberError::NonDigit),
            }
        }
        if digits.len() < CONTACT_MIN_DIGITS {
            return Err(ContactNumberError::TooShort {
                min: CONTACT_MIN_DIGITS,
            });
        }
        Ok(Self(digits))
    }

    /// Digits only, without separators.
    pub fn digits(&self) -> &str {
        self.0.as_str()
    }

    /// Build the external messaging deep link with a prefilled message.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] if the link cannot be assembled.
    pub fn messaging_link(&self, text: &str) -> Result<Url, url::ParseError> {
        let mut link = Url::parse(MESSAGING_BASE)?.join(self.digits())?;
        if !text.is_empty() {
            link.query_pairs_mut().append_pair("text", text);
        }
        Ok(link)
    }
}

impl fmt::Display for ContactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.digits())
    }
}

impl From<ContactNumber> for String {
    fn from(value: ContactNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for ContactNumber {
    type Error = ContactNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
