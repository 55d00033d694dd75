// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the definition of `UAString`.

use std::fmt;

/// An OPC UA string is either null or a sequence of UTF-8 characters.
///
/// The distinction between a null string and an empty string matters in the
/// standard, so the inner value is an `Option`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug, Clone)]
pub struct UAString {
    value: Option<String>,
}

impl fmt::Display for UAString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(ref value) => write!(f, "{}", value),
            None => write!(f, "[null]"),
        }
    }
}

impl From<UAString> for String {
    fn from(value: UAString) -> Self {
        value.as_ref().to_string()
    }
}

impl AsRef<str> for UAString {
    fn as_ref(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

impl<'a> From<&'a str> for UAString {
    fn from(value: &'a str) -> Self {
        Self {
            value: Some(value.to_string()),
        }
    }
}

impl From<&String> for UAString {
    fn from(value: &String) -> Self {
        Self {
            value: Some(value.clone()),
        }
    }
}

impl From<String> for UAString {
    fn from(value: String) -> Self {
        Self { value: Some(value) }
    }
}

impl PartialEq<str> for UAString {
    fn eq(&self, other: &str) -> bool {
        self.value.as_deref() == Some(other)
    }
}

impl UAString {
    /// Get the inner value of this string.
    pub fn value(&self) -> &Option<String> {
        &self.value
    }

    /// Set the value of this string.
    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    /// Returns true if the string is null.
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the length of the string in bytes, or -1 for null.
    pub fn len(&self) -> isize {
        self.value.as_ref().map_or(-1, |v| v.len() as isize)
    }

    /// Returns true if the string is null or empty.
    pub fn is_empty(&self) -> bool {
        self.value.as_ref().map_or(true, |v| v.is_empty())
    }

    /// Create a null string.
    pub fn null() -> UAString {
        UAString { value: None }
    }
}

#[cfg(test)]
mod tests {
    use super::UAString;

    #[test]
    fn null_and_empty_are_distinct() {
        let null = UAString::null();
        assert!(null.is_null());
        assert!(null.is_empty());
        assert_eq!(null.len(), -1);

        let empty = UAString::from("");
        assert!(!empty.is_null());
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);

        assert_ne!(null, empty);
    }
}
