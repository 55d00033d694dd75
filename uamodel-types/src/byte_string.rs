// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `ByteString`.

use base64::{engine::general_purpose::STANDARD, Engine};

/// A sequence of octets. Like a string, a byte string can be null.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash, Default)]
pub struct ByteString {
    /// The raw octets, `None` for the null byte string.
    pub value: Option<Vec<u8>>,
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        self.value.as_deref().unwrap_or(&[])
    }
}

impl<'a> From<&'a [u8]> for ByteString {
    fn from(value: &'a [u8]) -> Self {
        Self {
            value: Some(value.to_vec()),
        }
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(value: Vec<u8>) -> Self {
        Self { value: Some(value) }
    }
}

impl ByteString {
    /// Create a null byte string.
    pub fn null() -> ByteString {
        ByteString { value: None }
    }

    /// Test if the byte string is null.
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Test if the byte string is null or empty.
    pub fn is_empty(&self) -> bool {
        self.value.as_ref().map_or(true, |v| v.is_empty())
    }

    /// Create a byte string from a base64 encoded string, `None` if the
    /// input is not valid base64.
    pub fn from_base64(data: &str) -> Option<ByteString> {
        STANDARD.decode(data).map(Self::from).ok()
    }

    /// Encode the byte string as base64.
    pub fn as_base64(&self) -> String {
        self.value
            .as_ref()
            .map_or_else(String::new, |v| STANDARD.encode(v))
    }
}

#[cfg(test)]
mod tests {
    use super::ByteString;

    #[test]
    fn base64_round_trip() {
        let b = ByteString::from(&[0x01u8, 0x7f, 0xff][..]);
        let encoded = b.as_base64();
        assert_eq!(ByteString::from_base64(&encoded), Some(b));
        assert_eq!(ByteString::from_base64("not base64!"), None);
    }
}
