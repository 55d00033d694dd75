// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the definition of `DataValue`.

use chrono::{DateTime, Utc};

use crate::{status_code::StatusCode, variant::Variant};

/// UTC timestamp as used on data values.
pub type UtcTime = DateTime<Utc>;

/// A value read from or written to a variable attribute, together with the
/// status of the read and the timestamps of the value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataValue {
    /// The value itself, absent when the read failed.
    pub value: Option<Variant>,
    /// The status associated with the value, absent means `Good`.
    pub status: Option<StatusCode>,
    /// The time the source produced the value.
    pub source_timestamp: Option<UtcTime>,
    /// The time the server obtained the value.
    pub server_timestamp: Option<UtcTime>,
}

impl<T> From<T> for DataValue
where
    T: Into<Variant>,
{
    fn from(value: T) -> Self {
        Self::value_only(value)
    }
}

impl DataValue {
    /// A null data value: no value, no status, no timestamps.
    pub fn null() -> DataValue {
        DataValue::default()
    }

    /// Create a data value from a value, with both timestamps set to now.
    pub fn new_now(value: impl Into<Variant>) -> DataValue {
        let now = Utc::now();
        DataValue {
            value: Some(value.into()),
            status: Some(StatusCode::Good),
            source_timestamp: Some(now),
            server_timestamp: Some(now),
        }
    }

    /// Create a data value carrying only a value, no status or timestamps.
    pub fn value_only(value: impl Into<Variant>) -> DataValue {
        DataValue {
            value: Some(value.into()),
            status: None,
            source_timestamp: None,
            server_timestamp: None,
        }
    }

    /// The effective status of the value; an absent status means `Good`.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::Good)
    }

    /// Set the status of the data value.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }
}
