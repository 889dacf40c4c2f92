//! Shared validation helpers for inbound HTTP adapters.

use crate::domain::Error;

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

/// `400` for a required body field that was omitted.
pub(crate) fn missing_field_error(field: FieldName) -> Error {
    Error::invalid_field(
        field.as_str(),
        "missing_field",
        format!("{} is required", field.as_str()),
    )
}

/// Unwrap a required body field.
pub(crate) fn require<T>(field: FieldName, value: Option<T>) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}
