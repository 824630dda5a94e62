//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes `400 invalid_request` with
//! `details: {"field": ..., "code": ...}` so clients can highlight the
//! offending input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::domain::{
    CredentialsValidationError, Error, QuestionValidationError, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    Empty,
    InvalidUuid,
    InvalidTimestamp,
    InvalidDifficulty,
    InvalidStatus,
    InvalidCount,
    InvalidFormat,
    TooShort,
    TooLong,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::Empty => "empty",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidDifficulty => "invalid_difficulty",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidCount => "invalid_count",
            ErrorCode::InvalidFormat => "invalid_format",
            ErrorCode::TooShort => "too_short",
            ErrorCode::TooLong => "too_long",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            let name = field.as_str();
            field_error(
                field,
                ErrorCode::InvalidTimestamp,
                format!("{name} must be an RFC 3339 timestamp"),
            )
        })
}

/// Map a question field failure onto the field that carried it.
pub(crate) fn question_field_error(field: FieldName, err: QuestionValidationError) -> Error {
    let code = match err {
        QuestionValidationError::EmptyName | QuestionValidationError::EmptyTopic => {
            ErrorCode::Empty
        }
        QuestionValidationError::UnknownDifficulty { .. } => ErrorCode::InvalidDifficulty,
        QuestionValidationError::InvalidId => ErrorCode::InvalidUuid,
    };
    field_error(field, code, err.to_string())
}

/// Map a credentials failure onto the `username` or `password` field.
pub(crate) fn credentials_error(err: CredentialsValidationError) -> Error {
    const USERNAME: FieldName = FieldName::new("username");
    const PASSWORD: FieldName = FieldName::new("password");

    let (field, code) = match &err {
        CredentialsValidationError::EmptyUsername => (USERNAME, ErrorCode::Empty),
        CredentialsValidationError::EmptyPassword => (PASSWORD, ErrorCode::Empty),
        CredentialsValidationError::PasswordTooShort { .. } => (PASSWORD, ErrorCode::TooShort),
        CredentialsValidationError::Username(inner) => match inner {
            UserValidationError::UsernameTooShort { .. } => (USERNAME, ErrorCode::TooShort),
            UserValidationError::UsernameTooLong { .. } => (USERNAME, ErrorCode::TooLong),
            UserValidationError::EmptyUsername => (USERNAME, ErrorCode::Empty),
            UserValidationError::UsernameInvalidCharacters | UserValidationError::InvalidId => {
                (USERNAME, ErrorCode::InvalidFormat)
            }
        },
    };
    field_error(field, code, err.to_string())
}

/// Deserialise a field that distinguishes "absent" from explicit `null`.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<Option<T>>`: absent stays `None`, `null` becomes `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
