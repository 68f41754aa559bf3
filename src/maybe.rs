use serde::ser::Error as _;
use serde::{Serialize, Serializer};

/// Tri-state value for partial-update payloads.
///
/// PATCH bodies must distinguish "do not touch this field" from "clear this
/// field to null" from "set this field". `Option` can only express two of the
/// three, so update structs use `Maybe` for every field:
///
/// - `NotGiven` — the caller did not supply the field; it must not appear in
///   the request body at all. This is the default.
/// - `Null` — the caller explicitly clears the field; serialized as `null`.
/// - `Value(v)` — the caller sets the field to `v`.
///
/// Update structs pair each field with
/// `#[serde(skip_serializing_if = "Maybe::is_not_given")]`, so a `NotGiven`
/// never reaches the wire. Serializing a `NotGiven` directly is a hard error
/// rather than a silent `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Maybe<T> {
    NotGiven,
    Null,
    Value(T),
}

// Not derived: the derive would demand `T: Default` even though the default
// variant carries no value.
impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Maybe::NotGiven
    }
}

impl<T> Maybe<T> {
    pub fn is_not_given(&self) -> bool {
        matches!(self, Maybe::NotGiven)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Maybe::Null)
    }

    /// The contained value, if one was given.
    pub fn value(&self) -> Option<&T> {
        match self {
            Maybe::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<T> for Maybe<T> {
    fn from(value: T) -> Self {
        Maybe::Value(value)
    }
}

/// `Some(v)` maps to `Value(v)`, `None` maps to an explicit `Null`.
impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Maybe::Value(v),
            None => Maybe::Null,
        }
    }
}

impl From<&str> for Maybe<String> {
    fn from(value: &str) -> Self {
        Maybe::Value(value.to_string())
    }
}

/// Marker embedded in the serializer error when a `NotGiven` reaches the
/// wire. `HubApiError::from::<serde_json::Error>` matches on it to report the
/// leak as [`NotGivenLeak`](crate::HubApiError::NotGivenLeak) instead of a
/// generic serialization failure.
pub(crate) const NOT_GIVEN_LEAK_MARKER: &str =
    "a not-given field must be filtered out before serialization";

impl<T: Serialize> Serialize for Maybe<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Maybe::NotGiven => Err(S::Error::custom(NOT_GIVEN_LEAK_MARKER)),
            Maybe::Null => serializer.serialize_none(),
            Maybe::Value(v) => v.serialize(serializer),
        }
    }
}
