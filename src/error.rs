use thiserror::Error;

/// Error type for Hub API operations.
///
/// Transport-level failures (`Transport`, `Connection`, `Authentication`,
/// `Forbidden`, `Validation`, `JsonDecode`, `Api`) are raised by the HTTP
/// layer based on the response status code. The remaining variants are local
/// failures raised before any network call (`DetachedEntity`, `TypeMismatch`,
/// `Materialize`, `NotGivenLeak`) or by the task polling loop (`TaskFailed`,
/// `TaskTimeout`, `TaskAborted`).
#[derive(Debug, Error)]
pub enum HubApiError {
    /// Network/transport errors (wraps `reqwest::Error`).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The Hub could not be reached, or the discovery endpoint returned
    /// something that is not a Hub API.
    #[error("Failed to connect to the Hub at {url}: {message}")]
    Connection { url: String, message: String },

    /// HTTP 401.
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        response_text: String,
    },

    /// HTTP 403.
    #[error("Permission denied: {message}")]
    Forbidden {
        message: String,
        response_text: String,
    },

    /// HTTP 422. Field-level details are merged into the message; the raw
    /// body is kept in `response_text`.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        response_text: String,
    },

    /// The response body could not be decoded as JSON.
    #[error("Could not decode response as JSON: {message}")]
    JsonDecode {
        message: String,
        response_text: String,
    },

    /// Any other non-2xx status code.
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        response_text: String,
    },

    /// A 2xx response arrived without a body where one was required.
    #[error("Empty response from {path}")]
    MissingResponse { path: String },

    /// The entity has no attached client or no id, so lifecycle operations
    /// cannot build a request for it.
    #[error("This {kind} instance is detached or unsaved (id: {id:?}) and cannot perform this operation")]
    DetachedEntity {
        kind: &'static str,
        id: Option<String>,
    },

    /// An entity of the wrong type was passed where an id was expected.
    #[error("Invalid {expected} provided, got a {actual} instead")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A payload could not be turned into a typed entity: unrecognized enum
    /// value, missing required nested field, or structurally malformed data.
    #[error("Could not materialize {kind}: {message}")]
    Materialize { kind: &'static str, message: String },

    /// A `Maybe::NotGiven` value reached serialization. Unset fields must be
    /// filtered out of the payload before the body is built.
    #[error("A not-given field leaked into a request payload")]
    NotGivenLeak,

    /// A request payload could not be serialized to JSON.
    #[error("Failed to serialize request payload: {message}")]
    Serialize { message: String },

    /// The polled task reached the `error` state.
    #[error("{kind} failed: {message}")]
    TaskFailed { kind: &'static str, message: String },

    /// The polled task was still running when the deadline fired.
    #[error("{kind} did not finish within {timeout:.1}s")]
    TaskTimeout { kind: &'static str, timeout: f64 },

    /// The polled task ended in a state that is neither success nor failure
    /// (e.g. skipped, or no progress information at all).
    #[error("{kind} was aborted (last known state: {state})")]
    TaskAborted { kind: &'static str, state: String },
}

impl From<serde_json::Error> for HubApiError {
    fn from(e: serde_json::Error) -> Self {
        let message = e.to_string();
        if message.contains(crate::maybe::NOT_GIVEN_LEAK_MARKER) {
            HubApiError::NotGivenLeak
        } else {
            HubApiError::Serialize { message }
        }
    }
}

impl HubApiError {
    /// HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Validation { .. } => Some(422),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body carried by this error, if any.
    pub fn response_text(&self) -> Option<&str> {
        match self {
            Self::Authentication { response_text, .. }
            | Self::Forbidden { response_text, .. }
            | Self::Validation { response_text, .. }
            | Self::JsonDecode { response_text, .. }
            | Self::Api { response_text, .. } => Some(response_text),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HubApiError>;
