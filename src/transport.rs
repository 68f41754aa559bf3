use reqwest::blocking::{multipart, Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::error::{HubApiError, Result};

// ---------------------------------------------------------------------------
// Transport capability
// ---------------------------------------------------------------------------

/// Abstract HTTP capability consumed by the resource layer.
///
/// All methods return the parsed JSON body (`None` for 204 responses) or
/// raise a member of the error taxonomy; error codes are never returned as
/// values. [`HttpTransport`] is the production implementor; tests substitute
/// their own.
pub trait Transport: Send + Sync {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<Option<Value>>;

    fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        query: &[(String, String)],
    ) -> Result<Option<Value>>;

    /// POST with a multipart file upload (knowledge-base ingestion).
    fn post_file(
        &self,
        path: &str,
        query: &[(String, String)],
        field: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Option<Value>>;

    fn patch(&self, path: &str, body: &Value) -> Result<Option<Value>>;

    fn delete(&self, path: &str, query: &[(String, String)]) -> Result<Option<Value>>;
}

// ---------------------------------------------------------------------------
// Status-code -> error mapping
// ---------------------------------------------------------------------------

/// Map a non-2xx response to the matching error variant. `body` is the
/// parsed JSON body when the server sent one.
fn classify_error(status: u16, body: Option<&Value>, raw: &str) -> HubApiError {
    let detail = body
        .and_then(|b| {
            b.get("detail")
                .or_else(|| b.get("message"))
                .and_then(Value::as_str)
        })
        .unwrap_or("")
        .to_string();

    match status {
        401 => HubApiError::Authentication {
            message: if detail.is_empty() {
                "Unauthenticated".into()
            } else {
                detail
            },
            response_text: raw.to_string(),
        },
        403 => HubApiError::Forbidden {
            message: if detail.is_empty() {
                "Permission denied".into()
            } else {
                detail
            },
            response_text: raw.to_string(),
        },
        422 => {
            // Merge field-level details into the message so the error is
            // self-contained when logged or displayed.
            let message = if detail.is_empty() {
                raw.to_string()
            } else {
                detail
            };
            HubApiError::Validation {
                message,
                response_text: raw.to_string(),
            }
        }
        _ => HubApiError::Api {
            status,
            message: if detail.is_empty() {
                format!("HTTP {status}")
            } else {
                detail
            },
            response_text: raw.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Production HTTP transport
// ---------------------------------------------------------------------------

/// Blocking HTTP transport over `reqwest`, with API-key header injection and
/// status-code to error mapping.
pub struct HttpTransport {
    base_url: String,
    http: Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let key = reqwest::header::HeaderValue::from_str(api_key).map_err(|e| {
            HubApiError::Connection {
                url: base_url.to_string(),
                message: format!("invalid API key header value: {e}"),
            }
        })?;
        headers.insert("X-API-Key", key);

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for a given endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Shared response handling: 204 -> `None`, 2xx -> parsed body, anything
    /// else -> the matching error variant.
    fn handle_response(&self, response: Response) -> Result<Option<Value>> {
        let status = response.status().as_u16();
        debug!(status, "hub response");

        if status == 204 {
            return Ok(None);
        }

        let raw = response.text()?;
        let body: Option<Value> = serde_json::from_str(&raw).ok();

        if (200..300).contains(&status) {
            return match body {
                Some(value) => Ok(Some(value)),
                None => Err(HubApiError::JsonDecode {
                    message: "response body is not valid JSON".into(),
                    response_text: raw,
                }),
            };
        }

        Err(classify_error(status, body.as_ref(), &raw))
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<Option<Value>> {
        debug!(path, "GET");
        let resp = self.http.get(self.url(path)).query(query).send()?;
        self.handle_response(resp)
    }

    fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        query: &[(String, String)],
    ) -> Result<Option<Value>> {
        debug!(path, "POST");
        let mut req = self.http.post(self.url(path)).query(query);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.handle_response(req.send()?)
    }

    fn post_file(
        &self,
        path: &str,
        query: &[(String, String)],
        field: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Option<Value>> {
        debug!(path, filename, "POST multipart");
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/jsonl")
            .map_err(|e| HubApiError::Api {
                status: 0,
                message: format!("Invalid MIME type: {e}"),
                response_text: String::new(),
            })?;
        let form = multipart::Form::new().part(field.to_string(), part);
        let resp = self
            .http
            .post(self.url(path))
            .query(query)
            .multipart(form)
            .send()?;
        self.handle_response(resp)
    }

    fn patch(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        debug!(path, "PATCH");
        let resp = self.http.patch(self.url(path)).json(body).send()?;
        self.handle_response(resp)
    }

    fn delete(&self, path: &str, query: &[(String, String)]) -> Result<Option<Value>> {
        debug!(path, "DELETE");
        let resp = self.http.delete(self.url(path)).query(query).send()?;
        self.handle_response(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unauthorized_maps_to_authentication_error() {
        let body = json!({"detail": "Invalid API key"});
        let err = classify_error(401, Some(&body), "{\"detail\":\"Invalid API key\"}");
        assert!(matches!(err, HubApiError::Authentication { .. }));
        assert_eq!(err.status_code(), Some(401));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[test]
    fn forbidden_maps_to_forbidden_error() {
        let err = classify_error(403, None, "");
        assert!(matches!(err, HubApiError::Forbidden { .. }));
        assert_eq!(err.status_code(), Some(403));
    }

    #[test]
    fn unprocessable_entity_merges_detail_into_message() {
        let body = json!({"detail": "name: field required"});
        let err = classify_error(422, Some(&body), "raw body");
        match &err {
            HubApiError::Validation {
                message,
                response_text,
            } => {
                assert!(message.contains("field required"));
                assert_eq!(response_text, "raw body");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn other_statuses_map_to_generic_api_error() {
        let err = classify_error(500, None, "boom");
        match &err {
            HubApiError::Api {
                status,
                response_text,
                ..
            } => {
                assert_eq!(*status, 500);
                assert_eq!(response_text, "boom");
            }
            other => panic!("expected Api, got {other:?}"),
        }
        assert_eq!(err.response_text(), Some("boom"));
    }

    #[test]
    fn message_key_is_accepted_as_detail() {
        let body = json!({"message": "not found"});
        let err = classify_error(404, Some(&body), "{}");
        assert!(err.to_string().contains("not found"));
    }
}
