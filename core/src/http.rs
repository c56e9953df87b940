//! HTTP transport types for the REST client.
//!
//! # Design
//! These types describe requests and responses as plain data. `HttpClient`
//! builds an `HttpRequest` without touching the network, the `Session` turns
//! it into one `ureq` call, and the raw transfer is split back into a
//! `ResponseResult`. Keeping the build and split steps pure makes URL
//! construction and header/body separation testable without a server.
//!
//! All fields use owned types (`String`, `Vec`) so results can outlive the
//! client that produced them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::RestError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Delete,
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// Exact, case-sensitive match: `"get"` is rejected.
impl FromStr for HttpMethod {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DELETE" => Ok(HttpMethod::Delete),
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            other => Err(RestError::InvalidMethod(other.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters sent with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    /// Ordered name/value pairs. Sent as form fields and as a query string.
    Fields(Vec<(String, String)>),
    /// A single value, sent as the body prefixed with `@`.
    Scalar(String),
}

impl Params {
    /// Fields to append as a query string, if any.
    pub fn query_fields(&self) -> Option<&[(String, String)]> {
        match self {
            Params::Fields(fields) if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }

    /// Body to attach for methods that carry one.
    pub fn to_body(&self) -> Option<RequestBody> {
        match self {
            Params::Fields(fields) if fields.is_empty() => None,
            Params::Fields(fields) => Some(RequestBody::Form(fields.clone())),
            Params::Scalar(value) => Some(RequestBody::Raw(format!("@{value}"))),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params::Fields(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Body attached to an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Sent as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    Raw(String),
}

/// An HTTP request described as plain data.
///
/// Built by `HttpClient::build_request`. `headers` and `credentials` are
/// `None` when the request leaves whatever the session already carries in
/// place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Option<Vec<(String, String)>>,
    /// `"username:password"` for HTTP Basic authentication.
    pub credentials: Option<String>,
    pub body: Option<RequestBody>,
}

/// Diagnostic details about one transfer, kept only in verbose mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferInfo {
    /// Effective URL after redirects.
    pub url: String,
    pub content_type: Option<String>,
    pub http_code: u16,
    pub header_size: usize,
    pub size_download: usize,
    /// Seconds from send to the last body byte.
    pub total_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerboseDetail {
    /// Header text and body exactly as received, unsplit.
    pub response: String,
    pub info: TransferInfo,
}

/// Result of `HttpClient::execute`.
///
/// Serializes as `{header, body, http_code}` with a `verbose` object only
/// when the client runs in verbose mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseResult {
    pub header: String,
    pub body: String,
    pub http_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<VerboseDetail>,
}

impl ResponseResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_code)
    }
}

/// Split a raw response into header text (the first `header_size` bytes)
/// and body text (the rest). A size past the end yields an empty body.
/// Invalid UTF-8 is replaced, never rejected.
pub fn split_response(raw: &[u8], header_size: usize) -> (String, String) {
    let (header, body) = raw.split_at(header_size.min(raw.len()));
    (
        String::from_utf8_lossy(header).into_owned(),
        String::from_utf8_lossy(body).into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parse_is_exact() {
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert_eq!("PUT".parse::<HttpMethod>().unwrap(), HttpMethod::Put);
        for bad in ["PATCH", "", "get", " GET", "HEAD"] {
            let err = bad.parse::<HttpMethod>().unwrap_err();
            assert!(matches!(err, RestError::InvalidMethod(ref v) if v == bad), "{bad:?}");
        }
    }

    #[test]
    fn split_uses_reported_header_size() {
        let raw = "HTTP/1.1 200 OK\r\n\r\n{\"ok\":true}";
        let (header, body) = split_response(raw.as_bytes(), 19);
        assert_eq!(header, &raw[..19]);
        assert_eq!(body, r#"{"ok":true}"#);
    }

    #[test]
    fn split_past_end_gives_empty_body() {
        let (header, body) = split_response(b"HTTP/1.1 204 No Content\r\n\r\n", 500);
        assert_eq!(header, "HTTP/1.1 204 No Content\r\n\r\n");
        assert!(body.is_empty());
    }

    #[test]
    fn split_tolerates_binary_body() {
        let mut raw = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0xff, 0xfe, 0x00, b'P']);
        let (header, body) = split_response(&raw, 19);
        assert_eq!(header, "HTTP/1.1 200 OK\r\n\r\n");
        assert_eq!(body, "\u{fffd}\u{fffd}\u{0}P");
    }

    #[test]
    fn scalar_params_become_at_prefixed_body() {
        let params = Params::Scalar("upload.txt".to_string());
        assert_eq!(params.to_body(), Some(RequestBody::Raw("@upload.txt".to_string())));
        assert!(params.query_fields().is_none());
    }

    #[test]
    fn empty_fields_clear_the_body() {
        let params = Params::Fields(Vec::new());
        assert!(params.to_body().is_none());
        assert!(params.query_fields().is_none());
    }

    #[test]
    fn fields_keep_insertion_order() {
        let params: Params = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(
            params.to_body(),
            Some(RequestBody::Form(vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
            ]))
        );
    }

    #[test]
    fn verbose_key_omitted_when_absent() {
        let result = ResponseResult {
            header: "HTTP/1.1 404 Not Found\r\n\r\n".to_string(),
            body: String::new(),
            http_code: 404,
            verbose: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["http_code"], 404);
        assert!(json.get("verbose").is_none());
        assert!(!result.is_success());
    }
}
