//! The transfer session: one `ureq::Agent` plus the state that sticks to it.
//!
//! # Design
//! A `Session` is owned by exactly one `HttpClient` and lives until the
//! client is closed or dropped. Like a long-lived transfer handle, it keeps
//! the extra headers and Basic credentials from earlier requests until a
//! later request replaces them; bodies are recomputed on every call.
//!
//! `ureq` does not expose the raw header bytes, so the header block is
//! rebuilt from the parsed response with CRLF line endings. Its byte length is
//! the header size used to split the raw response.

use std::fmt;
use std::time::Instant;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder, ResponseExt};

use crate::error::RestError;
use crate::http::{
    split_response, HttpMethod, HttpRequest, RequestBody, ResponseResult, TransferInfo,
    VerboseDetail,
};

const MAX_REDIRECTS: u32 = 10;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub struct Session {
    agent: Agent,
    user_agent: String,
    headers: Vec<(String, String)>,
    credentials: Option<String>,
    verbose: bool,
}

impl Session {
    /// Open a session that follows redirects and returns every status as data.
    pub fn open(verbose: bool) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(MAX_REDIRECTS)
            .build()
            .new_agent();

        tracing::debug!(verbose, "opened transfer session");
        Self {
            agent,
            user_agent: String::new(),
            headers: Vec::new(),
            credentials: None,
            verbose,
        }
    }

    pub fn set_user_agent(&mut self, user_agent: &str) {
        self.user_agent = user_agent.to_string();
    }

    /// Headers currently attached to every request.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn credentials(&self) -> Option<&str> {
        self.credentials.as_deref()
    }

    /// Run `request` to completion and split what came back.
    pub fn perform(&mut self, request: &HttpRequest) -> Result<ResponseResult, RestError> {
        if let Some(headers) = &request.headers {
            self.headers = headers.clone();
        }
        if let Some(credentials) = &request.credentials {
            self.credentials = Some(credentials.clone());
        }

        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        if self.verbose {
            self.trace_request(request);
        }

        let started = Instant::now();
        let mut response = self.send(request)?;
        let header_text = header_block(&response);
        let effective_url = response.get_uri().to_string();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let http_code = response.status().as_u16();
        // Bodies are data here: no size cap and no UTF-8 requirement.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;
        let total_time = started.elapsed().as_secs_f64();

        let header_size = header_text.len();
        let size_download = body.len();
        let mut raw = header_text.into_bytes();
        raw.extend_from_slice(&body);
        let (header, body) = split_response(&raw, header_size);

        tracing::debug!(http_code, header_size, size_download, "received response");
        if self.verbose {
            tracing::debug!(target: "rest_client::wire", "< {}", header.trim_end());
        }

        let verbose = self.verbose.then(|| VerboseDetail {
            response: String::from_utf8_lossy(&raw).into_owned(),
            info: TransferInfo {
                url: effective_url,
                content_type,
                http_code,
                header_size,
                size_download,
                total_time,
            },
        });

        Ok(ResponseResult {
            header,
            body,
            http_code,
            verbose,
        })
    }

    fn send(&self, request: &HttpRequest) -> Result<Response<Body>, ureq::Error> {
        let url = request.url.as_str();
        let body = request.body.as_ref();
        match request.method {
            HttpMethod::Get => self.prepare(self.agent.get(url)).call(),
            HttpMethod::Delete => {
                let builder = self.prepare(self.agent.delete(url));
                match body {
                    Some(body) => send_body(builder.force_send_body(), body),
                    None => builder.call(),
                }
            }
            HttpMethod::Post => {
                let builder = self.prepare(self.agent.post(url));
                match body {
                    Some(body) => send_body(builder, body),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = self.prepare(self.agent.put(url));
                match body {
                    Some(body) => send_body(builder, body),
                    None => builder.send_empty(),
                }
            }
        }
    }

    /// Attach the session-level headers: user agent, Basic auth, extra headers.
    /// An extra `User-Agent` header replaces the configured one.
    fn prepare<B>(&self, mut builder: RequestBuilder<B>) -> RequestBuilder<B> {
        if !self.user_agent_overridden() {
            builder = builder.header("user-agent", self.user_agent.as_str());
        }
        if let Some(credentials) = &self.credentials {
            let value = format!("Basic {}", STANDARD.encode(credentials));
            builder = builder.header("authorization", value);
        }
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    fn user_agent_overridden(&self) -> bool {
        self.headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("user-agent"))
    }

    fn trace_request(&self, request: &HttpRequest) {
        tracing::debug!(target: "rest_client::wire", "> {} {}", request.method, request.url);
        if !self.user_agent_overridden() {
            tracing::debug!(target: "rest_client::wire", "> user-agent: {}", self.user_agent);
        }
        if self.credentials.is_some() {
            tracing::debug!(target: "rest_client::wire", "> authorization: Basic [redacted]");
        }
        for (name, value) in &self.headers {
            tracing::debug!(target: "rest_client::wire", "> {name}: {value}");
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_agent", &self.user_agent)
            .field("headers", &self.headers)
            .field("has_credentials", &self.credentials.is_some())
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        tracing::debug!("released transfer session");
    }
}

fn send_body(
    builder: RequestBuilder<ureq::typestate::WithBody>,
    body: &RequestBody,
) -> Result<Response<Body>, ureq::Error> {
    match body {
        RequestBody::Form(fields) => {
            builder.send_form(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        }
        RequestBody::Raw(raw) => builder.content_type(FORM_CONTENT_TYPE).send(raw.as_bytes()),
    }
}

/// Status line and headers, CRLF terminated, ending with the blank line.
fn header_block(response: &Response<Body>) -> String {
    let status = response.status();
    let mut block = format!(
        "{:?} {} {}\r\n",
        response.version(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    );
    for (name, value) in response.headers() {
        block.push_str(name.as_str());
        block.push_str(": ");
        block.push_str(&String::from_utf8_lossy(value.as_bytes()));
        block.push_str("\r\n");
    }
    block.push_str("\r\n");
    block
}
