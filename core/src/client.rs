//! REST client: configuration, session ownership and request dispatch.
//!
//! # Design
//! `HttpClient` pairs an immutable `ClientConfig` with one owned `Session`.
//! Each call to `execute` is split into `build_request`, a pure function of
//! the config and the `RequestSpec` that produces an `HttpRequest`, and the
//! session's `perform`, which does the single blocking transfer. `execute`
//! takes `&mut self`, so one client never has two requests in flight.
//!
//! The session is released by `close` or on drop, whichever comes first.

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::config::{ClientConfig, ReturnFormat};
use crate::error::RestError;
use crate::http::{HttpMethod, HttpRequest, Params, ResponseResult};
use crate::session::Session;

/// One request as the caller describes it.
///
/// `method` is kept as the caller's string and validated when the request
/// is built, so unknown methods surface as `RestError::InvalidMethod`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: String,
    pub path: String,
    pub params: Option<Params>,
    pub headers: Vec<(String, String)>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RequestSpec {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Append one field, replacing any scalar parameter.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let pair = (name.into(), value.into());
        match &mut self.params {
            Some(Params::Fields(fields)) => fields.push(pair),
            _ => self.params = Some(Params::Fields(vec![pair])),
        }
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Collects construction inputs for `HttpClient`.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: String,
    return_format: Option<String>,
    user_agent: Option<String>,
    options: Map<String, Value>,
}

impl ClientBuilder {
    pub fn return_format(mut self, format: impl Into<String>) -> Self {
        self.return_format = Some(format.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the whole options mapping.
    pub fn options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, RestError> {
        let config = ClientConfig::new(
            &self.url,
            self.return_format.as_deref(),
            self.user_agent.as_deref(),
            &self.options,
        )?;
        HttpClient::open(config)
    }
}

/// Synchronous REST client owning one transfer session.
#[derive(Debug)]
pub struct HttpClient {
    config: ClientConfig,
    session: Option<Session>,
}

impl HttpClient {
    /// Client with the default return format, user agent and options.
    pub fn new(url: &str) -> Result<Self, RestError> {
        Self::builder(url).build()
    }

    pub fn builder(url: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            url: url.into(),
            return_format: None,
            user_agent: None,
            options: Map::new(),
        }
    }

    fn open(config: ClientConfig) -> Result<Self, RestError> {
        let mut client = Self {
            session: Some(Session::open(config.verbose)),
            config,
        };
        let user_agent = client.config.user_agent.clone();
        client.set_user_agent(&user_agent)?;
        client.set_return_format(client.config.return_format)?;
        Ok(client)
    }

    fn session_mut(&mut self) -> Result<&mut Session, RestError> {
        self.session.as_mut().ok_or(RestError::SessionNotInitialized)
    }

    fn set_user_agent(&mut self, user_agent: &str) -> Result<(), RestError> {
        self.session_mut()?.set_user_agent(user_agent);
        self.config.user_agent = user_agent.to_string();
        Ok(())
    }

    fn set_return_format(&mut self, format: ReturnFormat) -> Result<(), RestError> {
        self.session_mut()?;
        self.config.return_format = format;
        Ok(())
    }

    /// Validate `spec` and turn it into a request against this client's base URL.
    ///
    /// Non-empty fields are appended as a query string for every method, in
    /// addition to being sent as form fields for DELETE, POST and PUT.
    pub fn build_request(&self, spec: &RequestSpec) -> Result<HttpRequest, RestError> {
        let method: HttpMethod = spec.method.parse()?;
        if spec.path.trim().is_empty() {
            return Err(RestError::MissingPath);
        }

        let body = match method {
            HttpMethod::Get => None,
            HttpMethod::Delete | HttpMethod::Post | HttpMethod::Put => {
                spec.params.as_ref().and_then(Params::to_body)
            }
        };

        let credentials = match (&spec.username, &spec.password) {
            (Some(user), Some(pass)) => Some(format!("{user}:{pass}")),
            _ => None,
        };

        let headers = (!spec.headers.is_empty()).then(|| spec.headers.clone());

        let mut url = format!("{}{}", self.config.base_url, spec.path);
        if let Some(fields) = spec.params.as_ref().and_then(Params::query_fields) {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(fields)
                .finish();
            url.push('?');
            url.push_str(&query);
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            credentials,
            body,
        })
    }

    /// Send one request and wait for the whole response.
    ///
    /// Non-2xx statuses are returned in `ResponseResult::http_code`, not as
    /// errors. Transport failures come back as `RestError::Transport`.
    pub fn execute(&mut self, spec: &RequestSpec) -> Result<ResponseResult, RestError> {
        if self.session.is_none() {
            return Err(RestError::SessionNotInitialized);
        }
        let request = self.build_request(spec)?;
        self.session_mut()?.perform(&request)
    }

    /// Release the session. Later calls to `execute` fail with
    /// `RestError::SessionNotInitialized`. Calling this twice is a no-op.
    pub fn close(&mut self) {
        self.session.take();
    }

    pub fn is_session_initialized(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_verbose(&self) -> bool {
        self.config.verbose
    }

    pub fn url(&self) -> &str {
        &self.config.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    pub fn return_format(&self) -> ReturnFormat {
        self.config.return_format
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

impl Drop for HttpClient {
    fn drop(&mut self) {
        self.close();
    }
}
