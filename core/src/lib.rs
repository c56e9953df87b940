//! Synchronous REST client over a single transfer session.
//!
//! # Overview
//! `HttpClient` sends DELETE, GET, POST and PUT requests to paths under one
//! base URL, with optional form parameters, extra headers and HTTP Basic
//! credentials. Each response comes back as raw header text, raw body text
//! and the numeric status code. Transfers are delegated to `ureq`.
//!
//! # Design
//! - `ClientConfig` is validated once at construction and never changes.
//! - `Session` owns the `ureq::Agent` and is released on `close` or drop.
//! - `HttpClient::build_request` is pure, so URL and body construction can be
//!   checked without a network; `execute` adds the one blocking transfer.
//! - Non-2xx statuses are data, not errors.
//!
//! ```no_run
//! use rest_client::{HttpClient, RequestSpec};
//!
//! let mut client = HttpClient::new("http://search.example.com")?;
//! let spec = RequestSpec::new("GET", "/search.json").field("q", "@foxfooty");
//! let response = client.execute(&spec)?;
//! println!("{} {}", response.http_code, response.body);
//! # Ok::<(), rest_client::RestError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use client::{ClientBuilder, HttpClient, RequestSpec};
pub use config::{ClientConfig, ClientOptions, ReturnFormat, DEFAULT_USER_AGENT};
pub use error::RestError;
pub use http::{
    split_response, HttpMethod, HttpRequest, Params, RequestBody, ResponseResult, TransferInfo,
    VerboseDetail,
};
pub use session::Session;
