//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers build a [`Response`] (or anything that converts into one) and
//! return it. The server turns it into a hyper response at the edge.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use tracing::{error, warn};

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content types this service emits.
pub enum ContentType {
    Json, // application/json
    Text, // text/plain; charset=utf-8
}

impl ContentType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain; charset=utf-8",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use crates_public::Response;
/// use http::StatusCode;
///
/// Response::json(br#"{"status":"ok"}"#.to_vec());
/// Response::text("hello");
/// Response::status(StatusCode::NO_CONTENT);
/// Response::not_found();
/// ```
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: StatusCode,
}

impl Response {
    /// `200 OK`, `application/json`.
    pub fn json(body: Vec<u8>) -> Self {
        Self::builder().json(body)
    }

    /// `200 OK`, `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: StatusCode) -> Self {
        Self { body: Vec::new(), headers: Vec::new(), status: code }
    }

    /// The one 404 this service sends.
    ///
    /// Blocked requests, unknown routes and failed required lookups all get
    /// byte-identical responses so a client cannot tell them apart.
    pub fn not_found() -> Self {
        Self::builder()
            .status(StatusCode::NOT_FOUND)
            .json(NOT_FOUND_BODY.to_vec())
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: StatusCode::OK }
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Converts into the hyper-facing response. Headers that are not valid
    /// HTTP are dropped with a warning rather than failing the response.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => warn!(header = %name, "dropping invalid response header"),
            }
        }
        response
    }
}

const NOT_FOUND_BODY: &[u8] =
    br#"{"title":"Not Found","message":"The page you are looking for does not exist"}"#;

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`.
/// Terminated by a typed body method.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: StatusCode,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: Vec<u8>) -> Response {
        self.bytes(ContentType::Json, body)
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.bytes(ContentType::Text, body.into().into_bytes())
    }

    /// Terminate with a typed body.
    pub fn bytes(self, content_type: ContentType, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.as_str().to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }

    /// Terminate with no body.
    pub fn no_body(self) -> Response {
        Response { body: Vec::new(), headers: self.headers, status: self.status }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Serialises the wrapped value as the JSON body of a `200 OK`.
///
/// ```rust
/// use crates_public::{IntoResponse, Json};
///
/// let response = Json(serde_json::json!({ "status": "ok" })).into_response();
/// assert_eq!(response.body(), br#"{"status":"ok"}"#);
/// ```
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => Response::json(bytes),
            Err(e) => {
                error!("failed to serialise response body: {e}");
                Response::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Lets handlers bail out early with `?`: the error side is already a response.
impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(ok) => ok.into_response(),
            Err(err) => err.into_response(),
        }
    }
}

/// A JSON body with a non-200 status.
impl<T: Serialize> IntoResponse for (StatusCode, Json<T>) {
    fn into_response(self) -> Response {
        let mut response = self.1.into_response();
        if response.status.is_success() {
            response.status = self.0;
        }
        response
    }
}
