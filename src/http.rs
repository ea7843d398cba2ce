//! Services for communicating with APIs using HTTP.

use reqwest::{Client, ClientBuilder, Response, StatusCode, header};
use std::time::Duration;
use thiserror::Error;

/// A general service for making HTTP calls.
///
/// It might be a bit odd to refer to this trait as a "service", since
/// it appears to be more of a _client_ implementation, but think of
/// this as a proxy for a remote _service_ (even though a _client_ is used
/// to communicate with that remote service). A service might not always
/// be remote, such as when the implementation is a scripted service
/// used for testing.
pub trait HTTPService {
    /// Default HTTP client that can be used to make HTTP requests.
    fn client() -> Client {
        Self::client_builder()
            .build()
            // According to the docs, build() only fails if a TLS backend
            // cannot be initialized, or if DNS resolution cannot be
            // initialized, and both of these are unrecoverable for us.
            .expect("could not create a new HTTP client")
    }

    /// Default HTTP client with a whole-request timeout.
    fn client_with_timeout(timeout: Duration) -> Client {
        Self::client_builder()
            .timeout(timeout)
            .build()
            .expect("could not create a new HTTP client")
    }

    /// A client builder with the service's user agent already set.
    fn client_builder() -> ClientBuilder {
        ClientBuilder::new().user_agent(Self::user_agent())
    }

    /// An appropriate user agent to use when making HTTP requests.
    fn user_agent() -> String {
        format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// The request did not complete before its timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be sent or the connection failed.
    #[error("{0}")]
    Connection(String),

    /// An error retrieving the body of a response.
    #[error("Error retrieving body of HTTP response: {0}")]
    Body(#[source] reqwest::Error),

    /// The server is throttling requests.
    ///
    /// `reset` is the time, in seconds since the Unix epoch, at which the
    /// server says the limit resets, if it said so.
    #[error("Request returned HTTP 429 Too Many Requests")]
    RateLimited { reset: Option<i64> },

    /// An unsuccessful HTTP status code in an HTTP response.
    #[error("{status} - {body}")]
    Http { status: StatusCode, body: String },

    /// A missing Content-Type header in a response.
    #[error("Missing Content-Type header")]
    MissingContentType,

    /// An invalid Content-Type header.
    #[error("Invalid Content-Type header value: {0}")]
    InvalidContentType(#[from] header::ToStrError),

    /// A Content-Type that is not understood by the service.
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),
}

impl HTTPError {
    /// True if the error is worth retrying after a pause.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            HTTPError::Timeout | HTTPError::Connection(_) | HTTPError::RateLimited { .. }
        )
    }
}

impl From<reqwest::Error> for HTTPError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            HTTPError::Timeout
        } else {
            HTTPError::Connection(error.to_string())
        }
    }
}

/// Name of the header carrying the epoch second at which a rate limit resets.
pub const RATE_LIMIT_RESET: &str = "x-rate-limit-reset";

/// Turns a response into its body text, or into an error if the status is
/// not successful.
///
/// A 429 becomes [`HTTPError::RateLimited`] carrying the
/// [`x-rate-limit-reset`](RATE_LIMIT_RESET) header, if present. Any other
/// unsuccessful status becomes [`HTTPError::Http`] with the body included.
/// A timeout while the body is still arriving is an [`HTTPError::Timeout`].
pub async fn into_body(resp: Response) -> HTTPResult<String> {
    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let reset = resp
            .headers()
            .get(RATE_LIMIT_RESET)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok());
        return Err(HTTPError::RateLimited { reset });
    }

    let body = resp.text().await.map_err(|err| {
        if err.is_timeout() {
            HTTPError::Timeout
        } else {
            HTTPError::Body(err)
        }
    })?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(HTTPError::Http { status, body })
    }
}

/// Like [`into_body`], but also insists on a JSON content type.
pub async fn into_json_body(resp: Response) -> HTTPResult<String> {
    if resp.status().is_success() {
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .ok_or(HTTPError::MissingContentType)?
            .to_str()?;
        if !content_type.starts_with("application/json") {
            return Err(HTTPError::UnexpectedContentType(content_type.to_string()));
        }
    }
    into_body(resp).await
}
