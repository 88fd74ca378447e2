//! HTTP status classification shared by the remote providers.

use reqwest::StatusCode;

use docslide_core::Error;

/// Map a non-success provider response to an [`Error`].
///
/// Rate limits and server-side failures become [`Error::Transient`] so the
/// retry policy picks them up; authentication failures are configuration
/// errors; everything else is a plain provider error.
pub fn status_error(provider: &str, status: StatusCode, message: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::Config(format!(
            "[{}] authentication failed: {}",
            provider, message
        )),
        408 => Error::Transient(format!("[{}] request timeout: {}", provider, message)),
        429 => Error::Transient(format!("[{}] rate limit exceeded: {}", provider, message)),
        500..=599 => Error::Transient(format!(
            "[{}] server error {}: {}",
            provider,
            status.as_u16(),
            message
        )),
        _ => Error::Provider(format!(
            "[{}] returned {}: {}",
            provider,
            status.as_u16(),
            message
        )),
    }
}
