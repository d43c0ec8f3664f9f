//! Destination URL checks for new short links.

use url::Url;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlCheckError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Accepts absolute `http`/`https` URLs with a host.
///
/// Returns the input with surrounding whitespace removed; the URL is otherwise
/// stored exactly as supplied.
pub fn check_url(input: &str) -> Result<String, UrlCheckError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed).map_err(|e| UrlCheckError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlCheckError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlCheckError::MissingHost);
    }

    Ok(trimmed.to_string())
}
