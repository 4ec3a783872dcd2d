//! Target URL validation, normalization and title derivation.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Normalizes an absolute URL to a canonical form.
///
/// # Normalization Rules
///
/// 1. **Protocol**: only HTTP and HTTPS are allowed
/// 2. **Hostname**: lowercased, must be present
/// 3. **Default ports**: removed (80 for HTTP, 443 for HTTPS)
/// 4. **Fragments**: kept, link-in-bio targets often anchor into a page
/// 5. **Path and query**: preserved as-is
///
/// Surrounding whitespace is trimmed before parsing.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed or relative URLs.
/// Returns [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url = Url::parse(input.trim())
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlNormalizationError::MissingHost)?
        .to_ascii_lowercase();

    url.set_host(Some(&host)).map_err(|_| {
        UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
    })?;

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to remove default port".to_string())
        })?;
    }

    Ok(url.to_string())
}

/// Derives a display title from a URL's host name.
///
/// Used when a link is created without an explicit title. Falls back to the
/// input itself when the URL cannot be parsed.
///
/// ```
/// use linkfolio::utils::url_normalizer::derive_title;
///
/// assert_eq!(derive_title("https://Docs.Rust-Lang.org/book/"), "docs.rust-lang.org");
/// ```
pub fn derive_title(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
        .unwrap_or_else(|| url.to_string())
}
