//! HTTP client helper with native-tls support.

use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

use crate::error::PronounError;

/// Global timeout for a single pronoun lookup.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum response body size for pronoun API responses (64 KB).
pub const MAX_API_RESPONSE_SIZE: u64 = 64 * 1024;

/// Hostnames the pronoun fetcher may talk to.
const ALLOWED_HOSTS: &[&str] = &["pronouns.alejo.io", "api.pronouns.alejo.io"];

/// Validate that a URL is safe to use for pronoun lookups.
///
/// Enforces:
/// - HTTPS scheme only
/// - Host must be in the pronoun service allowlist
pub fn validate_api_url(url: &str) -> Result<(), PronounError> {
    let parsed =
        url::Url::parse(url).map_err(|e| PronounError::InvalidUrl(format!("'{url}': {e}")))?;

    match parsed.scheme() {
        "https" => {}
        scheme => {
            return Err(PronounError::InvalidUrl(format!(
                "insecure scheme '{scheme}' rejected; only HTTPS is allowed. URL: {url}"
            )));
        }
    }

    let host = parsed.host_str().unwrap_or("");
    if !ALLOWED_HOSTS.contains(&host) {
        return Err(PronounError::InvalidUrl(format!(
            "host '{}' is not allowed. Allowed hosts: {}. URL: {}",
            host,
            ALLOWED_HOSTS.join(", "),
            url
        )));
    }

    Ok(())
}

/// Create a new HTTP agent configured with native-tls and a global timeout.
pub fn agent() -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(HTTP_TIMEOUT))
        .build()
        .into()
}

/// GET `url` and return the body as a string, capped at [`MAX_API_RESPONSE_SIZE`].
pub fn get_text(agent: &Agent, url: &str) -> Result<String, PronounError> {
    validate_api_url(url)?;

    agent
        .get(url)
        .header("User-Agent", "chat-overlay")
        .header("Accept", "application/json")
        .call()
        .map_err(|e| PronounError::Http(format!("'{url}': {e}")))?
        .into_body()
        .with_config()
        .limit(MAX_API_RESPONSE_SIZE)
        .read_to_string()
        .map_err(|e| PronounError::Body(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_allowlisted_https() {
        assert!(validate_api_url("https://pronouns.alejo.io/api/users/someone").is_ok());
    }

    #[test]
    fn test_validate_rejects_http() {
        let err = validate_api_url("http://pronouns.alejo.io/api/users/someone").unwrap_err();
        assert!(err.to_string().contains("insecure scheme"));
    }

    #[test]
    fn test_validate_rejects_other_hosts() {
        let err = validate_api_url("https://example.com/api/users/someone").unwrap_err();
        assert!(matches!(err, PronounError::InvalidUrl(_)));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        assert!(validate_api_url("not a url").is_err());
    }
}
