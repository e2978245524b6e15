//! Pronoun fetchers.
//!
//! [`PronounFetcher`] is the seam between the resolver cache and the network.
//! [`HttpPronounFetcher`] talks to the public pronoun API; tests substitute
//! in-memory fetchers.

use serde::Deserialize;
use ureq::Agent;

use crate::error::PronounError;
use crate::http;

/// Blocking lookup of the pronoun display string for a lowercased login.
///
/// Returns `Ok(None)` when the author has no pronoun set. Implementations are
/// called from background threads, never from the message render path.
pub trait PronounFetcher: Send + Sync {
    fn fetch(&self, login: &str) -> Result<Option<String>, PronounError>;
}

/// One entry of the `/users/{login}` response.
#[derive(Debug, Deserialize)]
struct UserPronoun {
    pronoun_id: String,
}

/// Map a pronoun id from the API to its display string.
///
/// Unknown ids are returned unchanged so new pronoun sets still render.
pub fn display_for_id(id: &str) -> String {
    let display = match id {
        "aeaer" => "Ae/Aer",
        "any" => "Any",
        "eem" => "E/Em",
        "faefaer" => "Fae/Faer",
        "hehim" => "He/Him",
        "heshe" => "He/She",
        "hethem" => "He/They",
        "itits" => "It/Its",
        "other" => "Other",
        "perper" => "Per/Per",
        "sheher" => "She/Her",
        "shethem" => "She/They",
        "theythem" => "They/Them",
        "vever" => "Ve/Ver",
        "xexem" => "Xe/Xem",
        "ziehir" => "Zie/Hir",
        other => return other.to_string(),
    };
    display.to_string()
}

/// Fetches pronouns over HTTPS from the pronoun API.
pub struct HttpPronounFetcher {
    base_url: String,
    agent: Agent,
}

impl HttpPronounFetcher {
    /// Create a fetcher for the API rooted at `base_url` (e.g. `https://pronouns.alejo.io/api`).
    ///
    /// # Errors
    /// Returns [`PronounError::InvalidUrl`] if the base URL fails validation.
    pub fn new(base_url: &str) -> Result<Self, PronounError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        http::validate_api_url(&base_url)?;
        Ok(Self {
            base_url,
            agent: http::agent(),
        })
    }

    /// `{base}/users/{login}` with the login percent-encoded as a single path segment.
    fn user_url(&self, login: &str) -> String {
        let Ok(mut url) = url::Url::parse(&self.base_url) else {
            return format!("{}/users/{}", self.base_url, login);
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users").push(login);
        }
        url.to_string()
    }
}

impl PronounFetcher for HttpPronounFetcher {
    fn fetch(&self, login: &str) -> Result<Option<String>, PronounError> {
        let body = http::get_text(&self.agent, &self.user_url(login))?;
        parse_user_response(&body)
    }
}

/// Parse a `/users/{login}` response body into a display string.
pub(crate) fn parse_user_response(body: &str) -> Result<Option<String>, PronounError> {
    let entries: Vec<UserPronoun> = serde_json::from_str(body)?;
    Ok(entries
        .first()
        .map(|entry| display_for_id(&entry.pronoun_id)))
}
