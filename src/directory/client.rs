//! Synchronous client for the workspace directory API.

use std::io::Read;
use std::time::Duration;

use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::model::Member;

use super::wire::UsersListResponse;

pub const DEFAULT_API_URL: &str = "https://slack.com/api";

const PAGE_LIMIT: u32 = 200;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_AVATAR_BYTES: u64 = 10 * 1024 * 1024;

/// Stock avatars served for members who never uploaded a picture.
const DEFAULT_AVATAR_MARKER: &str = "/a.slack-edge.com/df10d/img/avatars/ava_";

/// Envelope codes that mean the credential itself is bad or expired.
const AUTH_ERRORS: &[&str] = &[
    "invalid_auth",
    "not_authed",
    "account_inactive",
    "token_revoked",
    "token_expired",
];

pub struct DirectoryClient {
    api_url: String,
    token: String,
}

impl DirectoryClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: token.into(),
        }
    }

    /// The full roster visible to the credential, concatenated across every
    /// pagination cursor in the order the API returns it. A failure on any
    /// page aborts the whole fetch; there is no partial result.
    pub fn list_members(&self) -> ExportResult<Vec<Member>> {
        drain_pages(|cursor| self.fetch_page(cursor))
    }

    fn fetch_page(&self, cursor: Option<&str>) -> ExportResult<UsersListResponse> {
        let url = format!("{}/users.list", self.api_url);
        let mut request = ureq::get(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .timeout(REQUEST_TIMEOUT)
            .query("limit", &PAGE_LIMIT.to_string());
        if let Some(cursor) = cursor {
            request = request.query("cursor", cursor);
        }

        let response = request.call().map_err(map_http_error)?;
        let page: UsersListResponse = response.into_json().map_err(|e| ExportError::Transport {
            message: format!("unreadable response body: {}", e),
        })?;
        check_envelope(page)
    }

    /// Download one avatar image. `Ok(None)` means the URL (or its redirect
    /// target) is a stock avatar and the card should go without a photo.
    pub fn fetch_avatar(&self, url: &str) -> ExportResult<Option<Vec<u8>>> {
        if url.contains(DEFAULT_AVATAR_MARKER) {
            return Ok(None);
        }
        let response = ureq::get(url)
            .timeout(REQUEST_TIMEOUT)
            .call()
            .map_err(map_http_error)?;
        if response.get_url().contains(DEFAULT_AVATAR_MARKER) {
            return Ok(None);
        }
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_AVATAR_BYTES)
            .read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }
}

/// The API reports most failures inside a 200 response, as `ok: false`
/// plus an error code.
fn check_envelope(page: UsersListResponse) -> ExportResult<UsersListResponse> {
    if page.ok {
        return Ok(page);
    }
    let code = page.error.unwrap_or_else(|| "unknown_error".to_string());
    if AUTH_ERRORS.contains(&code.as_str()) {
        Err(ExportError::Auth { reason: code })
    } else if code == "ratelimited" {
        Err(ExportError::RateLimited {
            retry_after_secs: None,
        })
    } else {
        Err(ExportError::Api { code })
    }
}

fn map_http_error(e: ureq::Error) -> ExportError {
    match e {
        ureq::Error::Status(code, response) => match code {
            401 | 403 => ExportError::Auth {
                reason: format!("HTTP {}", code),
            },
            429 => ExportError::RateLimited {
                retry_after_secs: response
                    .header("retry-after")
                    .and_then(|v| v.parse().ok()),
            },
            _ => ExportError::Api {
                code: format!("http_{}", code),
            },
        },
        ureq::Error::Transport(t) => ExportError::Transport {
            message: t.to_string(),
        },
    }
}

/// Follow pagination cursors until exhausted, concatenating members in the
/// order received. Page fetching is injected so the loop can be exercised
/// without a network.
fn drain_pages<F>(mut fetch_page: F) -> ExportResult<Vec<Member>>
where
    F: FnMut(Option<&str>) -> ExportResult<UsersListResponse>,
{
    let mut members: Vec<Member> = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = fetch_page(cursor.as_deref())?;
        let next = page.next_cursor().map(str::to_string);
        debug!(count = page.members.len(), more = next.is_some(), "fetched directory page");
        members.extend(page.members.into_iter().map(Member::from));
        match next {
            Some(c) => cursor = Some(c),
            None => break,
        }
    }
    Ok(members)
}
