use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One workspace member, as validated at the fetch boundary. Optional
/// fields are blank-trimmed there, so `Some` always carries a non-empty
/// value and rendering never needs emptiness checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    /// Login name ("slackbot", "jane.doe"). May be empty for apps.
    pub username: String,
    pub display_name: Option<String>,
    pub real_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    /// Best available custom avatar image. None when the member only has a
    /// stock avatar.
    pub avatar_url: Option<String>,
    /// External-service handles keyed by service name (e.g. "skype").
    #[serde(default)]
    pub handles: BTreeMap<String, String>,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub deleted: bool,
}

impl Member {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            ..Default::default()
        }
    }

    /// Best human-readable name: real name, then display name, then login.
    pub fn best_name(&self) -> Option<&str> {
        self.real_name
            .as_deref()
            .or(self.display_name.as_deref())
            .or_else(|| (!self.username.is_empty()).then_some(self.username.as_str()))
    }

    /// Name used on the card and in the file name, falling back to the raw
    /// member id when no human-readable name exists.
    pub fn export_name(&self) -> Option<&str> {
        self.best_name()
            .or_else(|| (!self.id.is_empty()).then_some(self.id.as_str()))
    }

    /// The workspace's own bot account is not flagged `is_bot`.
    pub fn is_bot_account(&self) -> bool {
        self.is_bot || self.username == "slackbot"
    }
}
