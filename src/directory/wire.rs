//! Wire shapes of the `users.list` envelope. The payload is deserialized
//! once and converted to [`Member`] here; nothing downstream reads untyped
//! JSON.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::model::Member;
use crate::validation::trim_optional;

#[derive(Debug, Deserialize)]
pub struct UsersListResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub members: Vec<WireMember>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl UsersListResponse {
    /// Continuation cursor, if the page has one. The API signals the last
    /// page with an empty string rather than omitting the field.
    pub fn next_cursor(&self) -> Option<&str> {
        self.response_metadata
            .as_ref()
            .map(|m| m.next_cursor.trim())
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireMember {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub profile: WireProfile,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireProfile {
    #[serde(default)]
    pub real_name_normalized: Option<String>,
    #[serde(default)]
    pub display_name_normalized: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub skype: Option<String>,
    #[serde(default)]
    pub image_1024: Option<String>,
    #[serde(default)]
    pub image_512: Option<String>,
    #[serde(default)]
    pub image_192: Option<String>,
    #[serde(default)]
    pub is_custom_image: bool,
}

impl From<WireMember> for Member {
    fn from(wire: WireMember) -> Self {
        let profile = wire.profile;

        let mut handles = BTreeMap::new();
        if let Some(skype) = trim_optional(profile.skype.as_deref()) {
            handles.insert("skype".to_string(), skype);
        }

        // Stock avatars carry nothing worth embedding.
        let avatar_url = if profile.is_custom_image {
            trim_optional(profile.image_1024.as_deref())
                .or_else(|| trim_optional(profile.image_512.as_deref()))
                .or_else(|| trim_optional(profile.image_192.as_deref()))
        } else {
            None
        };

        Member {
            id: wire.id.trim().to_string(),
            username: wire.name.trim().to_string(),
            display_name: trim_optional(profile.display_name_normalized.as_deref()),
            real_name: trim_optional(profile.real_name_normalized.as_deref()),
            first_name: trim_optional(profile.first_name.as_deref()),
            last_name: trim_optional(profile.last_name.as_deref()),
            email: trim_optional(profile.email.as_deref()),
            phone: trim_optional(profile.phone.as_deref()),
            title: trim_optional(profile.title.as_deref()),
            avatar_url,
            handles,
            is_bot: wire.is_bot,
            deleted: wire.deleted,
        }
    }
}
