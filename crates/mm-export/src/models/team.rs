use serde::{Deserialize, Serialize};

/// A team as returned by the Mattermost API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub create_at: i64, // milliseconds since epoch
    #[serde(default)]
    pub update_at: i64, // milliseconds since epoch
    #[serde(default)]
    pub delete_at: i64,
    #[serde(default)]
    pub display_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type", default)]
    pub team_type: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub allowed_domains: String,
    #[serde(default)]
    pub invite_id: String,
    #[serde(default)]
    pub allow_open_invite: bool,
}
