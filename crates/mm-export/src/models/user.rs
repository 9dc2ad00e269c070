use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user as returned by the Mattermost API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiUser {
    pub id: String,
    #[serde(default)]
    pub create_at: i64, // milliseconds since epoch
    #[serde(default)]
    pub update_at: i64, // milliseconds since epoch
    #[serde(default)]
    pub delete_at: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub auth_service: String,
    #[serde(default)]
    pub roles: String,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub is_bot: bool, // omitted by the server for regular accounts
}

/// One row of the export, projected from an [`ApiUser`].
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub is_bot_account: bool,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub days_since_last_activity: i64,
    pub team_name: String,
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}

impl UserRecord {
    /// Projects an API user onto an export row. `last_activity_at` is the
    /// server-side update timestamp; the day count is whole elapsed hours
    /// against `now`, divided by 24.
    pub fn from_api(user: &ApiUser, now: DateTime<Utc>) -> Self {
        let created_at = from_millis(user.create_at);
        let last_activity_at = from_millis(user.update_at);
        let days_since_last_activity = (now - last_activity_at).num_hours() / 24;
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            nickname: user.nickname.clone(),
            is_bot_account: user.is_bot,
            created_at,
            last_activity_at,
            days_since_last_activity,
            team_name: String::new(),
        }
    }
}
