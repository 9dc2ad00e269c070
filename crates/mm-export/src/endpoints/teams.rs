use anyhow::{Result, bail};
use reqwest::StatusCode;
use tracing::{debug, error};
use urlencoding::encode;

use super::setup::ApiClient;
use crate::models::Team;

/// Resolve a team by its exact name. Anything other than HTTP 200 is an
/// error; a missing team is not distinguished from a transport failure.
pub async fn team_by_name(client: &ApiClient, name: &str) -> Result<Team> {
    debug!("looking up team: {name}");
    let response = client.get(&format!("/teams/name/{}", encode(name))).await?;
    let status = response.status();
    if status != StatusCode::OK {
        error!("bad HTTP response from team lookup for '{name}': {status}");
        bail!("failed to retrieve data from Mattermost");
    }
    Ok(response.json::<Team>().await?)
}
