use std::future::Future;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use tracing::{debug, error};

use super::setup::ApiClient;
use super::teams::team_by_name;
use crate::models::{ApiUser, UserRecord};

/// Number of users requested per page when listing users.
pub const PAGE_SIZE: usize = 60;

/// Fetch every user that belongs to no team, projected onto export rows.
/// Bot accounts are dropped unless `include_bots` is set.
pub async fn users_without_team(
    client: &ApiClient,
    include_bots: bool,
) -> Result<Vec<UserRecord>> {
    debug!("fetching users without a team");
    let all_users = fetch_all_pages(|page| user_page(client, "without_team=1", page)).await?;
    Ok(project_users(&all_users, include_bots, Utc::now()))
}

/// Fetch every member of the named team, projected onto export rows.
/// The name is resolved to a team ID first; the lookup failing aborts the
/// whole retrieval.
pub async fn users_in_team(
    client: &ApiClient,
    team_name: &str,
    include_bots: bool,
) -> Result<Vec<UserRecord>> {
    debug!("fetching users in team: {team_name}");
    let team = team_by_name(client, team_name).await?;
    let scope = format!("in_team={}", team.id);
    let all_users = fetch_all_pages(|page| user_page(client, &scope, page)).await?;
    Ok(project_users(&all_users, include_bots, Utc::now()))
}

/// One page of the user listing, scoped by `scope` (`without_team=1` or
/// `in_team={id}`). Anything other than HTTP 200 is an error.
async fn user_page(client: &ApiClient, scope: &str, page: usize) -> Result<Vec<ApiUser>> {
    let response = client
        .get(&format!("/users?{scope}&page={page}&per_page={PAGE_SIZE}"))
        .await?;
    let status = response.status();
    if status != StatusCode::OK {
        error!("bad HTTP response from user listing (page {page}): {status}");
        bail!("failed to retrieve data from Mattermost");
    }
    Ok(response.json().await?)
}

/// Accumulates pages from `fetch_page`, starting at page 0, until a page
/// comes back with fewer than [`PAGE_SIZE`] records. The short page's
/// records are kept; a listing whose size is an exact multiple of the page
/// size therefore costs one extra trailing fetch that returns empty. The
/// first error abandons everything accumulated so far.
async fn fetch_all_pages<F, Fut>(mut fetch_page: F) -> Result<Vec<ApiUser>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<ApiUser>>>,
{
    let mut all_users = Vec::new();
    let mut page = 0;
    loop {
        let users = fetch_page(page).await?;
        let last = users.len() < PAGE_SIZE;
        all_users.extend(users);
        if last {
            break;
        }
        page += 1;
    }
    Ok(all_users)
}

fn project_users(users: &[ApiUser], include_bots: bool, now: DateTime<Utc>) -> Vec<UserRecord> {
    users
        .iter()
        .filter(|user| include_bots || !user.is_bot)
        .map(|user| UserRecord::from_api(user, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn test_user(i: usize) -> ApiUser {
        ApiUser {
            id: format!("id-{i}"),
            create_at: 1_600_000_000_000,
            update_at: 1_650_000_000_000,
            delete_at: 0,
            username: format!("user{i}"),
            first_name: String::new(),
            last_name: String::new(),
            nickname: String::new(),
            email: format!("user{i}@example.com"),
            auth_service: String::new(),
            roles: "system_user".to_string(),
            locale: "en".to_string(),
            is_bot: false,
        }
    }

    fn bot_user(i: usize) -> ApiUser {
        ApiUser {
            is_bot: true,
            ..test_user(i)
        }
    }

    #[tokio::test]
    async fn short_page_ends_the_listing() {
        // 65 users at page size 60: a full page then a short one.
        let calls = Cell::new(0);
        let users = fetch_all_pages(|page| {
            calls.set(calls.get() + 1);
            let users: Vec<ApiUser> = if page == 0 {
                (0..PAGE_SIZE).map(test_user).collect()
            } else {
                (PAGE_SIZE..PAGE_SIZE + 5).map(test_user).collect()
            };
            async move { Ok(users) }
        })
        .await
        .unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(users.len(), PAGE_SIZE + 5);
        assert_eq!(users[0].username, "user0");
        assert_eq!(users[PAGE_SIZE + 4].username, "user64");
    }

    #[tokio::test]
    async fn exact_multiple_costs_one_trailing_fetch() {
        // 120 users: two full pages, then an empty page ends the loop.
        let calls = Cell::new(0);
        let users = fetch_all_pages(|page| {
            calls.set(calls.get() + 1);
            let users: Vec<ApiUser> = if page < 2 {
                (page * PAGE_SIZE..(page + 1) * PAGE_SIZE).map(test_user).collect()
            } else {
                Vec::new()
            };
            async move { Ok(users) }
        })
        .await
        .unwrap();
        assert_eq!(calls.get(), 3);
        assert_eq!(users.len(), 2 * PAGE_SIZE);
    }

    #[tokio::test]
    async fn page_error_discards_accumulated_results() {
        let result = fetch_all_pages(|page| async move {
            if page == 1 {
                bail!("failed to retrieve data from Mattermost");
            }
            let users: Vec<ApiUser> = (0..PAGE_SIZE).map(test_user).collect();
            Ok(users)
        })
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn bots_are_dropped_unless_included() {
        let users = vec![test_user(0), bot_user(1), test_user(2)];
        let now = Utc::now();

        let records = project_users(&users, false, now);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| !r.is_bot_account));

        let records = project_users(&users, true, now);
        assert_eq!(records.len(), 3);
        assert!(records.iter().any(|r| r.is_bot_account));
    }

    #[test]
    fn projection_preserves_retrieval_order() {
        let users: Vec<ApiUser> = (0..5).map(test_user).collect();
        let records = project_users(&users, false, Utc::now());
        let usernames: Vec<&str> = records.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(usernames, ["user0", "user1", "user2", "user3", "user4"]);
    }
}
