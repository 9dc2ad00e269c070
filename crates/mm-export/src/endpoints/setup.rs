use reqwest::{Client as ReqwestClient, Response, header};

use crate::config::Connection;

/// Handle for talking to one Mattermost server: a shared HTTP client bound
/// to `scheme://url:port`, sending the bearer token on every request.
///
/// Construction does no network I/O and no validation; malformed connection
/// values surface as request failures.
pub struct ApiClient {
    http: ReqwestClient,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(connection: &Connection) -> Self {
        Self {
            http: ReqwestClient::new(),
            base_url: format!(
                "{}://{}:{}",
                connection.scheme, connection.url, connection.port
            ),
            token: connection.token.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.http
            .get(self.api_url(path))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_scheme_host_and_port() {
        let client = ApiClient::new(&Connection {
            url: "chat.example.com".to_string(),
            port: "8065".to_string(),
            scheme: "https".to_string(),
            token: "sekrit".to_string(),
        });
        assert_eq!(client.base_url(), "https://chat.example.com:8065");
        assert_eq!(
            client.api_url("/teams/name/engineering"),
            "https://chat.example.com:8065/api/v4/teams/name/engineering"
        );
    }
}
