use crate::cli::Cli;

pub const DEFAULT_PORT: &str = "8065";
pub const DEFAULT_SCHEME: &str = "http";

/// Where and how to reach the Mattermost server.
#[derive(Debug, Clone)]
pub struct Connection {
    pub url: String,
    pub port: String,
    pub scheme: String,
    pub token: String,
}

/// Resolved runtime configuration: command line flags with environment
/// variable fallbacks and defaults applied.
#[derive(Debug, Clone)]
pub struct Config {
    pub connection: Connection,
    pub team: Option<String>,
    pub not_in_team: bool,
    pub include_bots: bool,
    pub file: String,
    pub debug: bool,
}

/// Flag value if non-empty, else environment value, else default.
fn flag_or_env(flag: Option<String>, env: Option<String>, default: &str) -> String {
    flag.filter(|value| !value.is_empty())
        .or(env)
        .unwrap_or_else(|| default.to_string())
}

fn truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

impl Config {
    pub fn resolve(cli: Cli) -> Self {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    /// Resolution is pure in `cli` and `env`, so precedence is testable
    /// without touching the process environment.
    pub fn resolve_with(cli: Cli, env: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            connection: Connection {
                url: flag_or_env(cli.url, env("MM_URL"), ""),
                port: flag_or_env(cli.port, env("MM_PORT"), DEFAULT_PORT),
                scheme: flag_or_env(cli.scheme, env("MM_SCHEME"), DEFAULT_SCHEME),
                token: flag_or_env(cli.token, env("MM_TOKEN"), ""),
            },
            team: cli.team.filter(|team| !team.is_empty()),
            not_in_team: cli.not_in_team,
            include_bots: cli.include_bots,
            file: cli.file.unwrap_or_default(),
            debug: cli.debug || env("MM_DEBUG").as_deref().is_some_and(truthy),
        }
    }

    /// Checks for missing or conflicting parameters before any network call,
    /// returning one message per problem.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.connection.url.is_empty() {
            problems.push(
                "the Mattermost URL must be supplied on the command line or via the MM_URL environment variable"
                    .to_string(),
            );
        }
        if self.connection.scheme.is_empty() {
            problems.push(
                "the Mattermost HTTP scheme must be supplied on the command line or via the MM_SCHEME environment variable"
                    .to_string(),
            );
        }
        if self.connection.token.is_empty() {
            problems.push(
                "the Mattermost auth token must be supplied on the command line or via the MM_TOKEN environment variable"
                    .to_string(),
            );
        }
        if self.file.is_empty() {
            problems.push("a CSV output file must be specified".to_string());
        }
        if self.team.is_some() && self.not_in_team {
            problems.push("only one of 'team' or 'not-in-team' can be specified".to_string());
        }
        problems
    }
}
