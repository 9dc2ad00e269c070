use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::endpoints::setup::ApiClient;
use crate::endpoints::users::{users_in_team, users_without_team};
use crate::export::write_users_csv;

/// Mattermost user export - writes a team's members (or users without a
/// team) to a CSV file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The URL of the Mattermost instance (without the HTTP scheme)
    #[arg(long)]
    pub url: Option<String>,
    /// The TCP port used by Mattermost [default: 8065]
    #[arg(long)]
    pub port: Option<String>,
    /// The HTTP scheme to be used (http/https) [default: http]
    #[arg(long)]
    pub scheme: Option<String>,
    /// The auth token used to connect to Mattermost
    #[arg(long)]
    pub token: Option<String>,
    /// The name of the Mattermost team
    #[arg(long)]
    pub team: Option<String>,
    /// Export users who are not allocated to any team, instead of a team's members
    #[arg(long)]
    pub not_in_team: bool,
    /// Include bot accounts in the export
    #[arg(long)]
    pub include_bots: bool,
    /// The CSV file to which the output should be written
    #[arg(long, short)]
    pub file: Option<String>,
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

fn init_tracing(debug_mode: bool) {
    let level = if debug_mode {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();
}

/// Exit codes: 0 success, 1 invalid command line, 2 retrieval failure,
/// 3 missing team name, 4 CSV write failure.
pub async fn execute() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::resolve(cli);
    init_tracing(config.debug);

    debug!(
        "parameters: url={} port={} scheme={} team={:?} file={}",
        config.connection.url,
        config.connection.port,
        config.connection.scheme,
        config.team,
        config.file
    );

    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            error!("{problem}");
        }
        let _ = Cli::command().print_help();
        return ExitCode::from(1);
    }

    let client = ApiClient::new(&config.connection);
    debug!("full target for Mattermost: {}", client.base_url());
    info!("processing started - version {}", env!("CARGO_PKG_VERSION"));

    let users = if config.not_in_team {
        users_without_team(&client, config.include_bots).await
    } else {
        match config.team.as_deref() {
            Some(team) => users_in_team(&client, team, config.include_bots).await,
            None => {
                error!("a Mattermost team name is required");
                let _ = Cli::command().print_help();
                return ExitCode::from(3);
            }
        }
    };

    let users = match users {
        Ok(users) => users,
        Err(e) => {
            error!("processing failed: {e}");
            return ExitCode::from(2);
        }
    };

    if users.is_empty() {
        warn!("no users found to write to CSV");
        return ExitCode::SUCCESS;
    }

    if let Err(e) = write_users_csv(&users, Path::new(&config.file)) {
        error!("failed to write CSV file: {e}");
        return ExitCode::from(4);
    }

    info!("wrote {} users to {}", users.len(), config.file);
    ExitCode::SUCCESS
}
