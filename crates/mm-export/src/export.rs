use std::fs::File;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, error, warn};

use crate::models::UserRecord;

const CSV_HEADER: [&str; 10] = [
    "Username",
    "Email",
    "First Name",
    "Last Name",
    "Nickname",
    "Is Bot Account",
    "User Created Date",
    "Last Activity Date",
    "Days Since Last Activity",
    "Team Name",
];

/// The export is abandoned once more than this many records fail to write.
const MAX_WRITE_ERRORS: usize = 3;

fn csv_record(user: &UserRecord) -> [String; 10] {
    [
        user.username.clone(),
        user.email.clone(),
        user.first_name.clone(),
        user.last_name.clone(),
        user.nickname.clone(),
        user.is_bot_account.to_string(),
        user.created_at.format("%Y-%m-%d").to_string(),
        user.last_activity_at.format("%Y-%m-%d").to_string(),
        user.days_since_last_activity.to_string(),
        user.team_name.clone(),
    ]
}

/// Counts a failed row write against the budget. Failed rows are skipped,
/// not retried; once the count passes [`MAX_WRITE_ERRORS`] the error that
/// caused the most recent failure is returned.
fn count_write_error<E>(write_errors: &mut usize, err: E) -> Result<()>
where
    E: Into<anyhow::Error>,
{
    *write_errors += 1;
    if *write_errors > MAX_WRITE_ERRORS {
        error!("too many errors writing to CSV file, aborting");
        return Err(err.into());
    }
    Ok(())
}

/// Serializes the records to `path` in input order: header row, then one
/// row per record. File creation failure is fatal; row write failures are
/// tolerated up to the budget. Whatever was flushed before an abort stays
/// on disk.
pub fn write_users_csv(users: &[UserRecord], path: &Path) -> Result<()> {
    debug!("writing data to CSV file: {}", path.display());

    let file = File::create(path)
        .inspect_err(|e| error!("failed to create file {}: {e}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(CSV_HEADER)?;

    let mut write_errors = 0;
    for user in users {
        if let Err(e) = writer.write_record(csv_record(user)) {
            warn!("failed to write record for user '{}' to CSV file", user.username);
            count_write_error(&mut write_errors, e)?;
        }
    }

    writer.flush()?;
    Ok(())
}
