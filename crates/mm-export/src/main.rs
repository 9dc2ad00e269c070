use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    mm_export::cli::execute().await
}
