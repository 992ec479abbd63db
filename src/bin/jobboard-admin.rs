use anyhow::Result;
use clap::Parser;
use job_board::admin_cli::{handle_admin_command, AdminCli};
use job_board::config::LogFormat;
use job_board::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing(LogFormat::Pretty, None)?;
    handle_admin_command(AdminCli::parse()).await
}
