use anyhow::Result;
use dotenvy::dotenv;

mod archive;
mod config;
mod error;
mod extract;
mod fetch;
mod generate;
mod output;
mod render;
mod telemetry;
mod util;

use config::Config;

// Single page at a time, so a current-thread runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();

    // logs on stderr; respects RUST_LOG and SNARCHIVE_LOG_FORMAT
    telemetry::config::init_tracing();
    let cfg = Config::from_env()?;

    generate::run(&cfg).await?;
    Ok(())
}
