//! ShearBite backend binary.
//!
//! Serves the auth and donation API on BIND_ADDR (default 0.0.0.0:8000).
//! Every setting can be passed as a flag or an environment variable.
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = sb_server::Settings::parse();
    sb_core::log();
    sb_server::run(settings).await
}
