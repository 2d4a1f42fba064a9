mod aggregate;
mod assemble;
mod cli;
mod config;
mod gateway;
mod identity;
mod model;
mod nearby;
mod storage;
mod wizard;
mod workflow;

use std::process;

use tracing_subscriber::EnvFilter;

use config::Config;

const LOG_ENV: &str = "CAN_EYE_LOG";

fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
