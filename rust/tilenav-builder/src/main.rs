use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use tilenav_builder::{execute, Cli, Config};

fn main() -> Result<()> {
    let cfg = Config::from_env();
    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so stdout carries only the JSON report
    let builder = fmt().with_env_filter(filter).with_ansi(false).with_writer(std::io::stderr);
    if cfg.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    let cli = Cli::parse();
    info!(core_version = %tilenav_core::version(), ?cli, "starting builder");

    match execute(&cli, &cfg.build_options()) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "builder failed");
            Err(e)
        }
    }
}
