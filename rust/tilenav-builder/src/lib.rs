pub mod commands;
pub mod config;
pub mod load;

pub use commands::{build_grid, execute, Cli, Command};
pub use config::Config;
