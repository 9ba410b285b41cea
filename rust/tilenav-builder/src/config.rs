use std::env;

use tilenav_core::BuildOptions;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub log_filter: String,
    pub log_json: bool,
    pub slice_cells: Option<usize>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let log_filter = get("TILENAV_LOG").unwrap_or_else(|| "info".to_string());
        let log_json = get("TILENAV_LOG_JSON")
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let slice_cells = get("TILENAV_SLICE_CELLS").and_then(|s| s.trim().parse::<usize>().ok()).filter(|&n| n > 0);
        Self { log_filter, log_json, slice_cells }
    }

    pub fn build_options(&self) -> BuildOptions {
        let mut opts = BuildOptions::default();
        if let Some(n) = self.slice_cells {
            opts.cells_per_slice = n;
        }
        opts
    }
}
