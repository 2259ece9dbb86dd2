use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "celldash",
    about = "Storage-cell measurement dashboard client",
    version = "0.2.0",
    author = "Celldash Team"
)]
pub struct Cli {
    /// Base URL of the chart store API (falls back to CELLDASH_STORE_URL)
    #[arg(long)]
    pub store_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Resize retry attempts before a chart is left unrendered
    #[arg(long, default_value = "10")]
    pub resize_attempts: usize,

    /// Settle time in milliseconds before polling after an expand/collapse
    /// transition
    #[arg(long, default_value = "1000")]
    pub settle_ms: u64,

    /// Quiet period in milliseconds before a viewport resize is applied
    #[arg(long, default_value = "200")]
    pub resize_debounce_ms: u64,
}

pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:5000/api";

impl Cli {
    /// CLI flag, then environment, then the local-dev default.
    pub fn resolved_store_url(&self) -> String {
        self.store_url
            .clone()
            .or_else(|| std::env::var("CELLDASH_STORE_URL").ok())
            .unwrap_or_else(|| DEFAULT_STORE_URL.to_string())
    }
}
