use clap::Parser;

/// crlabel — label code-review comments against their diff
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "crlabel", version, about)]
pub struct Cli {
    /// Annotation backend origin (default: http://127.0.0.1:8000)
    #[arg(long)]
    pub server: Option<String>,

    /// Path to config file (default: $XDG_CONFIG_HOME/crlabel/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Color theme (dark, catppuccin-mocha)
    #[arg(long)]
    pub theme: Option<String>,

    /// Assumed reading rate used to size the reading lock
    #[arg(long = "wpm")]
    pub words_per_minute: Option<u32>,

    /// Minimum reading lock in milliseconds
    #[arg(long)]
    pub min_lock_ms: Option<u64>,

    /// Automatic re-fetches after a failed target request
    #[arg(long)]
    pub fetch_retries: Option<u32>,

    /// Log file path (the terminal belongs to the UI)
    #[arg(long)]
    pub log_file: Option<String>,
}
