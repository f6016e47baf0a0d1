use std::path::PathBuf;

use clap::Parser;

const KEYS: &str = "\
keys:   j/k move   enter load on target deck   1/2 load on deck 1/2
        tab switch deck   space play/pause   p play   s stop
        -/= gain   [/] speed   / search   a add path   d remove   q quit
mouse:  click or drag a waveform to seek";

#[derive(Parser, Debug)]
#[command(name = "duodeck")]
#[command(about = "Two-deck terminal DJ player")]
#[command(version, after_help = KEYS)]
pub struct Cli {
    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Audio files or folders to add to the library at startup
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}
