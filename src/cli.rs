use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "workbench",
    version,
    about = "Terminal workspace for browsing and editing repositories with an AI assistant"
)]
pub struct Cli {
    /// Base URL of the workspace server
    #[arg(short, long)]
    pub server: Option<String>,

    /// Path to the config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write logs here instead of next to the config file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    pub debug: bool,

    /// Remember --server in the config file
    #[arg(long, requires = "server")]
    pub save_server: bool,
}
