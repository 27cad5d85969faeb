use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "keeper")]
#[command(about = "Register URLs with the Grimoire Keeper backend and follow their processing")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to a RON config file. If omitted, uses ./keeper.ron if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error/off).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a URL and show processing progress until it finishes.
    Register {
        url: String,
        #[arg(long)]
        memo: Option<String>,
    },
    /// Query the processing status of a job once.
    Status { job: String },
    /// Check that the backend is reachable.
    Health,
}
