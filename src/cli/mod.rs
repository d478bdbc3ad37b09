pub mod init;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quill")]
#[command(version)]
#[command(about = "A lightweight blog backend", long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = "quill.toml", env = "QUILL_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter quill.toml into the given directory
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Run the HTTP server
    Serve {
        #[arg(short = 'H', long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Apply any pending database migrations
    Migrate,
}
