//! Command-line interface definitions for docpage

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docpage")]
#[command(version)]
#[command(about = "Build and exercise interactive documentation pages", long_about = None)]
pub struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a page manifest to HTML
    Build {
        /// Page manifest (TOML)
        manifest: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the written file in the default browser
        #[arg(long, requires = "output")]
        open: bool,
    },

    /// Drive a scripted sequence of user events through the page
    Replay {
        /// Page manifest (TOML)
        manifest: PathBuf,

        /// Replay script (JSON)
        script: PathBuf,

        /// Write the final HTML here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print an outline diff of the page before and after
        #[arg(long)]
        diff: bool,
    },
}
