use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lowerfile")]
#[command(about = "Lowercase the contents of text files in place")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lowercase each file in place
    Apply {
        /// Files to rewrite, processed in order
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Encoding for multi-byte case folding (overrides the config)
        #[arg(short, long)]
        encoding: Option<String>,
    },

    /// Run the filter on a JSON value and print what it returns
    Descriptor {
        /// A path string, an object with `tmp_name`, or any other JSON value
        json: String,

        /// Encoding for multi-byte case folding (overrides the config)
        #[arg(short, long)]
        encoding: Option<String>,
    },
}
