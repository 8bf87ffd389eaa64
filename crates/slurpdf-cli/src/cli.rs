use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use slurpdf::PageRange;

/// Extract plain text from PDF documents.
#[derive(Debug, Parser)]
#[command(name = "slurpdf", about, version)]
pub struct Cli {
    /// Log font resolution and page progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract text from a range of pages
    Text {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range: 'N', 'N-M', or 'all'
        #[arg(long, default_value = "all")]
        pages: PageRange,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,

        /// Keep going past pages that fail instead of stopping at the first one
        #[arg(long)]
        skip_failed_pages: bool,
    },
}

/// Output format for the text subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum TextFormat {
    /// Plain text
    Text,
    /// One JSON object with text, warnings, and page errors
    Json,
}
