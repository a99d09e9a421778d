use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Feed location: an http(s) URL or a path to a JSON file
    #[arg(long, env = "DEVLOG_FEED", default_value = "data/devlogs.json")]
    pub feed: String,

    /// HTML page shell with #game-selector and #devlog-viewer mount points
    #[arg(long)]
    pub shell: Option<PathBuf>,

    /// Render multi-paragraph sections as bulleted lists
    #[arg(long)]
    pub bullets: bool,

    /// Base URL for relative image paths (defaults to the feed URL for remote feeds)
    #[arg(long)]
    pub image_base: Option<String>,

    /// Give up on the feed request after this many seconds (no limit by default)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the page for one fragment
    Render {
        /// Game or update id to show
        #[arg(long)]
        fragment: Option<String>,

        /// Write the page here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Navigate the feed interactively from stdin
    Browse {
        /// Game or update id to start at
        #[arg(long)]
        fragment: Option<String>,

        /// Print the viewer markup after every command
        #[arg(long)]
        html: bool,
    },
    /// Write a static copy of the viewer with one page per fragment
    Publish {
        /// Directory to write pages, manifest and images to
        #[arg(long, default_value = "public")]
        out_dir: PathBuf,
    },
    /// Load and normalize the feed, then print a summary
    Check,
}
