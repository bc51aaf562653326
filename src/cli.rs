use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Upload the file (or image) on the clipboard to GitHub and print its CDN link.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Upload this file instead of reading the clipboard
    #[arg(short = 'f', long = "file", conflicts_with = "login")]
    pub file: Option<PathBuf>,

    /// Print a Markdown image tag instead of the bare URL
    #[arg(short = 'm', long = "markdown", action = ArgAction::SetTrue)]
    pub markdown: bool,

    /// Copy the printed line back to the clipboard
    #[arg(short = 'c', long = "copy", action = ArgAction::SetTrue)]
    pub copy: bool,

    /// Prompt for a GitHub token and save it instead of uploading
    #[arg(long = "login", action = ArgAction::SetTrue)]
    pub login: bool,

    /// Log debug details to stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,
}
