// Terminal feedback: a spinner while the upload is in flight and the token
// prompt behind `--login`. Both draw on stderr so stdout stays a clean URL.

use anyhow::{Context, Result};
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::config::persist_token;

/// Spinner shown during the PUT. indicatif hides it when stderr is not a
/// terminal, so piping the output stays quiet.
pub fn upload_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Ask for a GitHub token without echoing it and store it for later runs.
pub fn login() -> Result<()> {
    let token: String = Password::new()
        .with_prompt("GitHub token (needs contents:write)")
        .interact()
        .context("Failed to read token")?;
    let path = persist_token(&token)?;
    eprintln!("Token saved to {}", path.display());
    Ok(())
}
