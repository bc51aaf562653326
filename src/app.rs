//! One run of the uploader: read the pasteboard, upload, print the link.

use std::io::{self, Write};

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::api::GithubClient;
use crate::cdn::{markdown_image, public_url};
use crate::cli::Cli;
use crate::clipboard::{read_source, Pasteboard, Source, SystemPasteboard};
use crate::config::{Config, Repository};
use crate::error::PasteError;
use crate::ui;
use crate::upload::{self, source_for_path, ContentStore, Payload};

/// Output switches taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub markdown: bool,
    pub copy: bool,
}

/// A finished upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub filename: String,
    pub url: String,
}

/// Everything a single upload needs, borrowed from the caller.
pub struct Session<'a> {
    pub pasteboard: &'a mut dyn Pasteboard,
    pub store: &'a dyn ContentStore,
    pub repository: &'a Repository,
    pub options: Options,
}

impl Session<'_> {
    /// Upload whatever the pasteboard holds. `Ok(None)` means it held
    /// nothing usable; no request is made in that case.
    pub fn paste(&mut self, now: NaiveDateTime, out: &mut dyn Write) -> Result<Option<Published>> {
        match read_source(&mut *self.pasteboard)? {
            Some(source) => self.publish(&source, now, out).map(Some),
            None => {
                warn!("clipboard holds no file or image");
                Ok(None)
            }
        }
    }

    /// Upload `source` and write its link as a single line to `out`.
    /// Nothing is written if the upload fails.
    pub fn publish(
        &mut self,
        source: &Source,
        now: NaiveDateTime,
        out: &mut dyn Write,
    ) -> Result<Published> {
        let payload = Payload::from_source(source)?;
        let filename = upload::upload(self.store, &payload, now)?;
        let url = public_url(self.repository, &filename);

        let line = if self.options.markdown {
            markdown_image(&url)
        } else {
            url.clone()
        };
        writeln!(out, "{}", line)?;

        if self.options.copy {
            match self.pasteboard.set_text(&line) {
                Ok(()) => info!("copied link to clipboard"),
                Err(e) => warn!("failed to copy to clipboard: {:#}", e),
            }
        }
        Ok(Published { filename, url })
    }
}

/// Wraps a store with a terminal spinner for the duration of each PUT.
struct WithSpinner<'a>(&'a dyn ContentStore);

impl ContentStore for WithSpinner<'_> {
    fn put(&self, filename: &str, content: &str) -> Result<()> {
        let spinner = ui::upload_spinner(&format!("Uploading {}...", filename));
        let result = self.0.put(filename, content);
        spinner.finish_and_clear();
        result
    }
}

/// Run the CLI.
///
/// Errors bubble up to `main`: a missing token, an empty clipboard, an
/// unreadable file or a rejected upload all end the process non-zero with
/// nothing on stdout.
pub fn run(cli: Cli) -> Result<()> {
    if cli.login {
        return ui::login();
    }

    let config = Config::from_env();
    let token = config.resolve_token()?;
    let client = GithubClient::new(&config, &token)?;
    let store = WithSpinner(&client);
    let mut pasteboard = SystemPasteboard::new();

    let mut session = Session {
        pasteboard: &mut pasteboard,
        store: &store,
        repository: &config.repository,
        options: Options {
            markdown: cli.markdown,
            copy: cli.copy,
        },
    };

    let now = Local::now().naive_local();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let published = match cli.file {
        Some(path) => Some(session.publish(&source_for_path(path), now, &mut out)?),
        None => session.paste(now, &mut out)?,
    };

    match published {
        Some(published) => {
            info!(url = %published.url, "done");
            Ok(())
        }
        None => Err(PasteError::NothingToUpload.into()),
    }
}
