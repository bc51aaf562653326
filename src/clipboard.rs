//! Pasteboard access: finding the file the user copied, or the image they
//! copied when there is no file.
//!
//! File references reach us in several shapes depending on the platform and
//! the tool asked: a property-list fragment (`<string>file://…</string>`), a
//! `text/uri-list` body, a bare `file://` URL, or a plain absolute path.
//! [`decode_file_reference`] folds all of them into a filesystem path.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{anyhow, Context, Result};
use arboard::Clipboard;
use percent_encoding::percent_decode_str;
use regex::Regex;
use tracing::debug;

static PLIST_FILE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<string>(file://.+?)</string>").expect("valid regex"));

/// Raw RGBA pixels as handed out by the system clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// What the pasteboard offered for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Image(ClipboardImage),
}

/// The pieces of the system pasteboard the uploader touches.
pub trait Pasteboard {
    /// Raw file-URL-typed entry, if the pasteboard has one.
    fn file_reference(&mut self) -> Result<Option<String>>;

    /// Image contents, if the pasteboard has one.
    fn image(&mut self) -> Result<Option<ClipboardImage>>;

    /// Replace the pasteboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The real pasteboard. The arboard handle is opened on first use so that
/// the native file lookup still works where arboard cannot initialize.
#[derive(Default)]
pub struct SystemPasteboard {
    clipboard: Option<Clipboard>,
}

impl SystemPasteboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn clipboard(&mut self) -> Result<&mut Clipboard> {
        if self.clipboard.is_none() {
            let clipboard = Clipboard::new()
                .map_err(|e| anyhow!("Failed to access system clipboard: {}", e))?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| anyhow!("system clipboard unavailable"))
    }
}

impl Pasteboard for SystemPasteboard {
    fn file_reference(&mut self) -> Result<Option<String>> {
        if let Some(raw) = native_file_reference() {
            return Ok(Some(raw));
        }
        match self.clipboard()?.get_text() {
            Ok(text) if text.trim_start().starts_with("file://") => Ok(Some(text)),
            Ok(_) | Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(e).context("Failed to read text from clipboard"),
        }
    }

    fn image(&mut self) -> Result<Option<ClipboardImage>> {
        match self.clipboard()?.get_image() {
            Ok(image) => Ok(Some(ClipboardImage {
                width: image.width,
                height: image.height,
                rgba: image.bytes.into_owned(),
            })),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(e).context("Failed to read image from clipboard"),
        }
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard()?
            .set_text(text.to_owned())
            .context("Failed to copy text to clipboard")
    }
}

/// Ask the platform for the pasteboard's file-URL flavour directly.
#[cfg(target_os = "macos")]
fn native_file_reference() -> Option<String> {
    command_output(
        "osascript",
        &["-e", "POSIX path of (the clipboard as «class furl»)"],
    )
}

#[cfg(all(unix, not(target_os = "macos")))]
fn native_file_reference() -> Option<String> {
    command_output(
        "xclip",
        &["-selection", "clipboard", "-t", "text/uri-list", "-o"],
    )
}

#[cfg(not(unix))]
fn native_file_reference() -> Option<String> {
    None
}

#[cfg(unix)]
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = match std::process::Command::new(program).args(args).output() {
        Ok(output) => output,
        Err(e) => {
            debug!(program, error = %e, "pasteboard helper unavailable");
            return None;
        }
    };
    if !output.status.success() {
        debug!(program, status = %output.status, "no file reference on pasteboard");
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Turn a raw pasteboard file reference into a filesystem path.
///
/// Returns `None` for anything that is not a local file: remote `file://host/`
/// URLs, relative paths, other URL schemes, or invalid UTF-8 escapes.
pub fn decode_file_reference(raw: &str) -> Option<PathBuf> {
    if let Some(caps) = PLIST_FILE_URL.captures(raw) {
        let url = caps.get(1)?.as_str().replace("&amp;", "&");
        return decode_entry(&url);
    }
    // uri-list bodies may carry several entries and `#` comments
    let entry = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))?;
    decode_entry(entry)
}

fn decode_entry(entry: &str) -> Option<PathBuf> {
    if let Some(rest) = entry.strip_prefix("file://") {
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        if !rest.starts_with('/') {
            return None;
        }
        let decoded = percent_decode_str(rest).decode_utf8().ok()?;
        return Some(PathBuf::from(decoded.into_owned()));
    }
    let path = Path::new(entry);
    path.is_absolute().then(|| path.to_path_buf())
}

/// Pick what to upload: the copied file if there is one, else a copied image.
pub fn read_source(pasteboard: &mut dyn Pasteboard) -> Result<Option<Source>> {
    if let Some(raw) = pasteboard.file_reference()? {
        match decode_file_reference(&raw) {
            Some(path) => return Ok(Some(Source::File(path))),
            None => debug!(entry = %raw, "ignoring unrecognised file reference"),
        }
    }
    debug!("no file on clipboard, falling back to image");
    Ok(pasteboard.image()?.map(Source::Image))
}
