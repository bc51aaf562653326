//! Error kinds the CLI needs to tell apart. Everything else travels as
//! `anyhow::Error` with context attached at the I/O boundary.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasteError {
    #[error("upload failed: {status} - {body}")]
    UploadFailed { status: StatusCode, body: String },

    #[error("the clipboard holds neither a file nor an image, nothing to upload")]
    NothingToUpload,

    #[error("no GitHub token found: set GITHUB_TOKEN or run `pasteup --login`")]
    MissingToken,

    #[error("cannot locate a home directory for the token file")]
    NoHomeDirectory,

    #[error("clipboard image is malformed ({width}x{height}, {len} bytes)")]
    InvalidImage {
        width: usize,
        height: usize,
        len: usize,
    },
}
