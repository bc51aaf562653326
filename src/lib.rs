// Library root
// -----------
// The binary (`main.rs`) parses arguments and hands them to `app::run`.
//
// Module responsibilities:
// - `clipboard`: reads a file reference or image from the pasteboard.
// - `upload`: names and base64-encodes the payload; `ContentStore` seam.
// - `api`: GitHub Contents API client implementing `ContentStore`.
// - `cdn`: composes the jsDelivr link and Markdown tag.
// - `app`: wires the steps together for one run.
// - `config`, `cli`, `error`, `ui`: environment, arguments, error kinds and
//   terminal feedback.
pub mod api;
pub mod app;
pub mod cdn;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod ui;
pub mod upload;
