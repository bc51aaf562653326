#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use pasteup::clipboard::{ClipboardImage, Pasteboard};
use pasteup::config::Config;
use pasteup::upload::ContentStore;

/// The request the fake GitHub server received.
#[derive(Debug)]
pub struct Captured {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Accept exactly one request on a random port and answer with `status`.
/// Returns the base URL to point the client at.
pub fn serve_once(status: u16, reason: &str, body: &str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((k, v)) = line.split_once(':') {
                headers.push((k.trim().to_string(), v.trim().to_string()));
            }
        }

        let len = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);
        let mut body = vec![0u8; len];
        reader.read_exact(&mut body).unwrap();

        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        Captured {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: String::from_utf8(body).unwrap(),
        }
    });

    (base, handle)
}

/// Default config pointed at a local server.
pub fn config_for(base: &str) -> Config {
    Config::from_lookup(|key| match key {
        "GITHUB_API_URL" => Some(base.to_string()),
        _ => None,
    })
}

pub fn new_year() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// In-memory pasteboard.
#[derive(Default)]
pub struct FakePasteboard {
    pub file: Option<String>,
    pub image: Option<ClipboardImage>,
    pub copied: Vec<String>,
}

impl Pasteboard for FakePasteboard {
    fn file_reference(&mut self) -> Result<Option<String>> {
        Ok(self.file.clone())
    }

    fn image(&mut self) -> Result<Option<ClipboardImage>> {
        Ok(self.image.clone())
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.copied.push(text.to_string());
        Ok(())
    }
}

/// Store that records calls and always succeeds.
#[derive(Default)]
pub struct CountingStore {
    pub puts: RefCell<Vec<String>>,
}

impl ContentStore for CountingStore {
    fn put(&self, filename: &str, _content: &str) -> Result<()> {
        self.puts.borrow_mut().push(filename.to_string());
        Ok(())
    }
}
