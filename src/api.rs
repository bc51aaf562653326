// GitHub client module: a small blocking HTTP client that creates files
// through the repository Contents API. One PUT per upload, one commit per
// PUT; nothing is retried.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use crate::cdn::path_segment;
use crate::config::{CommitInfo, Config, Repository};
use crate::error::PasteError;
use crate::upload::ContentStore;

/// Client for `PUT /repos/{owner}/{repo}/contents/{path}`. Holds the
/// reqwest blocking client, the API base URL and the token used for every
/// request.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    repository: Repository,
    commit: CommitInfo,
    token: String,
}

/// Who GitHub records as the committer.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

/// Body of the create-file request. `content` is the base64 file body.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct CreateFileRequest {
    pub message: String,
    pub committer: Committer,
    pub content: String,
}

impl GithubClient {
    /// Build a client from loaded configuration and a resolved token.
    pub fn new(config: &Config, token: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GithubClient {
            client,
            api_url: config.api_url.clone(),
            repository: config.repository.clone(),
            commit: config.commit.clone(),
            token: token.to_string(),
        })
    }

    /// Endpoint for creating `filename` at the repository root.
    pub fn contents_url(&self, filename: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            self.repository.owner,
            self.repository.repo,
            path_segment(filename)
        )
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("token {}", self.token))
            .context("GitHub token contains characters not allowed in a header")?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        Ok(headers)
    }

    fn request_body(&self, content: &str) -> CreateFileRequest {
        CreateFileRequest {
            message: self.commit.message.clone(),
            committer: Committer {
                name: self.commit.committer_name.clone(),
                email: self.commit.committer_email.clone(),
            },
            content: content.to_string(),
        }
    }

    /// Create `filename` with base64 `content`. Only `201 Created` counts as
    /// success; an existing file (422) or a bad token (401/403) is an error.
    pub fn create_file(&self, filename: &str, content: &str) -> Result<()> {
        let url = self.contents_url(filename);
        debug!(%url, "PUT contents");
        let res = self
            .client
            .put(&url)
            .headers(self.headers()?)
            .json(&self.request_body(content))
            .send()
            .context("Failed to send upload request")?;
        let status = res.status();
        if status != StatusCode::CREATED {
            let body = res.text().unwrap_or_else(|_| "".into());
            return Err(PasteError::UploadFailed { status, body }.into());
        }
        Ok(())
    }
}

impl ContentStore for GithubClient {
    fn put(&self, filename: &str, content: &str) -> Result<()> {
        self.create_file(filename, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GithubClient {
        GithubClient::new(&Config::default(), "ghp_test").unwrap()
    }

    #[test]
    fn contents_url_targets_repository_root() {
        assert_eq!(
            client().contents_url("20240101000000.png"),
            "https://api.github.com/repos/pys1992/storage/contents/20240101000000.png"
        );
    }

    #[test]
    fn contents_url_escapes_odd_extensions() {
        assert_eq!(
            client().contents_url("20240101000000.a b#"),
            "https://api.github.com/repos/pys1992/storage/contents/20240101000000.a%20b%23"
        );
    }

    #[test]
    fn body_serializes_in_contents_api_shape() {
        let body = serde_json::to_value(client().request_body("aGVsbG8=")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "message": "auto commit",
                "committer": { "name": "pys", "email": "me@pys.im" },
                "content": "aGVsbG8="
            })
        );
    }

    #[test]
    fn token_header_uses_token_scheme() {
        let headers = client().headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "token ghp_test");
    }

    #[test]
    fn newline_in_token_is_an_error() {
        let client = GithubClient::new(&Config::default(), "bad\ntoken").unwrap();
        assert!(client.headers().is_err());
    }
}
