//! Public links for uploaded files, served by jsDelivr's GitHub mirror.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::Repository;

/// Characters escaped when a filename becomes one URL path segment. Both the
/// upload endpoint and the public link use it, so they name the same file.
pub const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

pub fn path_segment(filename: &str) -> String {
    utf8_percent_encode(filename, PATH_SEGMENT).to_string()
}

/// `https://<cdn-host>/gh/<owner>/<repo>@<branch>/<filename>`
pub fn public_url(repository: &Repository, filename: &str) -> String {
    format!(
        "https://{}/gh/{}/{}@{}/{}",
        repository.cdn_host,
        repository.owner,
        repository.repo,
        repository.branch,
        path_segment(filename)
    )
}

pub fn markdown_image(url: &str) -> String {
    format!("![]({})", url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn default_repository_url() {
        let repository = Config::default().repository;
        assert_eq!(
            public_url(&repository, "20240101000000.png"),
            "https://cdn.jsdelivr.net/gh/pys1992/storage@main/20240101000000.png"
        );
    }

    #[test]
    fn custom_branch_and_host() {
        let repository = Repository {
            owner: "octo".into(),
            repo: "assets".into(),
            branch: "v2".into(),
            cdn_host: "fastly.jsdelivr.net".into(),
        };
        assert_eq!(
            public_url(&repository, "a.gif"),
            "https://fastly.jsdelivr.net/gh/octo/assets@v2/a.gif"
        );
    }

    #[test]
    fn odd_extensions_are_escaped_like_the_upload_path() {
        let repository = Config::default().repository;
        assert_eq!(
            public_url(&repository, "20240101000000.a b#"),
            "https://cdn.jsdelivr.net/gh/pys1992/storage@main/20240101000000.a%20b%23"
        );
        assert_eq!(
            public_url(&repository, "20240101000000.a?b"),
            "https://cdn.jsdelivr.net/gh/pys1992/storage@main/20240101000000.a%3Fb"
        );
    }

    #[test]
    fn markdown_wraps_url() {
        assert_eq!(
            markdown_image("https://cdn.jsdelivr.net/gh/o/r@main/x.png"),
            "![](https://cdn.jsdelivr.net/gh/o/r@main/x.png)"
        );
    }
}
