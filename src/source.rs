//! Workbook sources: a remote URL or a local file

use crate::error::{SieveError, SieveResult};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Where a workbook is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    /// `http://` and `https://` strings are URLs, anything else is a path.
    pub fn parse(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::Path(PathBuf::from(s))
        }
    }

    /// Read the raw workbook bytes.
    ///
    /// URLs are fetched with a blocking client, so call this from a plain
    /// thread (or `spawn_blocking`) when running inside an async runtime.
    pub fn fetch(&self) -> SieveResult<Vec<u8>> {
        match self {
            Source::Url(url) => {
                debug!(%url, "fetching workbook");
                let response = reqwest::blocking::get(url)
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| SieveError::Fetch(format!("{}: {}", url, e)))?;
                let bytes = response
                    .bytes()
                    .map_err(|e| SieveError::Fetch(format!("{}: {}", url, e)))?;
                Ok(bytes.to_vec())
            }
            Source::Path(path) => {
                debug!(path = %path.display(), "reading workbook");
                Ok(std::fs::read(path)?)
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source::parse(s)
    }
}
