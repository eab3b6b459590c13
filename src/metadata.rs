use std::{path::Path, sync::LazyLock};

use regex::Regex;

use crate::error::{Error, PathContext, Result};

static TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{10}").unwrap());

/// The two header lines every `in.md` starts with:
///
/// ```text
/// # <title>
/// <span class="date"><unix timestamp></span>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    pub title: String,
    pub created_at: i64,
}

impl Header {
    pub fn new(title: &str, created_at: i64) -> Self {
        Self {
            title: title.to_string(),
            created_at,
        }
    }

    /// Markdown source of a fresh post: both header lines and a blank line.
    pub fn to_markdown(&self) -> String {
        format!(
            "# {}\n<span class=\"date\">{}</span>\n\n",
            self.title, self.created_at
        )
    }

    pub fn parse(source: &str) -> Result<Self, String> {
        let mut lines = source.lines();
        let title = lines
            .next()
            .and_then(|line| line.strip_prefix("# "))
            .ok_or_else(|| "first line must start with \"# \"".to_string())?;
        let date_line = lines
            .next()
            .ok_or_else(|| "missing date line".to_string())?;
        let created_at = TIMESTAMP_PATTERN
            .find(date_line)
            .ok_or_else(|| format!("no timestamp in {date_line:?}"))?
            .as_str()
            .parse::<i64>()
            .map_err(|e| format!("invalid timestamp: {e}"))?;

        Ok(Self {
            title: title.to_string(),
            created_at,
        })
    }

    /// Parses the already-read `content` of the file at `path`.
    pub fn from_source(path: &Path, content: &str) -> Result<Self> {
        Self::parse(content).map_err(|reason| Error::Parse {
            path: path.to_owned(),
            reason,
        })
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).at(path)?;
        Self::from_source(path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header() {
        let header =
            Header::parse("# Hello there\n<span class=\"date\">1704153600</span>\n\nbody\n").unwrap();
        assert_eq!(header, Header::new("Hello there", 1704153600));
    }

    #[test]
    fn markdown_round_trip() {
        let header = Header::new("A title", 1700000000);
        let md = header.to_markdown();
        assert!(md.starts_with("# A title\n<span class=\"date\">1700000000</span>\n"));
        assert!(md.ends_with("\n\n"));
        assert_eq!(Header::parse(&md).unwrap(), header);
    }

    #[test]
    fn rejects_missing_title_marker() {
        let err = Header::parse("Hello\n<span class=\"date\">1704153600</span>\n").unwrap_err();
        assert!(err.contains("# "));
    }

    #[test]
    fn rejects_short_timestamp() {
        assert!(Header::parse("# Hello\n<span class=\"date\">170415</span>\n").is_err());
        assert!(Header::parse("# Hello\n").is_err());
        assert!(Header::parse("").is_err());
    }

    #[test]
    fn read_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.md");
        std::fs::write(&path, "no header\n").unwrap();
        match Header::read(&path) {
            Err(Error::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {other:?}"),
        }

        let missing = dir.path().join("missing.md");
        assert!(matches!(
            Header::read(&missing),
            Err(Error::FileSystem { .. })
        ));
    }
}
