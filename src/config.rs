use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::TocError;
use crate::types::{Format, Page};

pub const DEFAULT_CONFIG: &str = "tocnav.toml";

/// Optional `tocnav.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Ids taken by other navigation on every page (sidebar items etc).
    pub reserved_ids: Vec<String>,
    /// Default output format for `tocnav outline`.
    pub format: Option<Format>,
}

impl Config {
    /// Load `path`, or `tocnav.toml` from the working directory when no path
    /// is given. A missing default file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, TocError> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default = Path::new(DEFAULT_CONFIG);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, TocError> {
        let text = fs::read_to_string(path).map_err(|e| TocError::io(path, e))?;
        let config = Self::parse(&text).map_err(|reason| TocError::Config {
            path: path.to_path_buf(),
            reason,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Add config and command-line reservations to the page's own, keeping
    /// first occurrences.
    pub fn reserve(&self, page: &mut Page, extra: &[String]) {
        for id in self.reserved_ids.iter().chain(extra) {
            if !page.reserved_ids.contains(id) {
                page.reserved_ids.push(id.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fields() {
        let text = "reserved_ids = [\"nav-a\", \"nav-b\"]\nformat = \"html\"\n";
        let config = Config::parse(text).unwrap();
        assert_eq!(config.reserved_ids, vec!["nav-a", "nav-b"]);
        assert_eq!(config.format, Some(Format::Html));
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::parse("reserved = []").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("tocnav.toml"))).unwrap_err();
        assert!(matches!(err, TocError::NotFound { .. }));
    }

    #[test]
    fn bad_file_reports_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tocnav.toml");
        fs::write(&path, "format = \"pdf\"").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(TocError::Config { .. })));
    }

    #[test]
    fn reserve_merges_without_duplicates() {
        let config = Config {
            reserved_ids: vec!["a".into(), "b".into()],
            format: None,
        };
        let mut page = Page {
            reserved_ids: vec!["b".into()],
            ..Page::default()
        };
        config.reserve(&mut page, &["c".into(), "a".into()]);
        assert_eq!(page.reserved_ids, vec!["b", "a", "c"]);
    }
}
