/*============================================================
  Synavera Project: Syn-Syu
  Module: synsyu_listing::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load optional TOML defaults for the listing scanner
    (url prefix, since filter, log directory, output path).

  Security / Safety Notes:
    Reads operator-owned configuration only; no secrets are
    expected or stored.

  Dependencies:
    serde + toml for parsing, dirs for the XDG config root,
    chrono for the since filter.

  Operational Scope:
    Consulted once at start-up; CLI flags take precedence.

  Revision History:
    2025-11-12 COD  Authored listing scanner configuration.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Missing default file means defaults, never an error
    - Explicit paths must exist
    - Unknown keys rejected to surface typos
============================================================*/

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::{Result, SynsyuError};
use crate::listing::parse_timestamp;

/// File-backed defaults for a listing scan.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    /// Prepended to every emitted url.
    pub prefix: Option<String>,
    /// Drop listing entries older than this.
    pub since: Option<String>,
    /// Directory for session log files.
    pub log_dir: Option<PathBuf>,
    /// Manifest destination; stdout when unset.
    pub output: Option<PathBuf>,
}

impl ListingConfig {
    /// Load from `path`, or from the default location when `None`.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// `$XDG_CONFIG_HOME/synsyu/listing.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("synsyu").join("listing.toml"))
    }

    fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            SynsyuError::Config(format!("Failed to read config {}: {err}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|err| {
            SynsyuError::Config(format!("Failed to parse config {}: {err}", path.display()))
        })
    }

    /// The configured since filter, parsed.
    pub fn since(&self) -> Result<Option<DateTime<Utc>>> {
        self.since.as_deref().map(parse_since).transpose()
    }
}

/// Parse a since filter: RFC 3339, a listing timestamp, or a bare date.
pub fn parse_since(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.with_timezone(&Utc));
    }
    if let Some(stamp) = parse_timestamp(raw) {
        return Ok(stamp);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| SynsyuError::Config(format!("Unrecognised since date `{raw}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("2020-01-02", Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap())]
    #[case("2020-01-02T03:04:05Z", Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap())]
    #[case("2020-01-02T03:04:05+02:00", Utc.with_ymd_and_hms(2020, 1, 2, 1, 4, 5).unwrap())]
    #[case("2020/01/02 03:04:05", Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap())]
    fn parses_since_formats(#[case] raw: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_since(raw).unwrap(), expected);
    }

    #[test]
    fn rejects_garbage_since() {
        assert!(matches!(parse_since("last tuesday"), Err(SynsyuError::Config(_))));
    }

    #[test]
    fn loads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "prefix = \"https://ftp.gnu.org/gnu/\"\nsince = \"2021-05-01\"\nlog_dir = \"/tmp/synsyu\""
        )
        .unwrap();

        let config = ListingConfig::load_from_optional_path(Some(file.path())).unwrap();
        assert_eq!(config.prefix.as_deref(), Some("https://ftp.gnu.org/gnu/"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/synsyu")));
        assert_eq!(config.output, None);
        assert_eq!(
            config.since().unwrap(),
            Some(Utc.with_ymd_and_hms(2021, 5, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ListingConfig::load_from_optional_path(Some(dir.path().join("nope.toml").as_path()));
        assert!(matches!(result, Err(SynsyuError::Config(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prefx = \"typo\"").unwrap();
        let result = ListingConfig::load_from_optional_path(Some(file.path()));
        assert!(matches!(result, Err(SynsyuError::Config(_))));
    }
}
