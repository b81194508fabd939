/*============================================================
  Synavera Project: Syn-Syu
  Module: synsyu_listing::listing
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Tokenize recursive rsync `--list-only` output into file
    entries (permissions, size, timestamp, path).

  Security / Safety Notes:
    Input is treated as untrusted text; malformed lines are
    either skipped or rejected with their line number.

  Dependencies:
    chrono for timestamp parsing.

  Operational Scope:
    First stage of the listing scan, feeding the aggregator.

  Revision History:
    2025-11-12 COD  Authored listing tokenizer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Structured parsing with clear failure modes
    - MOTD, directories and links skipped deterministically
============================================================*/

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{Result, SynsyuError};

/// Timestamp layouts accepted for `<date> <time>` pairs.
pub const TIMESTAMP_FORMATS: [&str; 2] = ["%Y/%m/%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// One regular file from a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    #[allow(dead_code)]
    pub permissions: String,
    pub size: i64,
    pub timestamp: DateTime<Utc>,
    pub path: String,
}

/// Result of tokenizing one listing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Entry(ListingEntry),
    /// Not a regular-file line (MOTD, directory, symlink, blank).
    Ignored,
    /// Regular-file prefix present but no path token.
    MissingPath,
}

/// Tokenize a single listing line.
///
/// Parse errors carry line `0`; callers attach the real line number.
pub fn parse_line(line: &str) -> Result<LineOutcome> {
    let line = line.trim();
    if !has_file_permissions(line) {
        return Ok(LineOutcome::Ignored);
    }

    let mut tokens = line.split_whitespace();
    let (Some(permissions), Some(size), Some(date), Some(time), Some(path)) = (
        tokens.next(),
        tokens.next(),
        tokens.next(),
        tokens.next(),
        tokens.next(),
    ) else {
        return Ok(LineOutcome::MissingPath);
    };

    let timestamp = parse_timestamp(&format!("{date} {time}")).ok_or_else(|| {
        SynsyuError::Parse {
            line: 0,
            reason: format!("unparseable timestamp `{date} {time}`"),
        }
    })?;
    let size = parse_size(size)?;

    Ok(LineOutcome::Entry(ListingEntry {
        permissions: permissions.to_string(),
        size,
        timestamp,
        path: path.to_string(),
    }))
}

/// Parse `<date> <time>` in any accepted layout as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// `-` followed by three `rwx` triplets and a space.
fn has_file_permissions(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 11 || bytes[0] != b'-' || bytes[10] != b' ' {
        return false;
    }
    bytes[1..10].chunks(3).all(|triplet| {
        matches!(triplet[0], b'r' | b'-')
            && matches!(triplet[1], b'w' | b'-')
            && matches!(triplet[2], b'x' | b'-')
    })
}

fn parse_size(value: &str) -> Result<i64> {
    let digits = value.replace(',', "");
    digits.parse::<i64>().map_err(|err| SynsyuError::Parse {
        line: 0,
        reason: format!("invalid size `{value}`: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn parses_regular_file_line() {
        let outcome =
            parse_line("-rw-r--r--      1,234,567 2019/02/22 14:05:09 gcc/gcc-8.3.0.tar.xz\n")
                .unwrap();
        assert_eq!(
            outcome,
            LineOutcome::Entry(ListingEntry {
                permissions: "-rw-r--r--".into(),
                size: 1_234_567,
                timestamp: Utc.with_ymd_and_hms(2019, 2, 22, 14, 5, 9).unwrap(),
                path: "gcc/gcc-8.3.0.tar.xz".into(),
            })
        );
    }

    #[rstest]
    #[case("")]
    #[case("Welcome to the GNU mirror")]
    #[case("drwxr-xr-x          4,096 2019/02/22 14:05:09 gcc")]
    #[case("lrwxrwxrwx             11 2019/02/22 14:05:09 latest -> gcc-8.3.0")]
    #[case("-rwsr-xr-x            100 2019/02/22 14:05:09 gnu/setuid-1.0.tar.gz")]
    #[case("-rw-r--r--")]
    fn skips_non_file_lines(#[case] line: &str) {
        assert_eq!(parse_line(line).unwrap(), LineOutcome::Ignored);
    }

    #[test]
    fn reports_missing_path() {
        assert_eq!(
            parse_line("-rw-r--r--  100 2019/02/22 14:05:09").unwrap(),
            LineOutcome::MissingPath
        );
    }

    #[test]
    fn malformed_date_is_fatal() {
        let err = parse_line("-rw-r--r--  100 2019/13/45 14:05:09 gnu/x-1.0.tar.gz").unwrap_err();
        assert!(matches!(err, SynsyuError::Parse { .. }));
        assert!(matches!(err.at_line(7), SynsyuError::Parse { line: 7, .. }));
    }

    #[test]
    fn malformed_size_is_fatal() {
        let err = parse_line("-rw-r--r--  big 2019/02/22 14:05:09 gnu/x-1.0.tar.gz").unwrap_err();
        assert!(matches!(err, SynsyuError::Parse { .. }));
    }

    #[test]
    fn accepts_dashed_dates() {
        assert_eq!(
            parse_timestamp("2020-01-31 00:00:01"),
            Some(Utc.with_ymd_and_hms(2020, 1, 31, 0, 0, 1).unwrap())
        );
    }
}
