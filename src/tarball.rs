/*============================================================
  Synavera Project: Syn-Syu
  Module: synsyu_listing::tarball
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Infer a package name and raw upstream version from the
    file name of a distribution archive.

  Security / Safety Notes:
    Pure string processing; patterns are compiled once per
    parser and never built from listing input.

  Dependencies:
    regex for the name/version split rules.

  Operational Scope:
    Applied to every listing path that survives filtering.

  Revision History:
    2025-11-12 COD  Authored tarball name heuristics.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Ordered rules, first match wins
    - Structured match results, no implicit capture state
    - Fallbacks logged, never silent
============================================================*/

use std::borrow::Cow;

use regex::Regex;

use crate::error::Result;
use crate::logger::Logger;

/// Archive and compression suffixes treated as equivalent.
const EXTENSIONS: &str =
    r"(?:\.gz|\.Z|\.bz2?|\.tbz|\.tbz2|\.lzma|\.lz|\.zip|\.xz|[-.]tar|\.tgz|\.7z|\.shar|\.cpio)$";

/// `name<sep>[v]version` where the version starts with a non-letter.
const SEPARATED: &str = r"^(.+?)[._-][vV]?([^A-Za-z].*)$";

/// Purely alphabetic name glued to a version starting with a digit.
const ALPHA_DIGIT: &str = r"^([a-zA-Z]+?)[._-]?([0-9][^A-Za-z].*)$";

/// Alphabetic name followed by a letters-then-digits version.
const ALPHA_TAGGED: &str = r"^([a-zA-Z._-]+?)[._-]?([a-zA-Z]+[0-9][^A-Za-z].*)$";

/// Platform and packaging tokens trailing the real version.
const TRAILING_JUNK: &str = r"^(.+?)((?:[._-](?:[a-zA-Z+]+|win32|win64|i?[345]86|x86|x64|hpux10|x86_64|woe32))+)$";

/// Compound suffixes such as `.tar.gz.zip` need several passes.
const CLEANUP_PASSES: usize = 10;

/// Which rule produced a name/version split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRule {
    Separated,
    AlphaDigit,
    AlphaTagged,
    /// Nothing matched; the file name and the whole cleaned path are used.
    Fallback,
}

/// Package name and raw version inferred from an archive path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarballName {
    pub name: String,
    pub version: String,
    pub rule: SplitRule,
}

/// Heuristic archive name parser.
pub struct TarballParser<'a> {
    logger: &'a Logger,
    extensions: Regex,
    rules: [(SplitRule, Regex); 3],
    trailing_junk: Regex,
}

impl<'a> TarballParser<'a> {
    /// Compile the split rules; `logger` receives fallback and failure notices.
    pub fn new(logger: &'a Logger) -> Result<Self> {
        Ok(Self {
            logger,
            extensions: Regex::new(EXTENSIONS)?,
            rules: [
                (SplitRule::Separated, Regex::new(SEPARATED)?),
                (SplitRule::AlphaDigit, Regex::new(ALPHA_DIGIT)?),
                (SplitRule::AlphaTagged, Regex::new(ALPHA_TAGGED)?),
            ],
            trailing_junk: Regex::new(TRAILING_JUNK)?,
        })
    }

    /// Parse a listing path into a package name and raw version.
    ///
    /// Returns `None` only when the path has no `/`-separated file name.
    pub fn parse(&self, url: &str) -> Option<TarballName> {
        let cleaned = self.strip_extensions(url);
        let Some((_, tarball)) = cleaned.rsplit_once('/') else {
            self.logger
                .info("NAME", format!("Failed to parse url {url}"));
            return None;
        };

        if let Some(split) = self.split_name_version(tarball) {
            let split = self.reattach_trailing_junk(split);
            self.logger.debug(
                "NAME",
                format!(
                    "{url} → name={} version={} via {:?}",
                    split.name, split.version, split.rule
                ),
            );
            return Some(split);
        }

        self.logger
            .info("FALLBACK", format!("falling back to full url for {url}"));
        Some(TarballName {
            name: tarball.to_string(),
            version: cleaned.to_string(),
            rule: SplitRule::Fallback,
        })
    }

    /// Remove archive/compression suffixes until none remain.
    pub fn strip_extensions<'s>(&self, url: &'s str) -> Cow<'s, str> {
        let mut cleaned = Cow::Borrowed(url);
        for _ in 0..CLEANUP_PASSES {
            let next = match self.extensions.replace(&cleaned, "") {
                Cow::Borrowed(_) => break,
                Cow::Owned(next) => next,
            };
            cleaned = Cow::Owned(next);
        }
        cleaned
    }

    fn split_name_version(&self, tarball: &str) -> Option<TarballName> {
        self.rules.iter().find_map(|(rule, pattern)| {
            capture_pair(pattern, tarball).map(|(name, version)| TarballName {
                name: name.to_string(),
                version: version.to_string(),
                rule: *rule,
            })
        })
    }

    /// Move `-doc`, `-win32`, `.x86_64` style tails from the version onto the name.
    fn reattach_trailing_junk(&self, mut split: TarballName) -> TarballName {
        if let Some((version, junk)) = capture_pair(&self.trailing_junk, &split.version) {
            let version = version.to_string();
            split.name.push_str(junk);
            split.version = version;
        }
        split
    }
}

/// Match `pattern` against `text` and return its two capture groups.
fn capture_pair<'t>(pattern: &Regex, text: &'t str) -> Option<(&'t str, &'t str)> {
    let captures = pattern.captures(text)?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("gnu/foo-1.2.3.tar.gz", "foo", "1.2.3", SplitRule::Separated)]
    #[case("gnu/app-1.0-win32.zip", "app-win32", "1.0", SplitRule::Separated)]
    #[case("gnu/gcc/gcc-8.3.0/gcc-8.3.0.tar.xz", "gcc", "8.3.0", SplitRule::Separated)]
    #[case("sources/glib/2.58/glib-2.58.3.tar.xz", "glib", "2.58.3", SplitRule::Separated)]
    #[case("pub/linux/kernel/v4.x/linux-4.19.1.tar.xz", "linux", "4.19.1", SplitRule::Separated)]
    #[case("gnu/foo_v2.1.tgz", "foo", "2.1", SplitRule::Separated)]
    #[case("gnu/foo-1.2-doc.tar.gz", "foo-doc", "1.2", SplitRule::Separated)]
    #[case("gnu/tool-2.6.0-x86_64.tar.bz2", "tool-x86_64", "2.6.0", SplitRule::Separated)]
    #[case("gnu/bash43.tar.gz", "bash", "43", SplitRule::AlphaDigit)]
    #[case("gnu/foo-r12.tar.gz", "foo", "r12", SplitRule::AlphaTagged)]
    fn splits_archive_names(
        #[case] url: &str,
        #[case] name: &str,
        #[case] version: &str,
        #[case] rule: SplitRule,
    ) {
        let logger = Logger::quiet();
        let parser = TarballParser::new(&logger).unwrap();
        assert_eq!(
            parser.parse(url),
            Some(TarballName {
                name: name.to_string(),
                version: version.to_string(),
                rule,
            })
        );
    }

    #[test]
    fn unmatched_names_fall_back_to_the_path() {
        let logger = Logger::quiet();
        let parser = TarballParser::new(&logger).unwrap();
        let parsed = parser.parse("gnu/README.tar.gz").unwrap();
        assert_eq!(parsed.name, "README");
        assert_eq!(parsed.version, "gnu/README");
        assert_eq!(parsed.rule, SplitRule::Fallback);
    }

    #[test]
    fn top_level_files_are_rejected() {
        let logger = Logger::quiet();
        let parser = TarballParser::new(&logger).unwrap();
        assert_eq!(parser.parse("foo-1.0.tar.gz"), None);
    }

    #[rstest]
    #[case("a/x-1.0.tar.gz", "a/x-1.0")]
    #[case("a/x-1.0.tbz2", "a/x-1.0")]
    #[case("a/x-1.0.tar.lzma", "a/x-1.0")]
    #[case("a/x-1.0.shar.Z", "a/x-1.0")]
    #[case("a/x-1.0.cpio.gz.zip", "a/x-1.0")]
    #[case("a/x-1.0.TAR.GZ", "a/x-1.0.TAR.GZ")]
    #[case("a/x-1.0.sig", "a/x-1.0.sig")]
    fn strips_compound_extensions(#[case] url: &str, #[case] expected: &str) {
        let logger = Logger::quiet();
        let parser = TarballParser::new(&logger).unwrap();
        assert_eq!(parser.strip_extensions(url), expected);
    }
}
