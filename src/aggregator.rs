/*============================================================
  Synavera Project: Syn-Syu
  Module: synsyu_listing::aggregator
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Stream listing entries into a table holding the newest
    (smallest on tie) release per package name.

  Security / Safety Notes:
    Operates purely in memory; the table is owned by a single
    writer and needs no locking.

  Dependencies:
    crate::tarball for name inference, crate::upstream for
    version ordering.

  Operational Scope:
    Core of the listing scan, between tokenizer and manifest.

  Revision History:
    2025-11-12 COD  Authored streaming aggregator.
  ------------------------------------------------------------
  SSE Principles Observed:
    - One input line, at most one table mutation
    - Skips counted and logged, never silent
    - Deterministic ordering for reproducible manifests
============================================================*/

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::io::BufRead;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::listing::{parse_line, LineOutcome, ListingEntry};
use crate::logger::Logger;
use crate::package_info::PackageRecord;
use crate::tarball::{SplitRule, TarballParser};
use crate::upstream::upstream_compare;

/// Filters applied while ingesting.
#[derive(Debug, Clone, Default)]
pub struct AggregatorOptions {
    /// Entries strictly older than this are dropped.
    pub since: Option<DateTime<Utc>>,
    /// Prepended to every emitted url.
    pub prefix: String,
}

/// What happened to one ingested entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    TooOld,
    EmptySize,
    Unparsed,
    Inserted,
    Replaced,
    Discarded,
}

/// Counters reported in the scan summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub lines: usize,
    pub ignored: usize,
    pub missing_path: usize,
    pub too_old: usize,
    pub empty_size: usize,
    pub unparsed: usize,
    pub fallback_names: usize,
    pub inserted: usize,
    pub replaced: usize,
    pub discarded: usize,
}

/// Best-release-per-name table fed by listing entries.
pub struct Aggregator<'a> {
    options: AggregatorOptions,
    parser: TarballParser<'a>,
    logger: &'a Logger,
    table: BTreeMap<String, PackageRecord>,
    stats: IngestStats,
}

impl<'a> Aggregator<'a> {
    pub fn new(options: AggregatorOptions, logger: &'a Logger) -> Result<Self> {
        Ok(Self {
            options,
            parser: TarballParser::new(logger)?,
            logger,
            table: BTreeMap::new(),
            stats: IngestStats::default(),
        })
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Number of distinct package names currently held.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Stream every line of `reader` through the tokenizer and into the table.
    ///
    /// Lines are decoded lossily so stray non-UTF-8 names cannot abort a scan.
    /// An unparseable timestamp or size is fatal and reports its line number.
    pub fn ingest_reader<R: BufRead>(&mut self, mut reader: R) -> Result<()> {
        let mut buffer = Vec::new();
        let mut line_no = 0usize;
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_no += 1;
            self.stats.lines += 1;

            let line = String::from_utf8_lossy(&buffer);
            match parse_line(&line).map_err(|err| err.at_line(line_no))? {
                LineOutcome::Ignored => self.stats.ignored += 1,
                LineOutcome::MissingPath => {
                    self.stats.missing_path += 1;
                    self.logger.info(
                        "LINE",
                        format!("Failed to parse line {line_no}: {}", line.trim()),
                    );
                }
                LineOutcome::Entry(entry) => {
                    self.ingest_entry(entry);
                }
            }
        }
        Ok(())
    }

    /// Filter one listing entry, infer its name and offer it to the table.
    pub fn ingest_entry(&mut self, entry: ListingEntry) -> Disposition {
        if self.is_too_old(&entry.timestamp) {
            self.stats.too_old += 1;
            return Disposition::TooOld;
        }

        let size = match u64::try_from(entry.size) {
            Ok(size) if size > 0 => size,
            _ => {
                self.stats.empty_size += 1;
                return Disposition::EmptySize;
            }
        };

        let Some(parsed) = self.parser.parse(&entry.path) else {
            self.stats.unparsed += 1;
            return Disposition::Unparsed;
        };
        if parsed.rule == SplitRule::Fallback {
            self.stats.fallback_names += 1;
        }

        let url = format!("{}{}", self.options.prefix, entry.path);
        let record = PackageRecord::new(parsed.name, parsed.version, size, url, entry.timestamp);
        self.ingest(record)
    }

    /// Offer a record to the table.
    ///
    /// A newer upstream version replaces the stored record; an equal version
    /// replaces it only when the incoming archive is smaller.
    pub fn ingest(&mut self, record: PackageRecord) -> Disposition {
        if self.is_too_old(&record.date) {
            self.stats.too_old += 1;
            return Disposition::TooOld;
        }

        let disposition = match self.table.entry(record.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                Disposition::Inserted
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get();
                let supersedes = match upstream_compare(&current.version, &record.version) {
                    Ordering::Less => true,
                    Ordering::Equal => record.size < current.size,
                    Ordering::Greater => false,
                };
                if supersedes {
                    self.logger.debug(
                        "REPLACE",
                        format!(
                            "{}: {} ({} bytes) → {} ({} bytes)",
                            record.name, current.version, current.size, record.version, record.size
                        ),
                    );
                    slot.insert(record);
                    Disposition::Replaced
                } else {
                    Disposition::Discarded
                }
            }
        };

        match disposition {
            Disposition::Inserted => self.stats.inserted += 1,
            Disposition::Replaced => self.stats.replaced += 1,
            _ => self.stats.discarded += 1,
        }
        disposition
    }

    /// Close the table and return its records ordered by date.
    ///
    /// Records sharing a date keep package-name order.
    pub fn finalize(self) -> (Vec<PackageRecord>, IngestStats) {
        let mut records: Vec<PackageRecord> = self.table.into_values().collect();
        records.sort_by_key(|record| record.date);
        (records, self.stats)
    }

    fn is_too_old(&self, date: &DateTime<Utc>) -> bool {
        self.options.since.is_some_and(|since| *date < since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Cursor;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, day, 12, 0, 0).unwrap()
    }

    fn record(name: &str, version: &str, size: u64, day: u32) -> PackageRecord {
        PackageRecord::new(
            name.into(),
            version.into(),
            size,
            format!("mirror/{name}-{version}.tar.gz"),
            at(day),
        )
    }

    #[test]
    fn equal_versions_keep_smallest_archive_in_either_order() {
        let logger = Logger::quiet();
        for sizes in [[100, 50], [50, 100]] {
            let mut aggregator = Aggregator::new(AggregatorOptions::default(), &logger).unwrap();
            for size in sizes {
                aggregator.ingest(record("x", "1.0", size, 1));
            }
            let (records, _) = aggregator.finalize();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].size, 50);
        }
    }

    #[test]
    fn newer_versions_replace_and_older_are_discarded() {
        let logger = Logger::quiet();
        let mut aggregator = Aggregator::new(AggregatorOptions::default(), &logger).unwrap();

        assert_eq!(aggregator.ingest(record("foo", "1.0-rc1", 10, 1)), Disposition::Inserted);
        assert_eq!(aggregator.ingest(record("foo", "1.0", 10, 2)), Disposition::Replaced);
        assert_eq!(aggregator.ingest(record("foo", "0.9", 5, 3)), Disposition::Discarded);
        assert_eq!(aggregator.len(), 1);

        let (records, stats) = aggregator.finalize();
        assert_eq!(records[0].version, "1.0");
        assert_eq!((stats.inserted, stats.replaced, stats.discarded), (1, 1, 1));
    }

    #[test]
    fn records_before_since_never_enter_the_table() {
        let logger = Logger::quiet();
        let options = AggregatorOptions {
            since: Some(at(10)),
            prefix: String::new(),
        };
        let mut aggregator = Aggregator::new(options, &logger).unwrap();

        assert_eq!(aggregator.ingest(record("x", "99.0", 1, 9)), Disposition::TooOld);
        assert!(aggregator.is_empty());
        assert_eq!(aggregator.ingest(record("x", "1.0", 1, 10)), Disposition::Inserted);
    }

    #[test]
    fn finalize_orders_by_date() {
        let logger = Logger::quiet();
        let mut aggregator = Aggregator::new(AggregatorOptions::default(), &logger).unwrap();
        aggregator.ingest(record("late", "1.0", 1, 20));
        aggregator.ingest(record("early", "1.0", 1, 2));
        aggregator.ingest(record("middle", "1.0", 1, 11));

        let (records, _) = aggregator.finalize();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["early", "middle", "late"]);
    }

    #[test]
    fn scans_a_listing_end_to_end() {
        let listing = "\
Welcome to the mirror.

drwxr-xr-x          4,096 2019/01/01 00:00:00 gnu
-rw-r--r--            900 2019/01/01 00:00:00 README
-rw-r--r--          1,000 2019/03/01 10:00:00 gnu/foo/foo-1.0.tar.gz
-rw-r--r--            800 2019/03/01 10:00:00 gnu/foo/foo-1.0.tar.xz
-rw-r--r--          1,200 2019/06/01 10:00:00 gnu/foo/foo-1.1-rc1.tar.gz
-rw-r--r--          1,100 2019/02/01 10:00:00 gnu/bar/bar-2.0.tar.gz
-rw-r--r--              0 2019/07/01 10:00:00 gnu/bar/bar-3.0.tar.gz
-rw-r--r--          5,000 2018/01/01 10:00:00 gnu/old/old-9.9.tar.gz
-rw-r--r--  2019/03/01 10:00:00
";
        let logger = Logger::quiet();
        let options = AggregatorOptions {
            since: Some(Utc.with_ymd_and_hms(2018, 6, 1, 0, 0, 0).unwrap()),
            prefix: "https://ftp.gnu.org/".into(),
        };
        let mut aggregator = Aggregator::new(options, &logger).unwrap();
        aggregator.ingest_reader(Cursor::new(listing)).unwrap();
        let (records, stats) = aggregator.finalize();

        let summary: Vec<(&str, &str, u64)> = records
            .iter()
            .map(|r| (r.name.as_str(), r.version.as_str(), r.size))
            .collect();
        assert_eq!(summary, [("bar", "2.0", 1100), ("foo", "1.1-rc1", 1200)]);
        assert_eq!(records[1].url, "https://ftp.gnu.org/gnu/foo/foo-1.1-rc1.tar.gz");

        assert_eq!(stats.lines, 11);
        assert_eq!(stats.ignored, 3);
        assert_eq!(stats.missing_path, 1);
        assert_eq!(stats.too_old, 1);
        assert_eq!(stats.empty_size, 1);
        assert_eq!(stats.unparsed, 1);
    }

    #[test]
    fn bad_timestamp_reports_line_number() {
        let listing = "motd\n-rw-r--r--  10 2019/99/01 10:00:00 gnu/x-1.0.tar.gz\n";
        let logger = Logger::quiet();
        let mut aggregator = Aggregator::new(AggregatorOptions::default(), &logger).unwrap();
        let err = aggregator.ingest_reader(Cursor::new(listing)).unwrap_err();
        assert!(matches!(err, crate::error::SynsyuError::Parse { line: 2, .. }));
    }
}
