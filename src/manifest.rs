/*============================================================
  Synavera Project: Syn-Syu
  Module: synsyu_listing::manifest
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Serialize the per-package best releases of a listing scan
    as a JSON array ordered by release date.

  Security / Safety Notes:
    Manifest data is written to operator-controlled paths; no
    privileged operations are performed.

  Dependencies:
    serde for JSON serialization, chrono for date rendering.

  Operational Scope:
    Consumed by update tooling that diffs upstream releases
    against packaged versions.

  Revision History:
    2024-11-04 COD  Authored manifest builder.
    2025-11-12 COD  Adapted to listing release manifests.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic ordering for reproducible manifests
    - Stable field names for downstream consumers
============================================================*/

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::SecondsFormat;
use serde::Serialize;

use crate::aggregator::IngestStats;
use crate::error::{Result, SynsyuError};
use crate::package_info::PackageRecord;

/// Serialized form of one release.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ReleaseEntry<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub size: u64,
    pub url: &'a str,
    /// RFC 3339 with an explicit `+00:00` offset.
    pub date: String,
}

impl<'a> From<&'a PackageRecord> for ReleaseEntry<'a> {
    fn from(record: &'a PackageRecord) -> Self {
        Self {
            name: &record.name,
            version: &record.version,
            size: record.size,
            url: &record.url,
            date: record.date.to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }
}

/// Persist the manifest to the given path.
pub fn write_manifest(records: &[PackageRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            SynsyuError::Filesystem(format!(
                "Failed to create manifest directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    let file = File::create(path).map_err(|err| {
        SynsyuError::Filesystem(format!(
            "Failed to create manifest file {}: {err}",
            path.display()
        ))
    })?;
    render_manifest(records, BufWriter::new(file))
}

/// Write the manifest to stdout.
pub fn print_manifest(records: &[PackageRecord]) -> Result<()> {
    render_manifest(records, io::stdout().lock())
}

/// Pretty-print `records` as a JSON array followed by a newline.
pub fn render_manifest<W: Write>(records: &[PackageRecord], mut writer: W) -> Result<()> {
    let entries: Vec<ReleaseEntry<'_>> = records.iter().map(ReleaseEntry::from).collect();
    serde_json::to_writer_pretty(&mut writer, &entries)
        .map_err(|err| SynsyuError::Serialization(format!("Failed to encode manifest: {err}")))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn print_summary(stats: &IngestStats, packages: usize) {
    println!(
        "→ Listing dry-run. Lines={} Packages={} (Ignored={} TooOld={} EmptySize={} Unparsed={} Fallback={} Replaced={})",
        stats.lines,
        packages,
        stats.ignored + stats.missing_path,
        stats.too_old,
        stats.empty_size,
        stats.unparsed,
        stats.fallback_names,
        stats.replaced
    );
}
