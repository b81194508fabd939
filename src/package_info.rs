/*============================================================
  Synavera Project: Syn-Syu
  Module: synsyu_listing::package_info
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Shared structure describing one release found in an
    upstream mirror listing.

  Security / Safety Notes:
    Pure data container; no I/O performed in this module.

  Dependencies:
    chrono for listing timestamps.

  Operational Scope:
    Produced by the aggregator and handed to manifest output.

  Revision History:
    2024-11-04 COD  Introduced shared VersionInfo type.
    2025-11-12 COD  Reshaped into listing release records.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Clear data contracts between modules
    - Immutable once constructed
============================================================*/

use chrono::{DateTime, Utc};

/// A release located in a mirror listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub size: u64,
    pub url: String,
    pub date: DateTime<Utc>,
}

impl PackageRecord {
    pub fn new(name: String, version: String, size: u64, url: String, date: DateTime<Utc>) -> Self {
        Self {
            name,
            version,
            size,
            url,
            date,
        }
    }
}
