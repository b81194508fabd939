/*============================================================
  Synavera Project: Syn-Syu
  Module: synsyu_listing::upstream
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Order upstream release versions, treating release
    candidate markers (rc, pre, beta, alpha, dev, a, b) as
    older than the plain release they precede.

  Security / Safety Notes:
    Pure string processing; no I/O performed in this module.

  Dependencies:
    crate::vercmp for segment ordering.

  Operational Scope:
    Consulted by the aggregator whenever two listing entries
    share a package name.

  Revision History:
    2025-11-12 COD  Introduced upstream comparator.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Syntactic ordering only, no semver interpretation
    - Explicit match records instead of shared regex state
============================================================*/

use std::cmp::Ordering;

use crate::vercmp::compare_values;

/// Release-candidate markers in match priority order.
const RC_TAGS: [&str; 7] = ["rc", "pre", "beta", "alpha", "dev", "a", "b"];

/// A version string broken around its release-candidate marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionSplit<'a> {
    pub base: &'a str,
    pub rc_tag: Option<&'a str>,
    pub rc_number: Option<&'a str>,
    pub remainder: Option<&'a str>,
}

impl<'a> VersionSplit<'a> {
    fn whole(version: &'a str) -> Self {
        Self {
            base: version,
            rc_tag: None,
            rc_number: None,
            remainder: None,
        }
    }
}

/// Location of the first release-candidate marker within a version.
struct RcMatch<'a> {
    prefix: &'a str,
    /// Optional `-`, the tag and its digits.
    region: &'a str,
    tag: &'a str,
    number: &'a str,
    rest: &'a str,
}

/// Split a version into base, rc tag, rc number and trailing remainder.
///
/// Versions without a recognised marker come back whole, so dash-separated
/// build identifiers such as `1.8.23-20100128-r1100` stay in the base.
pub fn split_rc(version: &str) -> VersionSplit<'_> {
    match find_rc(version) {
        Some(found) if !found.region.is_empty() => VersionSplit {
            base: found.prefix,
            rc_tag: Some(found.tag),
            rc_number: Some(found.number),
            remainder: Some(found.rest),
        },
        _ => VersionSplit::whole(version),
    }
}

/// Scan for the shortest prefix followed by `[.][-]<tag><digits>`.
fn find_rc(version: &str) -> Option<RcMatch<'_>> {
    for (start, _) in version.char_indices() {
        let candidate = &version[start..];
        let candidate = candidate.strip_prefix('.').unwrap_or(candidate);
        let region_start = version.len() - candidate.len();
        let candidate = candidate.strip_prefix('-').unwrap_or(candidate);

        let Some(tag_len) = RC_TAGS
            .iter()
            .find(|tag| starts_with_ignore_case(candidate, tag))
            .map(|tag| tag.len())
        else {
            continue;
        };

        let (tag, after) = candidate.split_at(tag_len);
        let digits = after
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after.len());
        let (number, rest) = after.split_at(digits);
        let region_end = version.len() - rest.len();

        return Some(RcMatch {
            prefix: &version[..start],
            region: &version[region_start..region_end],
            tag,
            number,
            rest,
        });
    }
    None
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

/// Compare two upstream versions; `Greater` means `v1` is newer.
///
/// Bases are compared first. With equal bases a release without an rc tag
/// beats any tagged one; two tagged versions compare their tags
/// (case-insensitively, by segment order) and then their rc numbers.
/// The trailing remainders break the final tie.
pub fn upstream_compare(v1: &str, v2: &str) -> Ordering {
    let left = split_rc(v1);
    let right = split_rc(v2);

    let diff = compare_values(Some(left.base), Some(right.base));
    if diff != Ordering::Equal {
        return diff;
    }

    match (left.rc_tag, right.rc_tag) {
        (Some(tag1), Some(tag2)) => {
            let tag1 = tag1.to_ascii_lowercase();
            let tag2 = tag2.to_ascii_lowercase();
            let diff = compare_values(Some(tag1.as_str()), Some(tag2.as_str()));
            if diff != Ordering::Equal {
                return diff;
            }
            let diff = compare_values(left.rc_number, right.rc_number);
            if diff != Ordering::Equal {
                return diff;
            }
        }
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (None, None) => {}
    }

    compare_values(left.remainder, right.remainder)
}
