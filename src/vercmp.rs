/*============================================================
  Synavera Project: Syn-Syu
  Module: synsyu_listing::vercmp
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Native rpmvercmp-style ordering of opaque version tokens,
    replacing the external `vercmp` invocation used by
    Syn-Syu-Core with an in-process comparator.

  Security / Safety Notes:
    Pure string processing; no I/O performed in this module.

  Dependencies:
    None beyond std.

  Operational Scope:
    Backs the upstream comparator that decides which listing
    entry supersedes another.

  Revision History:
    2025-11-12 COD  Ported segment ordering in-process.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic ordering, quirks preserved
    - No allocation on the comparison hot path
============================================================*/

use std::cmp::Ordering;

/// Compare two version tokens segment by segment.
///
/// Separators other than `~` are skipped, `~` sorts before everything
/// (including the end of the string), numeric segments outrank alpha
/// segments and compare by magnitude, alpha segments compare bytewise.
/// When one side runs out first the side with characters left wins.
pub fn compare_segments(left: &str, right: &str) -> Ordering {
    if left == right {
        return Ordering::Equal;
    }

    let mut left = left;
    let mut right = right;
    let separator = |c: char| !c.is_ascii_alphanumeric() && c != '~';

    while !left.is_empty() || !right.is_empty() {
        left = left.trim_start_matches(separator);
        right = right.trim_start_matches(separator);

        match (left.strip_prefix('~'), right.strip_prefix('~')) {
            (Some(l), Some(r)) => {
                left = l;
                right = r;
            }
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => {}
        }

        if left.is_empty() || right.is_empty() {
            break;
        }

        let numeric = left.starts_with(|c: char| c.is_ascii_digit());
        let (segment1, rest1, segment2, rest2) = if numeric {
            let (s1, r1) = leading_run(left, |c| c.is_ascii_digit());
            let (s2, r2) = leading_run(right, |c| c.is_ascii_digit());
            (s1, r1, s2, r2)
        } else {
            let (s1, r1) = leading_run(left, |c| c.is_ascii_alphabetic());
            let (s2, r2) = leading_run(right, |c| c.is_ascii_alphabetic());
            (s1, r1, s2, r2)
        };
        left = rest1;
        right = rest2;

        // Segments of different kinds: numeric beats alpha, alpha loses to anything.
        if segment2.is_empty() {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let ordering = if numeric {
            let segment1 = segment1.trim_start_matches('0');
            let segment2 = segment2.trim_start_matches('0');
            segment1
                .len()
                .cmp(&segment2.len())
                .then_with(|| segment1.cmp(segment2))
        } else {
            segment1.cmp(segment2)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    left.chars().count().cmp(&right.chars().count())
}

/// Compare optional version components; an absent component is always older.
pub fn compare_values(left: Option<&str>, right: Option<&str>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (Some(left), Some(right)) => compare_segments(left, right),
    }
}

/// Split off the maximal leading run of characters matching `class`.
fn leading_run(value: &str, class: impl Fn(char) -> bool) -> (&str, &str) {
    let end = value.find(|c: char| !class(c)).unwrap_or(value.len());
    value.split_at(end)
}
