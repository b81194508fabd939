/*============================================================
  Synavera Project: Syn-Syu
  Module: synsyu_listing::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise Syn-Syu listing scanner error types to provide
    consistent diagnostics and exit semantics.

  Security / Safety Notes:
    Error contexts carry listing line numbers and file paths
    only; listing contents are never echoed in full.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used across modules to propagate fatal failures and
    consolidate exit codes for the binary entry point.

  Revision History:
    2025-11-12 COD  Derived listing scanner error taxonomy.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// Result alias for Syn-Syu listing operations.
pub type Result<T> = std::result::Result<T, SynsyuError>;

/// Enumerates high-level error domains surfaced by the listing scanner.
#[derive(Debug, Error)]
pub enum SynsyuError {
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Listing line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("Pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SynsyuError {
    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SynsyuError::Config(_) => ExitCode::from(20),
            SynsyuError::Parse { .. } => ExitCode::from(21),
            SynsyuError::Pattern(_) => ExitCode::from(50),
            SynsyuError::Serialization(_) => ExitCode::from(31),
            SynsyuError::Filesystem(_) => ExitCode::from(40),
            SynsyuError::Io(_) => ExitCode::from(41),
        }
    }

    /// Attach a listing line number to a parse failure raised without one.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            SynsyuError::Parse { reason, .. } => SynsyuError::Parse { line, reason },
            other => other,
        }
    }
}
