//! Typed errors for the two fallible boundaries: the oracle's HTTP
//! transport, and the solver's own internal invariants.
//!
//! Grounded on `examples/logannye-tinyzkp`'s per-module `thiserror`
//! enums (`DomainError` in `src/domain.rs`, `PcsError` and siblings
//! elsewhere in that crate) — one small enum per concern rather than a
//! single crate-wide error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("oracle response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("oracle rejected the request: {0}")]
    Rejected(String),

    #[error("BV_AUTH_TOKEN is not set")]
    MissingAuthToken,
}

/// Violations of an `Arena` invariant — these indicate a bug in the
/// enumerator itself (P4, arena integrity), not a runtime condition a
/// caller can recover from. The driver surfaces these as a panic with
/// a diagnostic rather than threading them through `Result` (spec.md
/// §7: "bug-class only").
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("operator {op} expects {expected} operands, found {found}")]
    ArityMismatch {
        op: String,
        expected: usize,
        found: usize,
    },

    #[error("valence stack underflowed while building a candidate")]
    ValenceUnderflow,

    #[error("time budget ({budget_ms}ms) exhausted before a solution was found")]
    BudgetExhausted { budget_ms: u64 },
}
