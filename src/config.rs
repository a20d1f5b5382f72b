//! Process-wide tunables, overridable from the environment without a
//! recompile.
//!
//! Grounded on the teacher crate's top-level `const` block in `lib.rs`
//! (`CFR_BATCH_SIZE`, `SINKHORN_TEMPERATURE`, and friends) — generalized
//! here into a `Config` struct so the same defaults can be overridden by
//! an env var, since this crate talks to a live external contest server
//! rather than running entirely offline.

use std::env;
use std::time::Duration;

pub const DEFAULT_ORACLE_BASE_URL: &str = "http://icfpc2013.cloudapp.net";
pub const DEFAULT_TIME_BUDGET_MS: u64 = 320_000;
pub const DEFAULT_EVAL_BATCH_LIMIT: usize = 256;

#[derive(Debug, Clone)]
pub struct Config {
    pub oracle_base_url: String,
    /// Read from `BV_AUTH_TOKEN`. Unlike `original_source/protocol.cc`,
    /// which hardcodes the contest's auth token as a URL query literal,
    /// this crate treats it as a secret and never gives it a default.
    pub auth_token: Option<String>,
    pub time_budget: Duration,
    pub eval_batch_limit: usize,
    pub log_level: log::LevelFilter,
}

impl Config {
    /// Builds a `Config` from defaults overridden by `BV_*` environment
    /// variables. Does not require `BV_AUTH_TOKEN` to be set — callers
    /// that need the oracle check `auth_token` themselves and surface
    /// `OracleError::MissingAuthToken` (subcommands like `bv print` that
    /// only read local state never touch it).
    pub fn from_env() -> Self {
        Config {
            oracle_base_url: env::var("BV_ORACLE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ORACLE_BASE_URL.to_string()),
            auth_token: env::var("BV_AUTH_TOKEN").ok(),
            time_budget: env::var("BV_TIME_BUDGET_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(DEFAULT_TIME_BUDGET_MS)),
            eval_batch_limit: env::var("BV_EVAL_BATCH_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_EVAL_BATCH_LIMIT),
            log_level: env::var("BV_LOG_LEVEL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(log::LevelFilter::Info),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            oracle_base_url: DEFAULT_ORACLE_BASE_URL.to_string(),
            auth_token: None,
            time_budget: Duration::from_millis(DEFAULT_TIME_BUDGET_MS),
            eval_batch_limit: DEFAULT_EVAL_BATCH_LIMIT,
            log_level: log::LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contest_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.eval_batch_limit, 256);
        assert_eq!(cfg.time_budget, Duration::from_millis(320_000));
        assert!(cfg.auth_token.is_none());
    }
}
