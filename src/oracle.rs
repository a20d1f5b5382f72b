//! HTTP client for the contest's `eval`/`guess`/`train`/`myproblems`
//! endpoints (spec.md §6). Kept thin and concrete — a complete crate
//! can't compile without some transport — but outside the core's line
//! budget per spec.md §1.
//!
//! Wire shape (URL, auth-as-query-param, JSON body) grounded on
//! `original_source/protocol.cc`'s `Protocol::send` (`http://<base>/
//! <command>?auth=<token>`, a POSTed JSON body, a JSON response parsed
//! back). The Rust client shape itself — an async `reqwest::Client`
//! held alongside config, one method per endpoint returning a typed
//! `Result` — is grounded on `examples/logannye-tinyzkp`'s `Kvs` client
//! in `src/bin/tinyzkp_api.rs` (`auth()` header/query injection,
//! `serde_json` round-tripping through a thin wrapper struct).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::OracleError;

const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// The contest encodes every `u64` as a `"0x"`-prefixed lowercase hex
/// string rather than a JSON number — neither `serde` nor `serde_json`
/// round-trips that natively, so values that cross the wire as hex64
/// go through this small serde module instead of deriving straight off
/// `u64`.
mod hex64 {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &u64, s: S) -> Result<S::Ok, S::Error> {
        format!("0x{v:x}").serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let s = String::deserialize(d)?;
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        u64::from_str_radix(digits, 16).map_err(serde::de::Error::custom)
    }

    pub mod vec {
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S: Serializer>(v: &[u64], s: S) -> Result<S::Ok, S::Error> {
            let hexed: Vec<String> = v.iter().map(|x| format!("0x{x:x}")).collect();
            hexed.serialize(s)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u64>, D::Error> {
            let raw: Vec<String> = Vec::deserialize(d)?;
            raw.iter()
                .map(|s| {
                    let digits = s.strip_prefix("0x").unwrap_or(s);
                    u64::from_str_radix(digits, 16).map_err(serde::de::Error::custom)
                })
                .collect()
        }
    }
}

#[derive(Serialize)]
struct EvalRequest<'a> {
    id: &'a str,
    #[serde(with = "hex64::vec")]
    arguments: &'a [u64],
}

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum EvalResponse {
    Ok {
        #[serde(with = "hex64::vec")]
        outputs: Vec<u64>,
    },
    Error {
        message: Option<String>,
    },
}

#[derive(Serialize)]
struct GuessRequest<'a> {
    id: &'a str,
    program: &'a str,
}

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum GuessResponse {
    Win,
    Mismatch {
        #[serde(with = "hex64::vec")]
        values: Vec<u64>,
    },
    Error {
        message: Option<String>,
    },
}

/// Result of a `guess` round-trip (spec.md §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    Win,
    Mismatch { input: u64, expected: u64, got: u64 },
}

#[derive(Serialize)]
struct TrainRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operators: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainTask {
    pub id: String,
    pub size: u32,
    pub operators: Vec<String>,
    pub challenge: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProblemSummary {
    pub id: String,
    pub size: u32,
    pub operators: Vec<String>,
    #[serde(default)]
    pub solved: Option<bool>,
    #[serde(rename = "timeLeft")]
    #[serde(default)]
    pub time_left: Option<f64>,
}

pub struct Oracle {
    http: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl Oracle {
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Oracle {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            auth_token: auth_token.into(),
        }
    }

    fn url(&self, command: &str) -> String {
        format!("{}/{}?auth={}", self.base_url, command, self.auth_token)
    }

    /// POSTs `body` to `command`, retrying transport/decode failures
    /// `RETRY_ATTEMPTS` times with a short fixed backoff (spec.md §7:
    /// transport failures are soft, retried; the overall time budget
    /// dominates so no exponential backoff is needed). A parsed
    /// `{"status":"error"}` body is never retried — it's fatal.
    async fn send<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        command: &str,
        body: &B,
    ) -> Result<R, OracleError> {
        let url = self.url(command);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_send(&url, body).await {
                Ok(r) => return Ok(r),
                Err(e @ OracleError::Rejected(_)) => return Err(e),
                Err(e) if attempt < RETRY_ATTEMPTS => {
                    log::debug!("oracle {command} attempt {attempt} failed: {e}; retrying");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_send<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, OracleError> {
        let text = self.http.post(url).json(body).send().await?.text().await?;
        serde_json::from_str(&text).map_err(OracleError::Decode)
    }

    pub async fn eval(&self, id: &str, args: &[u64]) -> Result<Vec<u64>, OracleError> {
        let req = EvalRequest { id, arguments: args };
        match self.send(command_eval(), &req).await? {
            EvalResponse::Ok { outputs } => Ok(outputs),
            EvalResponse::Error { message } => {
                Err(OracleError::Rejected(message.unwrap_or_default()))
            }
        }
    }

    pub async fn guess(&self, id: &str, program: &str) -> Result<GuessOutcome, OracleError> {
        let req = GuessRequest { id, program };
        match self.send(command_guess(), &req).await? {
            GuessResponse::Win => Ok(GuessOutcome::Win),
            GuessResponse::Mismatch { values } => {
                if values.len() != 3 {
                    return Err(OracleError::Rejected(format!(
                        "mismatch response carried {} values, expected 3",
                        values.len()
                    )));
                }
                Ok(GuessOutcome::Mismatch {
                    input: values[0],
                    expected: values[1],
                    got: values[2],
                })
            }
            GuessResponse::Error { message } => {
                Err(OracleError::Rejected(message.unwrap_or_default()))
            }
        }
    }

    pub async fn train(
        &self,
        size: Option<u32>,
        operators: Option<&[String]>,
    ) -> Result<TrainTask, OracleError> {
        let req = TrainRequest {
            size,
            operators: operators.map(<[String]>::to_vec),
        };
        self.send(command_train(), &req).await
    }

    pub async fn myproblems(&self) -> Result<Vec<ProblemSummary>, OracleError> {
        self.send(command_myproblems(), &serde_json::json!({})).await
    }
}

const fn command_eval() -> &'static str {
    "eval"
}
const fn command_guess() -> &'static str {
    "guess"
}
const fn command_train() -> &'static str {
    "train"
}
const fn command_myproblems() -> &'static str {
    "myproblems"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex64_round_trips_through_serde_json() {
        #[derive(Serialize, Deserialize)]
        struct W(#[serde(with = "hex64")] u64);

        let w = W(0x1122334455667788);
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, "\"0x1122334455667788\"");
        let back: W = serde_json::from_str(&json).unwrap();
        assert_eq!(back.0, w.0);
    }

    #[test]
    fn hex64_vec_round_trips() {
        #[derive(Serialize, Deserialize)]
        struct W(#[serde(with = "hex64::vec")] Vec<u64>);

        let w = W(vec![0, 1, u64::MAX]);
        let json = serde_json::to_string(&w).unwrap();
        let back: W = serde_json::from_str(&json).unwrap();
        assert_eq!(back.0, w.0);
    }

    #[test]
    fn eval_response_ok_variant_parses() {
        let json = r#"{"status":"ok","outputs":["0x1","0x2"]}"#;
        let parsed: EvalResponse = serde_json::from_str(json).unwrap();
        match parsed {
            EvalResponse::Ok { outputs } => assert_eq!(outputs, vec![1, 2]),
            _ => panic!("expected Ok variant"),
        }
    }

    #[test]
    fn guess_response_mismatch_variant_parses() {
        let json = r#"{"status":"mismatch","values":["0x3","0x1","0x0"]}"#;
        let parsed: GuessResponse = serde_json::from_str(json).unwrap();
        match parsed {
            GuessResponse::Mismatch { values } => assert_eq!(values, vec![3, 1, 0]),
            _ => panic!("expected Mismatch variant"),
        }
    }

    #[test]
    fn url_carries_auth_as_query_param() {
        let oracle = Oracle::new("http://example.test", "tok123");
        assert_eq!(oracle.url("eval"), "http://example.test/eval?auth=tok123");
    }
}
