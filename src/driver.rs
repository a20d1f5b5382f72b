//! Ties the pieces together: probes the oracle with a fixed input
//! suite, derives the top-level shift mask and operator set/fold mode
//! from the problem's declared grammar, then streams candidates from
//! `fold::generate` through a `Verifier` under a wall-clock budget,
//! submitting `guess` on a match and resuming on a counter-example.
//!
//! Probe suite and shift-mask derivation grounded on
//! `original_source/protocol.cc`'s `Protocol::challenge` (its literal
//! 13-input array, extended here per spec.md §4.6's description of a
//! ~50-input suite) and spec.md §4.6's bit-mask rules. Progress
//! reporting grounded on `robopoker::progress()`
//! (`examples/krukah-robopoker/src/lib.rs`); the `spawn_blocking` split
//! between the enumerator (a pure CPU loop) and the oracle round-trips
//! (async I/O) is this crate's one addition to spec.md's single-
//! threaded model (SPEC_FULL.md §5), kept so a Ctrl-C handler stays
//! responsive while a size's enumeration runs.

use std::time::{Duration, Instant};

use crate::arena::{OpSet, NO_TOP_SHL1, NO_TOP_SHR1, NO_TOP_SHR16, NO_TOP_SHR4};
use crate::config::Config;
use crate::expr::{program_string, Op, Val};
use crate::fold::{self, FoldMode};
use crate::oracle::{GuessOutcome, Oracle};
use crate::verify::Verifier;

/// Fixed probe suite used to populate the verifier table before
/// enumeration begins (spec.md §4.6). The first thirteen are
/// `original_source/protocol.cc`'s own literal `Protocol::challenge`
/// array; the rest round the suite out to the "zero, all-ones, sparse
/// bit patterns, byte-aligned masks, a handful of irregular values"
/// spec.md describes, at roughly the stated ~50-input scale.
pub const PROBE_SUITE: &[Val] = &[
    0xB445FBB8CDDCF9F8,
    0xEFE7EA693DD952DE,
    0x6D326AEEB275CF14,
    0xBB5F96D91F43B9F3,
    0xF246BDD3CFDEE59E,
    0x28E6839E4B1EEBC1,
    0x9273A5C811B2217B,
    0xA841129BBAB18B3E,
    0x0,
    0x1,
    0xaa5555aa5555aaaa,
    0xff00000000000000,
    0x00ff000000000000,
    0xFFFFFFFFFFFFFFFF,
    0x8000000000000000,
    0x7FFFFFFFFFFFFFFF,
    0xFFFFFFFF00000000,
    0x00000000FFFFFFFF,
    0x0100000000000000,
    0x0001000000000000,
    0x0000010000000000,
    0x0000000100000000,
    0x0000000001000000,
    0x0000000000010000,
    0x0000000000000100,
    0x00000000000000FF,
    0x000000000000FFFF,
    0x0000000000FFFFFF,
    0x000000FFFFFFFFFF,
    0x0000FFFFFFFFFFFF,
    0x00FFFFFFFFFFFFFF,
    0x5555555555555555,
    0xAAAAAAAAAAAAAAAA,
    0x3333333333333333,
    0xCCCCCCCCCCCCCCCC,
    0x0F0F0F0F0F0F0F0F,
    0xF0F0F0F0F0F0F0F0,
    0x0123456789ABCDEF,
    0xFEDCBA9876543210,
    0x1122334455667788,
    0xDEADBEEFCAFEBABE,
    0x123456789ABCDE0F,
    0x0ABCDEF012345678,
    0x42,
    0x100,
    0x10000,
    0x100000000,
    0x2,
    0x4,
];

/// Derives the top-level shift-forbid mask from observed oracle
/// outputs (spec.md §4.6): a shift can never be the program's own root
/// operator if some observed output has a bit set that the shift's
/// result would always leave clear.
pub fn shift_mask(outputs: &[Val]) -> u8 {
    let mut mask = 0u8;
    for &o in outputs {
        if o & 0x1 != 0 {
            mask |= NO_TOP_SHL1;
        }
        if o & (1u64 << 63) != 0 {
            mask |= NO_TOP_SHR1;
        }
        if o & 0xF000_0000_0000_0000 != 0 {
            mask |= NO_TOP_SHR4;
        }
        if o & 0xFFFF_0000_0000_0000 != 0 {
            mask |= NO_TOP_SHR16;
        }
    }
    mask
}

/// Translates the contest's declared operator-string subset (spec.md
/// §6/§9) into an allowed-operator bitmask plus a fold mode. `tfold`
/// and `bonus` are modes, not operators; `tfold` implies `fold` is
/// permitted internally at exactly one fixed position (the TFOLD
/// wrapper builds that FOLD node itself, so `Op::Fold` needn't be
/// independently selectable inside the body).
pub fn parse_operators(names: &[String]) -> (OpSet, FoldMode) {
    let mut allowed = OpSet::empty();
    allowed.insert(Op::C0);
    allowed.insert(Op::C1);
    allowed.insert(Op::Var(0));
    let mut mode = FoldMode::Free;
    for name in names {
        match name.as_str() {
            "and" => allowed.insert(Op::And),
            "or" => allowed.insert(Op::Or),
            "xor" => allowed.insert(Op::Xor),
            "plus" => allowed.insert(Op::Plus),
            "not" => allowed.insert(Op::Not),
            "shl1" => allowed.insert(Op::Shl1),
            "shr1" => allowed.insert(Op::Shr1),
            "shr4" => allowed.insert(Op::Shr4),
            "shr16" => allowed.insert(Op::Shr16),
            "if0" => allowed.insert(Op::If0),
            "fold" => allowed.insert(Op::Fold),
            "tfold" => {
                allowed.insert(Op::Fold);
                mode = FoldMode::Tfold;
            }
            "bonus" => mode = FoldMode::Bonus,
            other => log::warn!("driver: unrecognized operator string {other:?}, ignoring"),
        }
    }
    (allowed, mode)
}

/// How many checked candidates pass between a time-budget check and a
/// progress-bar tick — matches `verify.rs`'s own checkpoint cadence so
/// one counter can drive both (spec.md §5: "every 2^23 candidates").
const CHECKPOINT_EVERY: u64 = 1 << 20;

pub struct Driver {
    config: Config,
}

impl Driver {
    pub fn new(config: Config) -> Self {
        Driver { config }
    }

    /// Solves one challenge end to end: probes the oracle, derives the
    /// shift mask, then loops enumerate-against-verifier / guess until
    /// a win, a time-out, or an oracle rejection. Returns `true` iff
    /// the oracle confirmed the candidate as a win.
    pub async fn solve(
        &self,
        oracle: &Oracle,
        id: &str,
        size: usize,
        operators: &[String],
    ) -> anyhow::Result<bool> {
        let (allowed, mode) = parse_operators(operators);

        let mut verifier = Verifier::new();
        let outputs = oracle.eval(id, PROBE_SUITE).await?;
        for (&input, &output) in PROBE_SUITE.iter().zip(outputs.iter()) {
            verifier.add(input, output);
        }
        let top_shift_forbid = shift_mask(&outputs);
        log::info!(
            "driver: probed {id} ({} pairs, shift mask {top_shift_forbid:#04b}), searching size {size}",
            verifier.pair_count()
        );

        let started = Instant::now();
        let budget = self.config.time_budget;
        let progress = crate::progress(1 << 30);

        loop {
            let pairs = verifier.pairs().to_vec();
            let elapsed_already = started.elapsed();
            if elapsed_already >= budget {
                log::warn!("driver: time budget exhausted before searching {id}");
                progress.finish_and_clear();
                return Ok(false);
            }
            let remaining = budget - elapsed_already;
            let progress_task = progress.clone();

            let found = tokio::task::spawn_blocking(move || {
                search_once(mode, allowed, top_shift_forbid, size, &pairs, remaining, &progress_task)
            })
            .await
            .map_err(|e| anyhow::anyhow!("enumeration task panicked: {e}"))?;

            match found {
                SearchResult::TimedOut => {
                    log::warn!("driver: time budget exhausted mid-search for {id}");
                    progress.finish_and_clear();
                    return Ok(false);
                }
                SearchResult::Exhausted => {
                    progress.finish_and_clear();
                    anyhow::bail!(
                        "enumerator exhausted every candidate of size {size} without a match for {id}"
                    );
                }
                SearchResult::Found(program) => match oracle.guess(id, &program).await? {
                    GuessOutcome::Win => {
                        log::info!("driver: solved {id} with {program}");
                        progress.finish_and_clear();
                        return Ok(true);
                    }
                    GuessOutcome::Mismatch { input, expected, got } => {
                        log::info!(
                            "driver: guess for {id} mismatched (f({input:#x}) = {expected:#x}, got {got:#x}); resuming"
                        );
                        verifier.add(input, expected);
                    }
                },
            }
        }
    }
}

enum SearchResult {
    Found(String),
    TimedOut,
    Exhausted,
}

/// The blocking half of `solve`'s loop body: a single full enumeration
/// pass against the current (possibly counter-example-extended) pair
/// table, returning the first matching program found.
fn search_once(
    mode: FoldMode,
    allowed: OpSet,
    top_shift_forbid: u8,
    size: usize,
    pairs: &[(Val, Val)],
    remaining: Duration,
    progress: &indicatif::ProgressBar,
) -> SearchResult {
    let started = Instant::now();
    let mut verifier = Verifier::new();
    for &(input, output) in pairs {
        verifier.add(input, output);
    }
    let mut checked: u64 = 0;
    let mut timed_out = false;
    let mut found = None;

    fold::generate(mode, allowed, top_shift_forbid, size, &mut |pool, root, _size| {
        checked += 1;
        if checked % CHECKPOINT_EVERY == 0 {
            progress.inc(CHECKPOINT_EVERY);
            if started.elapsed() >= remaining {
                timed_out = true;
                return false;
            }
        }
        if verifier.accepts(pool, root) {
            found = Some(program_string(pool, root));
            return false;
        }
        true
    });

    match found {
        Some(program) => SearchResult::Found(program),
        None if timed_out => SearchResult::TimedOut,
        None => SearchResult::Exhausted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_mask_forbids_shl1_when_bit0_is_set() {
        assert_eq!(shift_mask(&[0b1]), NO_TOP_SHL1);
    }

    #[test]
    fn shift_mask_forbids_shr1_when_top_bit_is_set() {
        assert_eq!(shift_mask(&[1u64 << 63]), NO_TOP_SHR1);
    }

    #[test]
    fn shift_mask_accumulates_across_outputs() {
        let mask = shift_mask(&[0b1, 1u64 << 63, 0xF000_0000_0000_0000, 0xFFFF_0000_0000_0000]);
        assert_eq!(
            mask,
            NO_TOP_SHL1 | NO_TOP_SHR1 | NO_TOP_SHR4 | NO_TOP_SHR16
        );
    }

    #[test]
    fn shift_mask_is_empty_for_an_identity_like_function() {
        // Any bit pattern is possible in x >> 0, so nothing gets forbidden
        // unless a bit actually lands somewhere a shift result can't reach.
        assert_eq!(shift_mask(&[0xFFFFFFFFFFFFFFFF]), NO_TOP_SHL1 | NO_TOP_SHR1 | NO_TOP_SHR4 | NO_TOP_SHR16);
        assert_eq!(shift_mask(&[0]), 0);
    }

    #[test]
    fn parse_operators_maps_tfold_to_mode_and_permits_fold() {
        let (allowed, mode) = parse_operators(&["tfold".to_string(), "plus".to_string(), "if0".to_string()]);
        assert_eq!(mode, FoldMode::Tfold);
        assert!(allowed.contains(Op::Fold));
        assert!(allowed.contains(Op::Plus));
        assert!(allowed.contains(Op::If0));
    }

    #[test]
    fn parse_operators_maps_bonus_to_mode_without_touching_fold() {
        let (allowed, mode) = parse_operators(&["bonus".to_string(), "and".to_string()]);
        assert_eq!(mode, FoldMode::Bonus);
        assert!(!allowed.contains(Op::Fold));
        assert!(allowed.contains(Op::And));
    }

    #[test]
    fn solves_identity_against_a_fake_oracle_shaped_table() {
        // Scenario 1 (spec.md §8): identity function, size 3, no extra
        // operators — the minimal program (lambda (x0) x0) must verify.
        let allowed = {
            let mut s = OpSet::empty();
            s.insert(Op::C0);
            s.insert(Op::C1);
            s.insert(Op::Var(0));
            s
        };
        let pairs: Vec<(Val, Val)> = PROBE_SUITE.iter().map(|&x| (x, x)).collect();
        let result = search_once(
            FoldMode::Free,
            allowed,
            0,
            3,
            &pairs,
            Duration::from_secs(5),
            &crate::progress(1),
        );
        match result {
            SearchResult::Found(program) => assert_eq!(program, "(lambda (x0) x0)"),
            _ => panic!("expected to find the identity program"),
        }
    }
}
