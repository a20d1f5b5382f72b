//! Holds the known (input, output) pairs for the function under
//! synthesis and checks a completed candidate against all of them.
//!
//! Grounded on `original_source/gen2.cc`'s `class Verifier` (and its
//! earlier `generator.cc::Verifier::action`) — an append-only list of
//! pairs plus a single-method acceptance check, unchanged in shape here.
//! Logging density (debug per rejected-candidate checkpoint, info on a
//! match) follows the teacher crate's own convergence-loop logging
//! (`examples/krukah-robopoker/src/analysis/server.rs` logs a single
//! `info!` at a loop's start, `debug!` for the high-frequency interior).

use crate::expr::{run, Pool, Val};

/// Every rejected-candidate count that's a multiple of this gets a
/// `debug!` checkpoint — matches the cadence the driver already uses
/// for its own time-budget check (DESIGN.md `src/driver.rs`), so one
/// counter can serve both.
const LOG_EVERY: usize = 1 << 23;

pub struct Verifier {
    pairs: Vec<(Val, Val)>,
    checked: usize,
}

impl Verifier {
    pub fn new() -> Self {
        Verifier {
            pairs: Vec::new(),
            checked: 0,
        }
    }

    /// Records a known (input, output) pair. Append-only: a counter-
    /// example from a failed `guess` is never allowed to contradict an
    /// already-recorded pair, only add to the set (spec.md §4.5).
    pub fn add(&mut self, input: Val, output: Val) {
        debug_assert!(
            self.pairs.iter().all(|&(i, o)| i != input || o == output),
            "counter-example contradicts a previously recorded pair"
        );
        self.pairs.push((input, output));
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[(Val, Val)] {
        &self.pairs
    }

    pub fn checked_count(&self) -> usize {
        self.checked
    }

    /// True iff `root` agrees with every recorded pair.
    pub fn accepts(&mut self, pool: &Pool, root: usize) -> bool {
        self.checked += 1;
        if self.checked % LOG_EVERY == 0 {
            log::debug!(
                "verifier: {} candidates checked against {} pairs so far",
                self.checked,
                self.pairs.len()
            );
        }
        let matches = self
            .pairs
            .iter()
            .all(|&(input, expected)| run(pool, root, input) == expected);
        if matches {
            log::info!(
                "verifier: candidate matches all {} known pairs after {} candidates checked",
                self.pairs.len(),
                self.checked
            );
        }
        matches
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{Arena, OpSet};
    use crate::expr::program_string;

    #[test]
    fn accepts_only_programs_matching_every_pair() {
        let mut v = Verifier::new();
        v.add(0, 0);
        v.add(1, 1);
        v.add(2, 2);

        let mut arena = Arena::new(OpSet::all(), 0);
        let mut found = None;
        arena.generate(4, 1, &mut |pool, root, _size| {
            if v.accepts(pool, root) {
                found = Some(program_string(pool, root));
                return false;
            }
            true
        });
        assert_eq!(found.as_deref(), Some("(lambda (x0) x0)"));
    }

    #[test]
    fn rejects_when_no_pair_set() {
        let mut v = Verifier::new();
        v.add(5, 9);
        let mut arena = Arena::new(OpSet::all(), 0);
        arena.generate(2, 1, &mut |pool, root, _size| {
            assert!(!v.accepts(pool, root) || run_matches(pool, root));
            true
        });
    }

    fn run_matches(pool: &Pool, root: usize) -> bool {
        run(pool, root, 5) == 9
    }
}
