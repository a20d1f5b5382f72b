//! Bookkeeping over the account's `myproblems` list: the `print`
//! subcommand's per-size solved/unsolved histogram, and picking an
//! unsolved problem near a requested size for `solve-my`.
//!
//! Grounded on `original_source/protocol.cc`'s `Protocol::print_tasks`
//! (the `sizes[31]` per-size solved counter, the `size <= 30` bucket
//! cap matching the contest's own program-size ceiling) — reshaped
//! from hand-rolled `printf` formatting into a small `serde_json`-
//! friendly summary type, the way the teacher crate reaches for
//! `serde_json` for any ad hoc JSON shape rather than string-building.

use crate::oracle::ProblemSummary;

/// Largest program size the contest ever assigns (mirrors
/// `original_source/protocol.cc`'s own `sizes[31]` bucket array).
const MAX_BUCKET_SIZE: usize = 30;

#[derive(Debug, Clone, serde::Serialize)]
pub struct SizeBucket {
    pub size: usize,
    pub solved: usize,
    pub unsolved: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Inventory {
    pub total: usize,
    pub solved: usize,
    pub buckets: Vec<SizeBucket>,
}

impl Inventory {
    pub fn summarize(problems: &[ProblemSummary]) -> Self {
        let mut solved_counts = vec![0usize; MAX_BUCKET_SIZE + 1];
        let mut unsolved_counts = vec![0usize; MAX_BUCKET_SIZE + 1];
        let mut solved = 0;

        for p in problems {
            let is_solved = p.solved.unwrap_or(false);
            if is_solved {
                solved += 1;
            }
            let size = (p.size as usize).min(MAX_BUCKET_SIZE);
            if is_solved {
                solved_counts[size] += 1;
            } else {
                unsolved_counts[size] += 1;
            }
        }

        let buckets = (0..=MAX_BUCKET_SIZE)
            .filter(|&s| solved_counts[s] > 0 || unsolved_counts[s] > 0)
            .map(|s| SizeBucket {
                size: s,
                solved: solved_counts[s],
                unsolved: unsolved_counts[s],
            })
            .collect();

        Inventory {
            total: problems.len(),
            solved,
            buckets,
        }
    }

    pub fn print(&self) {
        println!("{} / {} problems solved", self.solved, self.total);
        for bucket in &self.buckets {
            println!(
                "  size {:2}: {:3} solved, {:3} unsolved",
                bucket.size, bucket.solved, bucket.unsolved
            );
        }
    }
}

/// Picks the unsolved problem whose declared size is closest to
/// `target` (ties broken toward the smaller size, then by id order),
/// for `bv solve-my`.
pub fn nearest_unsolved(problems: &[ProblemSummary], target: u32) -> Option<&ProblemSummary> {
    problems
        .iter()
        .filter(|p| !p.solved.unwrap_or(false))
        .min_by_key(|p| ((p.size as i64 - target as i64).abs(), p.size, p.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(id: &str, size: u32, solved: bool) -> ProblemSummary {
        ProblemSummary {
            id: id.to_string(),
            size,
            operators: Vec::new(),
            solved: Some(solved),
            time_left: None,
        }
    }

    #[test]
    fn summarize_buckets_by_size_and_solved_state() {
        let problems = vec![
            problem("a", 5, true),
            problem("b", 5, false),
            problem("c", 7, false),
        ];
        let inv = Inventory::summarize(&problems);
        assert_eq!(inv.total, 3);
        assert_eq!(inv.solved, 1);
        let bucket5 = inv.buckets.iter().find(|b| b.size == 5).unwrap();
        assert_eq!(bucket5.solved, 1);
        assert_eq!(bucket5.unsolved, 1);
    }

    #[test]
    fn nearest_unsolved_prefers_closest_size() {
        let problems = vec![
            problem("far", 20, false),
            problem("near", 10, false),
            problem("solved", 9, true),
        ];
        let pick = nearest_unsolved(&problems, 9).unwrap();
        assert_eq!(pick.id, "near");
    }

    #[test]
    fn nearest_unsolved_skips_solved_problems() {
        let problems = vec![problem("solved", 5, true)];
        assert!(nearest_unsolved(&problems, 5).is_none());
    }

    #[test]
    fn sizes_beyond_the_bucket_ceiling_are_clamped() {
        let problems = vec![problem("huge", 99, false)];
        let inv = Inventory::summarize(&problems);
        let bucket = inv.buckets.iter().find(|b| b.size == MAX_BUCKET_SIZE).unwrap();
        assert_eq!(bucket.unsolved, 1);
    }
}
