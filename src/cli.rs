//! The `bv` binary's subcommands (spec.md §6).
//!
//! Grounded on the teacher crate's `src/analysis/query.rs`
//! (`#[derive(Parser)]` over an enum of subcommands, one `#[command
//! (about = ..., alias = ...)]` per variant) — the same derive shape,
//! generalized from that crate's read-only query commands to this
//! crate's train/solve/inspect surface.

use clap::Parser;

#[derive(Parser)]
#[command(name = "bv", author, version, about = "ICFP 2013 BV contest solver", long_about = None)]
pub enum Command {
    #[command(about = "List myproblems, grouped by size and solved state")]
    Print,

    #[command(about = "Request a training problem of the given size and solve it")]
    Train {
        #[arg(required = true)]
        size: u32,
    },

    #[command(about = "Pick an unsolved myproblems entry near the given size and solve it", alias = "solve_my")]
    SolveMy {
        #[arg(required = true)]
        size: u32,
    },

    #[command(about = "Solve a specific already-known challenge id/size pair")]
    Chal {
        #[arg(required = true)]
        id: String,
        #[arg(required = true)]
        size: u32,
    },
}
