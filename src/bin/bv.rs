//! `bv` — the CLI entry point (spec.md §6).
//!
//! Grounded on the teacher crate's thin `#[tokio::main]` bins
//! (`src/bin/{analyze,trainer}.rs`: parse/init, then dispatch into a
//! library-level type and `await` it) and `src/analysis/query.rs`'s
//! `Query::parse()` usage pattern.

use std::process::ExitCode;

use clap::Parser;

use bv_solver::cli::Command;
use bv_solver::config::Config;
use bv_solver::driver::Driver;
use bv_solver::error::OracleError;
use bv_solver::inventory::{self, Inventory};
use bv_solver::oracle::Oracle;

#[tokio::main]
async fn main() -> ExitCode {
    let command = match Command::try_parse() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let config = Config::from_env();
    bv_solver::init(&config);

    match run(command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    let oracle = authorized_oracle(config)?;
    match command {
        Command::Print => {
            let problems = oracle.myproblems().await?;
            Inventory::summarize(&problems).print();
        }
        Command::Train { size } => {
            let task = oracle.train(Some(size), None).await?;
            log::info!(
                "driver: training task {} (size {}, operators {:?})",
                task.id,
                task.size,
                task.operators
            );
            solve_and_report(&oracle, config, &task.id, task.size as usize, &task.operators).await?;
        }
        Command::SolveMy { size } => {
            let problems = oracle.myproblems().await?;
            let pick = inventory::nearest_unsolved(&problems, size)
                .ok_or_else(|| anyhow::anyhow!("no unsolved myproblems entries"))?
                .clone();
            solve_and_report(&oracle, config, &pick.id, pick.size as usize, &pick.operators).await?;
        }
        Command::Chal { id, size } => {
            solve_and_report(&oracle, config, &id, size as usize, &[]).await?;
        }
    }
    Ok(())
}

fn authorized_oracle(config: &Config) -> anyhow::Result<Oracle> {
    let token = config.auth_token.clone().ok_or(OracleError::MissingAuthToken)?;
    Ok(Oracle::new(config.oracle_base_url.clone(), token))
}

async fn solve_and_report(
    oracle: &Oracle,
    config: &Config,
    id: &str,
    size: usize,
    operators: &[String],
) -> anyhow::Result<()> {
    let driver = Driver::new(config.clone());
    let won = driver.solve(oracle, id, size, operators).await?;
    if won {
        println!("solved {id}");
    } else {
        println!("gave up on {id} (time budget exhausted)");
    }
    Ok(())
}
