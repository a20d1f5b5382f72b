pub mod analyzer;
pub mod arena;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod expr;
pub mod fold;
pub mod inventory;
pub mod oracle;
pub mod verify;

use config::Config;

/// Progress bar for a long-running enumeration, ticked by the driver
/// at the same checkpoint cadence as its time-budget check.
///
/// Grounded on the teacher crate's `progress()` (`src/lib.rs`), kept
/// as-is: a spinner-style template over a bounded total, ticking once
/// a minute on its own in addition to however often the caller calls
/// `inc`.
pub fn progress(n: u64) -> indicatif::ProgressBar {
    let tick = std::time::Duration::from_secs(60);
    let style = "{spinner:.cyan} {elapsed} ~ {percent:>3}% {wide_bar:.cyan} {pos}/{len} candidates";
    let style = indicatif::ProgressStyle::with_template(style).unwrap();
    let progress = indicatif::ProgressBar::new(n);
    progress.set_style(style);
    progress.enable_steady_tick(tick);
    progress
}

/// Installs logging (stderr + a per-run log file under `logs/`) and a
/// Ctrl-C handler that exits the process, same shape as the teacher
/// crate's own `init()` (`src/lib.rs`) minus its database teardown,
/// which this crate has no analog for.
pub fn init(config: &Config) {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("forcing exit");
        std::process::exit(0);
    });
    std::fs::create_dir_all("logs").expect("create logs directory");
    let log_config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        log_config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        config.log_level,
        log_config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
