use anyhow::Result;
use herg_brick::{config::USAGE, pipeline, Config};
use std::{env, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("fatal: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<()> {
    // ─── 2) configure dirs ───────────────────────────────────────────
    let Some(cfg) = Config::from_args(env::args().skip(1))? else {
        println!("{}", USAGE);
        return Ok(());
    };
    info!(
        input = %cfg.input_dir.display(),
        output = %cfg.output_dir.display(),
        "startup"
    );

    // ─── 3) build bricks ─────────────────────────────────────────────
    let report = pipeline::run(&cfg)?;
    info!(
        written = report.written.len(),
        failed = report.failures.len(),
        "all done"
    );
    Ok(())
}
