use std::process::ExitCode;

use anyhow::Context;
use log::error;
use mediashell_engine::{Config, ShellContext};

fn main() -> ExitCode {
    // RUST_LOG overrides the level; wgpu logs show up there too.
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,mediashell_engine=info"),
    )
    .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config = Config::builtin().context("built-in configuration is invalid")?;

    let ctx = ShellContext::new(config).context("Failed to initialize!")?;
    ctx.run().context("Failed to initialize!")?;
    Ok(())
}
