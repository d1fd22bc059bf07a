use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use pulse_core::{ConfigStore, Origin};
use pulse_probe::{HttpFetcher, Prober, SweepMode};

use crate::menu::Menu;
use crate::prompt::Prompt;
use crate::shell::Shell;

/// Load the registry and hand control to the interactive shell on the terminal.
///
/// Without `repeat` exactly one menu action runs.
pub async fn run(
    config: &Path,
    mode: SweepMode,
    timeout: Duration,
    repeat: bool,
) -> anyhow::Result<()> {
    let prompt = Prompt::new(std::io::stdin().lock(), std::io::stdout());
    run_with(config, mode, timeout, repeat, prompt).await
}

/// Same as [`run`], reading and writing through `prompt`.
///
/// Fails before anything is printed when the configuration cannot be read.
pub async fn run_with<R: BufRead, W: Write>(
    config: &Path,
    mode: SweepMode,
    timeout: Duration,
    repeat: bool,
    prompt: Prompt<R, W>,
) -> anyhow::Result<()> {
    let menu = Menu::standard().context("invalid menu definition")?;

    let store = ConfigStore::new(config);
    let (registry, origin) = store
        .load_or_default()
        .context("cannot start without a readable configuration")?;
    match origin {
        Origin::File => info!(
            path = %config.display(),
            endpoints = registry.len(),
            "configuration loaded"
        ),
        Origin::Default => info!(
            path = %config.display(),
            "starting from the built-in endpoint list"
        ),
    }

    let prober = Prober::new(HttpFetcher::new(timeout));
    let mut shell = Shell::new(registry, store, prober, menu, prompt, mode);

    if repeat {
        shell.run_until_eof().await?;
    } else {
        shell.run_once().await?;
    }
    Ok(())
}
