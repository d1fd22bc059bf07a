use std::path::Path;

use anyhow::Context;
use pulse_core::ConfigStore;

pub fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    let store = ConfigStore::new(path);
    let registry = store
        .generate(force)
        .context("could not generate configuration")?;
    println!("✓ Wrote {} endpoint(s) to {}", registry.len(), path.display());
    println!("  Edit the file or run `pulse` to manage endpoints interactively.");
    Ok(())
}
