use crate::data::AppSettings;
use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_config_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir)?;
    println!("Config initialized in {}", dir.display());
    Ok(())
}

/// Writes the default config.yaml into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    AppSettings::default().save_to(dir)?;
    info!(dir = %dir.display(), "wrote default config");
    Ok(())
}
