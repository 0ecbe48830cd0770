use anyhow::Result;
use std::path::Path;

use flux_messages::{msg, MESSAGES};
use flux_plugin::Registry;

use super::interactive::collect_app_config;
use crate::kubectl;
use crate::terminal::DialoguerPrompter;

/// Run the questions and store the answers for later `generate --config` runs.
pub fn handle_init(file: &Path, no_cluster: bool) -> Result<()> {
    let lister = kubectl::connect(no_cluster);
    let registry = Registry::new(lister.clone());
    let mut prompter = DialoguerPrompter::new();

    let config = collect_app_config(&mut prompter, &registry, lister.as_deref())?;
    config.save(file)?;

    println!(
        "{}",
        msg!(MESSAGES.common.config_saved, path = file.display())
    );
    Ok(())
}
