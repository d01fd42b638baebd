pub mod init;
pub mod learners;
pub mod practice;

use std::path::PathBuf;

use anyhow::Result;
use learnify_providers::{load_config, LearnifyConfig};
use learnify_store::RosterStore;

/// Load config and open the roster, honoring a `--store` override.
pub fn open_store(
    config_path: Option<&std::path::Path>,
    store_override: Option<PathBuf>,
) -> Result<(LearnifyConfig, RosterStore)> {
    let config = load_config(config_path)?;
    let store_path = store_override.unwrap_or_else(|| config.store_path.clone());
    let store = RosterStore::open(store_path)?;
    Ok((config, store))
}
