//! Print the effective configuration

use anyhow::Result;
use overlap_runtime::EditorConfig;
use std::path::Path;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = EditorConfig::load_or_default(config_path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
