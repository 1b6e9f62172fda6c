//! Interactive editor window

use anyhow::Result;
use overlap_runtime::EditorConfig;
use std::path::Path;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = EditorConfig::load_or_default(config_path)?;
    log::info!(
        "Opening {}x{} editor window",
        config.window.width,
        config.window.height
    );
    overlap_viewer::run(config)
}
