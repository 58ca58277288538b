use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

/// Write `report` as pretty-printed JSON, creating parent directories
pub fn write<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    println!(
        "\n\n{} Report saved to: {}",
        "📄".blue(),
        path.display().to_string().cyan()
    );
    Ok(())
}
