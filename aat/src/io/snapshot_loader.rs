//! Snapshot archive loading

use aat::SnapshotArchive;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use std::path::Path;
use tracing::info;

/// Reads a snapshot archive, choosing JSON or YAML by file extension.
pub fn load_archive(path: &str) -> Result<SnapshotArchive> {
    info!("Reading snapshot archive from: {}", path);
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Unable to read snapshot archive: {}", path))?;

    let is_json = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let archive = if is_json {
        SnapshotArchive::from_json(&content)
    } else {
        SnapshotArchive::from_yaml(&content)
    }
    .wrap_err_with(|| format!("Failed to parse snapshot archive: {}", path))?;

    info!(
        "Loaded {} atoms, {} basis sets",
        archive.n_atoms,
        archive.basis_sets.len()
    );
    Ok(archive)
}
