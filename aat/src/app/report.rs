use crate::io::write_tensor_report;
use aat::{AatResult, AatTensor, SnapshotArchive};
use color_eyre::eyre::{Result, WrapErr};
use std::fs::File;
use tracing::info;

const AXES: [&str; 3] = ["x", "y", "z"];

/// Row labels such as "H1 x", falling back to "atom1 x" when the archive
/// lists no elements.
pub fn coordinate_labels(archive: &SnapshotArchive) -> Result<Vec<String>> {
    let elements = archive.elements()?;
    Ok((0..3 * archive.n_atoms)
        .map(|r| {
            let atom = r / 3;
            let symbol = elements
                .get(atom)
                .map(|e| e.get_symbol())
                .unwrap_or("atom");
            format!("{}{} {}", symbol, atom + 1, AXES[r % 3])
        })
        .collect())
}

fn log_tensor(title: &str, tensor: &AatTensor, labels: &[String]) {
    info!("\n{}:", title);
    info!("  {:<10} {:>16} {:>16} {:>16}", "", "Bx", "By", "Bz");
    for (r, row) in tensor.row_iter().enumerate() {
        info!(
            "  {:<10} {:>+16.10} {:>+16.10} {:>+16.10}",
            labels[r], row[0], row[1], row[2]
        );
    }
}

fn sections(result: &AatResult) -> Vec<(&'static str, AatTensor)> {
    match result {
        AatResult::Uncorrelated(tensor) => vec![("Total AAT", tensor.clone())],
        AatResult::Correlated(channels) => vec![
            ("Reference-reference AAT", channels.ref_ref.clone()),
            ("Reference-double AAT", channels.ref_double.clone()),
            ("Double-reference AAT", channels.double_ref.clone()),
            ("Double-double AAT", channels.double_double.clone()),
            ("Total AAT", channels.total()),
        ],
    }
}

pub fn report_result(result: &AatResult, labels: &[String]) {
    info!("\nAAT calculation finished.");
    for (title, tensor) in sections(result) {
        log_tensor(title, &tensor, labels);
    }
}

pub fn write_report(path: &str, result: &AatResult, labels: &[String]) -> Result<()> {
    let mut file = File::create(path)
        .wrap_err_with(|| format!("Unable to create report file: {}", path))?;
    for (title, tensor) in sections(result) {
        write_tensor_report(&mut file, title, &tensor, labels)?;
    }
    info!("Tensor report written to: {}", path);
    Ok(())
}
