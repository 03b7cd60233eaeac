//! Output formatting and logging utilities

use aat::AatTensor;
use color_eyre::eyre::Result;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

/// Custom time formatter that shows only seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = StdSystemTime::now();
        let duration = now
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();

        // HH:MM:SS
        let total_seconds = duration.as_secs();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;

        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Setup output logging to file or stdout
pub fn setup_output(output_path: Option<&String>) {
    match output_path {
        Some(path) => {
            if let Ok(log) = File::create(path) {
                let file_layer = layer()
                    .with_writer(log)
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false);
                Registry::default().with(file_layer).init();
                info!("Output will be written to: {}", path);
            } else {
                eprintln!("Could not create output file: {}", path);
            }
        }
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true);
            Registry::default().with(stdout_layer).init();
            info!("Output will be printed to stdout");
        }
    }
}

/// Writes one tensor as a labelled table, one row per nuclear coordinate.
pub fn write_tensor_report<W: Write>(
    writer: &mut W,
    title: &str,
    tensor: &AatTensor,
    row_labels: &[String],
) -> Result<()> {
    writeln!(writer, "{}", title)?;
    writeln!(
        writer,
        "  {:<10} {:>16} {:>16} {:>16}",
        "", "Bx", "By", "Bz"
    )?;
    for (r, row) in tensor.row_iter().enumerate() {
        let label = row_labels
            .get(r)
            .cloned()
            .unwrap_or_else(|| format!("R{}", r));
        writeln!(
            writer,
            "  {:<10} {:>16.10} {:>16.10} {:>16.10}",
            label, row[0], row[1], row[2]
        )?;
    }
    writeln!(writer)?;
    Ok(())
}
