//! Spanner output and summary persistence

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use serde_json::{json, to_string_pretty};

use crate::spanner::metrics::SpannerSummary;
use crate::spanner::Spanner;

/// Write the spanner in the text exchange format
///
/// First line `n edge_count`, then one `u v w` line per edge with u < v.
pub fn write_spanner<W: Write>(spanner: &Spanner, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{} {}", spanner.vertex_count, spanner.edges.len())?;
    for edge in &spanner.edges {
        writeln!(writer, "{} {} {}", edge.u, edge.v, edge.weight)?;
    }
    Ok(())
}

/// Save the spanner to a file, or to stdout when no path is given
pub fn save_spanner(spanner: &Spanner, path: Option<&str>) -> Result<()> {
    match path {
        Some(path) => {
            log::info!("Writing spanner to {}", path);
            let mut writer = BufWriter::new(File::create(path)?);
            write_spanner(spanner, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_spanner(spanner, &mut writer)?;
        }
    }
    Ok(())
}

/// Save the run summary as pretty-printed JSON
pub fn save_summary(summary: &SpannerSummary, path: &str) -> Result<()> {
    log::info!("Saving run summary to {}", path);

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let payload = json!({
        "graph": {
            "vertex_count": summary.vertex_count,
            "edge_count": summary.original_edge_count,
        },
        "spanner": {
            "edge_count": summary.spanner_edge_count,
            "retention": summary.retention,
            "stretch": summary.stretch,
            "k": summary.k,
            "expected_size_bound": summary.expected_size_bound,
        }
    });

    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&payload)?.as_bytes())?;

    Ok(())
}
