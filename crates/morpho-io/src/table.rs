//! Morphometry table export.

use crate::IoResult;
use morpho_analyze::Morphometry;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

const HEADER: &str = "name\tcollection\tvolume\tarea\tdim_x\tdim_y\tdim_z\tcentroid_x\tcentroid_y\tcentroid_z";

/// Render morphometry records as a tab-separated table.
///
/// One row per cell in record order, a fixed header row, empty fields
/// for missing tags and centroids.
#[must_use]
pub fn morphometry_tsv(records: &[Morphometry]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for r in records {
        let _ = write!(
            out,
            "{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
            r.name,
            r.tissue.as_deref().unwrap_or(""),
            r.volume,
            r.area,
            r.dimensions[0],
            r.dimensions[1],
            r.dimensions[2],
        );
        match r.centroid {
            Some(c) => {
                let _ = write!(out, "\t{:.6}\t{:.6}\t{:.6}", c.x, c.y, c.z);
            }
            None => out.push_str("\t\t\t"),
        }
        out.push('\n');
    }
    out
}

/// Save a morphometry table as a TSV file.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn save_morphometry_tsv<P: AsRef<Path>>(records: &[Morphometry], path: P) -> IoResult<()> {
    fs::write(&path, morphometry_tsv(records))?;
    info!(
        path = %path.as_ref().display(),
        cells = records.len(),
        "morphometry table saved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_cells::CellName;
    use morpho_geom::Point3;

    fn records() -> Vec<Morphometry> {
        vec![
            Morphometry {
                name: CellName::new(1, 1),
                tissue: Some("cortex".to_owned()),
                volume: 8.0,
                area: 24.0,
                dimensions: [2.0, 2.0, 2.0],
                centroid: Some(Point3::new(1.0, 1.0, 1.0)),
            },
            Morphometry {
                name: CellName::new(1, 2),
                tissue: None,
                volume: 0.0,
                area: 0.0,
                dimensions: [0.0, 0.0, 0.0],
                centroid: None,
            },
        ]
    }

    #[test]
    fn table_layout() {
        let tsv = morphometry_tsv(&records());
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("t1_label1\tcortex\t8.000000\t24.000000"));
        // Missing tag and centroid leave their fields empty.
        assert!(lines[2].starts_with("t1_label2\t\t0.000000"));
        assert!(lines[2].ends_with("\t\t\t"));
    }

    #[test]
    fn save_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("morphometry.tsv");
        save_morphometry_tsv(&records(), &path).unwrap();
        let tsv = std::fs::read_to_string(&path).unwrap();
        assert!(tsv.starts_with("name\t"));
    }
}
