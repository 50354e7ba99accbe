//! Contact-graph construction for one timepoint.

use crate::{AnalyzeError, AnalyzeResult};
use morpho_cells::{CancelToken, ContactGraph, ProgressFn, Timepoint, TimepointSequence};
use morpho_geom::{scaled_area_of_faces, Bvh, TriMesh, DEFAULT_MAX_LEAF_SIZE, DEFAULT_TOLERANCE};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Tuning knobs for a contact pass.
pub struct ContactOptions<'a> {
    /// Maximum triangles per BVH leaf.
    pub max_leaf_size: usize,
    /// Geometric tolerance for box and triangle contact tests, in
    /// modeling units.
    pub tolerance: f64,
    /// Report progress every this many processed pairs.
    pub progress_every: usize,
    /// Progress callback, `(pairs done, pairs total)`.
    pub progress: Option<ProgressFn<'a>>,
    /// Cancellation token, observed between pairs.
    pub cancel: Option<CancelToken>,
}

impl Default for ContactOptions<'_> {
    fn default() -> Self {
        Self {
            max_leaf_size: DEFAULT_MAX_LEAF_SIZE,
            tolerance: DEFAULT_TOLERANCE,
            progress_every: 1,
            progress: None,
            cancel: None,
        }
    }
}

impl std::fmt::Debug for ContactOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactOptions")
            .field("max_leaf_size", &self.max_leaf_size)
            .field("tolerance", &self.tolerance)
            .field("progress_every", &self.progress_every)
            .finish_non_exhaustive()
    }
}

/// Build the cell-cell contact graph of one timepoint.
///
/// Every cell becomes a node carrying its tissue tag, contacting or
/// not. Each unordered cell pair is tested once: the meshes are baked
/// and indexed by one BVH per cell, the dual-tree overlap query
/// collects the contacting faces of both sides, and the edge weight is
/// the average of the two sides' scaled interface areas. Pairs whose
/// interface area rounds to zero produce no edge.
///
/// Pair results are merged in pair order, so the graph is deterministic
/// regardless of thread scheduling.
///
/// # Errors
///
/// [`AnalyzeError::Cancelled`] if the token fires; the partially built
/// graph is discarded.
pub fn contact_graph(
    timepoint: &Timepoint,
    unit_scale: f64,
    options: &ContactOptions<'_>,
) -> AnalyzeResult<ContactGraph> {
    let cells = timepoint.cells();

    // Bake each mesh once and index it; cells are independent.
    let baked: Vec<(TriMesh, Bvh)> = cells
        .par_iter()
        .map(|cell| {
            let mesh = cell.bake();
            let bvh = Bvh::build(&mesh, options.max_leaf_size);
            (mesh, bvh)
        })
        .collect();

    let mut pairs = Vec::new();
    for i in 0..cells.len() {
        for j in (i + 1)..cells.len() {
            pairs.push((i, j));
        }
    }
    let total = pairs.len();
    info!(
        timepoint = timepoint.index(),
        cells = cells.len(),
        pairs = total,
        "testing cell pairs for contact"
    );

    let done = AtomicUsize::new(0);
    let cadence = options.progress_every.max(1);
    let contacts: Vec<Option<f64>> = pairs
        .par_iter()
        .map(|&(i, j)| {
            if options.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return None;
            }

            let (mesh_a, bvh_a) = &baked[i];
            let (mesh_b, bvh_b) = &baked[j];
            let mut weight = None;

            let contact_pairs = bvh_a.overlap(bvh_b, mesh_a, mesh_b, options.tolerance);
            if !contact_pairs.is_empty() {
                let mut faces_a = std::collections::BTreeSet::new();
                let mut faces_b = std::collections::BTreeSet::new();
                for (fa, fb) in contact_pairs {
                    faces_a.insert(fa);
                    faces_b.insert(fb);
                }
                let area_a = scaled_area_of_faces(mesh_a, &faces_a, unit_scale);
                let area_b = scaled_area_of_faces(mesh_b, &faces_b, unit_scale);
                let area = (area_a + area_b) / 2.0;
                if area > 0.0 {
                    weight = Some(area);
                }
            }

            let processed = done.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(progress) = options.progress {
                if processed % cadence == 0 || processed == total {
                    progress(processed, total);
                }
            }
            weight
        })
        .collect();

    if options.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
        return Err(AnalyzeError::Cancelled);
    }

    let mut graph = ContactGraph::new(timepoint.index());
    for cell in cells {
        graph.add_node(cell.name, cell.tissue.clone());
    }
    for (&(i, j), weight) in pairs.iter().zip(contacts) {
        if let Some(weight) = weight {
            graph.add_edge(cells[i].name, cells[j].name, weight);
        }
    }

    info!(
        timepoint = timepoint.index(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        components = graph.connected_components(),
        "contact graph built"
    );
    Ok(graph)
}

/// Build contact graphs for every timepoint of a sequence, keyed by
/// timepoint index.
///
/// # Errors
///
/// [`AnalyzeError::Cancelled`] if the token fires; graphs of earlier
/// timepoints are discarded with the rest.
pub fn contact_graphs(
    sequence: &TimepointSequence,
    unit_scale: f64,
    options: &ContactOptions<'_>,
) -> AnalyzeResult<BTreeMap<u32, ContactGraph>> {
    let mut graphs = BTreeMap::new();
    for timepoint in sequence.timepoints() {
        let graph = contact_graph(timepoint, unit_scale, options)?;
        graphs.insert(timepoint.index(), graph);
    }
    Ok(graphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use morpho_cells::{Cell, CellName};
    use morpho_geom::{cube, CellGeometry, Point3};

    fn cube_cell(t: u32, label: u64, min: Point3<f64>, size: f64) -> Cell {
        Cell::new(
            CellName::new(t, label),
            CellGeometry::from_tri_mesh(cube(min, size)),
        )
    }

    /// Two cubes sharing a full face, one far away.
    fn face_sharing_timepoint() -> Timepoint {
        Timepoint::new(
            1,
            vec![
                cube_cell(1, 1, Point3::new(0.0, 0.0, 0.0), 2.0),
                cube_cell(1, 2, Point3::new(2.0, 0.0, 0.0), 2.0),
                cube_cell(1, 3, Point3::new(50.0, 0.0, 0.0), 2.0),
            ],
        )
    }

    #[test]
    fn shared_face_weight_is_the_interface_area() {
        let graph =
            contact_graph(&face_sharing_timepoint(), 1.0, &ContactOptions::default()).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);

        let w = graph
            .weight(&CellName::new(1, 1), &CellName::new(1, 2))
            .unwrap();
        assert_relative_eq!(w, 4.0, epsilon = 1e-9);

        // The far cube is an isolated node.
        assert!(graph.contains_node(&CellName::new(1, 3)));
        assert!(graph.neighbors(&CellName::new(1, 3)).is_empty());
        assert_eq!(graph.connected_components(), 2);
    }

    #[test]
    fn weights_scale_quadratically() {
        let graph =
            contact_graph(&face_sharing_timepoint(), 0.5, &ContactOptions::default()).unwrap();
        let w = graph
            .weight(&CellName::new(1, 1), &CellName::new(1, 2))
            .unwrap();
        assert_relative_eq!(w, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn disjoint_cells_produce_no_edges() {
        let timepoint = Timepoint::new(
            2,
            vec![
                cube_cell(2, 1, Point3::new(0.0, 0.0, 0.0), 1.0),
                cube_cell(2, 2, Point3::new(5.0, 0.0, 0.0), 1.0),
            ],
        );
        let graph = contact_graph(&timepoint, 1.0, &ContactOptions::default()).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.connected_components(), 2);
    }

    #[test]
    fn edge_touching_cubes_are_not_in_contact() {
        // Diagonal neighbors: share only an edge, no interface area.
        let timepoint = Timepoint::new(
            1,
            vec![
                cube_cell(1, 1, Point3::new(0.0, 0.0, 0.0), 1.0),
                cube_cell(1, 2, Point3::new(1.0, 1.0, 0.0), 1.0),
            ],
        );
        let graph = contact_graph(&timepoint, 1.0, &ContactOptions::default()).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn nodes_carry_tissue_tags() {
        let timepoint = Timepoint::new(
            1,
            vec![cube_cell(1, 1, Point3::new(0.0, 0.0, 0.0), 1.0).with_tissue("cortex")],
        );
        let graph = contact_graph(&timepoint, 1.0, &ContactOptions::default()).unwrap();
        assert_eq!(graph.tissue(&CellName::new(1, 1)), Some("cortex"));
    }

    #[test]
    fn progress_reaches_the_total() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let last = AtomicUsize::new(0);
        let progress = |done: usize, _total: usize| {
            last.store(done, Ordering::Relaxed);
        };
        let options = ContactOptions {
            progress: Some(&progress),
            ..ContactOptions::default()
        };
        contact_graph(&face_sharing_timepoint(), 1.0, &options).unwrap();
        assert_eq!(last.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn cancellation_discards_the_graph() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let options = ContactOptions {
            cancel: Some(cancel),
            ..ContactOptions::default()
        };
        let result = contact_graph(&face_sharing_timepoint(), 1.0, &options);
        assert!(matches!(result, Err(AnalyzeError::Cancelled)));
    }

    #[test]
    fn sequence_pass_builds_one_graph_per_timepoint() {
        let sequence = TimepointSequence::new(vec![
            face_sharing_timepoint(),
            Timepoint::new(2, vec![cube_cell(2, 1, Point3::new(0.0, 0.0, 0.0), 1.0)]),
        ]);
        let graphs = contact_graphs(&sequence, 1.0, &ContactOptions::default()).unwrap();
        assert_eq!(graphs.len(), 2);
        assert_eq!(graphs[&1].edge_count(), 1);
        assert_eq!(graphs[&2].node_count(), 1);
    }

    #[test]
    fn determinism_across_runs() {
        let timepoint = face_sharing_timepoint();
        let a = contact_graph(&timepoint, 1.0, &ContactOptions::default()).unwrap();
        let b = contact_graph(&timepoint, 1.0, &ContactOptions::default()).unwrap();
        assert_eq!(a, b);
    }
}
