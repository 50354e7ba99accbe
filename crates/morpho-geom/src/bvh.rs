//! Bounding-volume hierarchy for mesh-mesh overlap queries.
//!
//! Each cell mesh gets its own BVH; pairwise contact queries walk two
//! trees simultaneously and hand candidate triangle pairs to the exact
//! contact test. This is the analogue of the BVH-tree overlap query the
//! original segmentation tooling relied on.

use crate::{triangles_contact, Aabb, TriMesh};
use smallvec::SmallVec;
use std::collections::BTreeSet;

/// Default maximum number of triangles per BVH leaf.
pub const DEFAULT_MAX_LEAF_SIZE: usize = 8;

/// BVH node containing either leaf triangles or child nodes.
#[derive(Debug)]
enum BvhNode {
    /// Leaf node containing triangle indices.
    Leaf {
        bbox: Aabb,
        triangles: SmallVec<[u32; 8]>,
    },
    /// Internal node with two children.
    Internal {
        bbox: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Bounding-volume hierarchy over the faces of one triangle mesh.
///
/// # Example
///
/// ```
/// use morpho_geom::{unit_cube, Bvh, DEFAULT_MAX_LEAF_SIZE};
///
/// let cube = unit_cube();
/// let bvh = Bvh::build(&cube, DEFAULT_MAX_LEAF_SIZE);
/// assert_eq!(bvh.triangle_count(), 12);
/// ```
#[derive(Debug)]
pub struct Bvh {
    /// Root node (`None` for empty meshes).
    root: Option<BvhNode>,
    triangle_count: usize,
}

impl Bvh {
    /// Build a BVH from a mesh by median split along the longest axis.
    ///
    /// Faces with dangling vertex indices are ignored.
    #[must_use]
    pub fn build(mesh: &TriMesh, max_leaf_size: usize) -> Self {
        #[allow(clippy::cast_possible_truncation)] // face counts fit u32 by construction
        let triangles: Vec<(u32, Aabb)> = (0..mesh.face_count())
            .filter_map(|i| mesh.triangle(i).map(|t| (i as u32, t.bounds())))
            .collect();

        if triangles.is_empty() {
            return Self {
                root: None,
                triangle_count: 0,
            };
        }

        let indices: Vec<usize> = (0..triangles.len()).collect();
        let triangle_count = triangles.len();
        let root = Self::build_recursive(&triangles, indices, max_leaf_size.max(1));

        Self {
            root: Some(root),
            triangle_count,
        }
    }

    fn build_recursive(
        triangles: &[(u32, Aabb)],
        indices: Vec<usize>,
        max_leaf_size: usize,
    ) -> BvhNode {
        let mut bbox = Aabb::empty();
        for &i in &indices {
            bbox.expand(&triangles[i].1);
        }

        if indices.len() <= max_leaf_size {
            let leaf: SmallVec<[u32; 8]> = indices.iter().map(|&i| triangles[i].0).collect();
            return BvhNode::Leaf {
                bbox,
                triangles: leaf,
            };
        }

        // Median split along the longest axis of the node bounds.
        let axis = bbox.longest_axis();
        let mut sorted = indices;
        sorted.sort_by(|&a, &b| {
            let ca = triangles[a].1.center();
            let cb = triangles[b].1.center();
            ca[axis]
                .partial_cmp(&cb[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = sorted.len() / 2;
        let right_indices = sorted.split_off(mid);
        let left = Self::build_recursive(triangles, sorted, max_leaf_size);
        let right = Self::build_recursive(triangles, right_indices, max_leaf_size);

        BvhNode::Internal {
            bbox,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Total number of triangles indexed by the BVH.
    #[must_use]
    pub const fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Check if the BVH is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Collect indices of triangles whose bounds intersect a query box.
    #[must_use]
    pub fn query(&self, query_bbox: &Aabb, tolerance: f64) -> Vec<u32> {
        let mut result = Vec::new();
        if let Some(ref root) = self.root {
            Self::query_recursive(root, query_bbox, tolerance, &mut result);
        }
        result
    }

    fn query_recursive(node: &BvhNode, query_bbox: &Aabb, tolerance: f64, result: &mut Vec<u32>) {
        match node {
            BvhNode::Leaf { bbox, triangles } => {
                if bbox.intersects(query_bbox, tolerance) {
                    result.extend(triangles.iter().copied());
                }
            }
            BvhNode::Internal { bbox, left, right } => {
                if bbox.intersects(query_bbox, tolerance) {
                    Self::query_recursive(left, query_bbox, tolerance, result);
                    Self::query_recursive(right, query_bbox, tolerance, result);
                }
            }
        }
    }

    /// Find all face-index pairs of two meshes whose triangles are in
    /// contact (see [`triangles_contact`]).
    ///
    /// `self` must index `mesh_a` and `other` must index `mesh_b`. Pair
    /// order is `(face_of_a, face_of_b)`.
    #[must_use]
    pub fn overlap(
        &self,
        other: &Self,
        mesh_a: &TriMesh,
        mesh_b: &TriMesh,
        tolerance: f64,
    ) -> Vec<(u32, u32)> {
        let mut pairs = Vec::new();
        if let (Some(ra), Some(rb)) = (&self.root, &other.root) {
            Self::overlap_recursive(ra, rb, mesh_a, mesh_b, tolerance, &mut pairs);
        }
        pairs
    }

    fn overlap_recursive(
        a: &BvhNode,
        b: &BvhNode,
        mesh_a: &TriMesh,
        mesh_b: &TriMesh,
        tolerance: f64,
        pairs: &mut Vec<(u32, u32)>,
    ) {
        if !a.bbox().intersects(b.bbox(), tolerance) {
            return;
        }

        match (a, b) {
            (
                BvhNode::Leaf {
                    triangles: tris_a, ..
                },
                BvhNode::Leaf {
                    triangles: tris_b, ..
                },
            ) => {
                for &fa in tris_a {
                    let Some(ta) = mesh_a.triangle(fa as usize) else {
                        continue;
                    };
                    let bounds_a = ta.bounds();
                    for &fb in tris_b {
                        let Some(tb) = mesh_b.triangle(fb as usize) else {
                            continue;
                        };
                        if bounds_a.intersects(&tb.bounds(), tolerance)
                            && triangles_contact(&ta, &tb, tolerance)
                        {
                            pairs.push((fa, fb));
                        }
                    }
                }
            }
            (BvhNode::Internal { left, right, .. }, _) => {
                Self::overlap_recursive(left, b, mesh_a, mesh_b, tolerance, pairs);
                Self::overlap_recursive(right, b, mesh_a, mesh_b, tolerance, pairs);
            }
            (BvhNode::Leaf { .. }, BvhNode::Internal { left, right, .. }) => {
                Self::overlap_recursive(a, left, mesh_a, mesh_b, tolerance, pairs);
                Self::overlap_recursive(a, right, mesh_a, mesh_b, tolerance, pairs);
            }
        }
    }
}

/// Face-index pairs in contact between two meshes, with BVHs built
/// internally.
///
/// Convenience wrapper over [`Bvh::overlap`] for one-off queries;
/// callers testing many pairs should build one BVH per mesh and reuse
/// them.
#[must_use]
pub fn overlap_pairs(mesh_a: &TriMesh, mesh_b: &TriMesh, tolerance: f64) -> Vec<(u32, u32)> {
    let bvh_a = Bvh::build(mesh_a, DEFAULT_MAX_LEAF_SIZE);
    let bvh_b = Bvh::build(mesh_b, DEFAULT_MAX_LEAF_SIZE);
    bvh_a.overlap(&bvh_b, mesh_a, mesh_b, tolerance)
}

/// The sets of face indices of each mesh participating in at least one
/// contact pair. Both sets empty means the meshes are not in contact.
///
/// # Example
///
/// ```
/// use morpho_geom::{cube, overlap_faces, Point3};
///
/// let a = cube(Point3::new(0.0, 0.0, 0.0), 1.0);
/// let b = cube(Point3::new(5.0, 0.0, 0.0), 1.0);
/// let (faces_a, faces_b) = overlap_faces(&a, &b, 1e-9);
/// assert!(faces_a.is_empty() && faces_b.is_empty());
/// ```
#[must_use]
pub fn overlap_faces(
    mesh_a: &TriMesh,
    mesh_b: &TriMesh,
    tolerance: f64,
) -> (BTreeSet<u32>, BTreeSet<u32>) {
    let mut faces_a = BTreeSet::new();
    let mut faces_b = BTreeSet::new();
    for (fa, fb) in overlap_pairs(mesh_a, mesh_b, tolerance) {
        faces_a.insert(fa);
        faces_b.insert(fb);
    }
    (faces_a, faces_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cube, unit_cube, Point3};

    #[test]
    fn bvh_build_empty() {
        let bvh = Bvh::build(&TriMesh::new(), 8);
        assert!(bvh.is_empty());
        assert_eq!(bvh.triangle_count(), 0);
    }

    #[test]
    fn bvh_build_cube() {
        let bvh = Bvh::build(&unit_cube(), 4);
        assert!(!bvh.is_empty());
        assert_eq!(bvh.triangle_count(), 12);
    }

    #[test]
    fn bvh_query_all_and_none() {
        let bvh = Bvh::build(&unit_cube(), 4);

        let everything = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(2.0, 2.0, 2.0));
        assert_eq!(bvh.query(&everything, 0.0).len(), 12);

        let far = Aabb::new(Point3::new(10.0, 10.0, 10.0), Point3::new(11.0, 11.0, 11.0));
        assert!(bvh.query(&far, 0.0).is_empty());
    }

    #[test]
    fn disjoint_cubes_no_overlap() {
        let a = unit_cube();
        let b = cube(Point3::new(3.0, 0.0, 0.0), 1.0);
        assert!(overlap_pairs(&a, &b, 1e-9).is_empty());
    }

    #[test]
    fn interpenetrating_cubes_overlap_symmetrically() {
        let a = cube(Point3::new(0.0, 0.0, 0.0), 2.0);
        let b = cube(Point3::new(1.0, 0.5, 0.5), 2.0);
        let (faces_a, faces_b) = overlap_faces(&a, &b, 1e-9);
        assert!(!faces_a.is_empty());
        assert!(!faces_b.is_empty());

        let (faces_b2, faces_a2) = overlap_faces(&b, &a, 1e-9);
        assert_eq!(faces_a, faces_a2);
        assert_eq!(faces_b, faces_b2);
    }

    #[test]
    fn face_sharing_cubes_report_exactly_the_interface() {
        // Cubes [0,2]^3 and [2,4]x[0,2]x[0,2] share the x=2 face of area 4.
        let a = cube(Point3::new(0.0, 0.0, 0.0), 2.0);
        let b = cube(Point3::new(2.0, 0.0, 0.0), 2.0);
        let (faces_a, faces_b) = overlap_faces(&a, &b, 1e-9);

        // Only the two triangles of each cube's shared face take part.
        assert_eq!(faces_a.len(), 2);
        assert_eq!(faces_b.len(), 2);

        let area_a: f64 = faces_a.iter().map(|&f| a.face_area(f as usize)).sum();
        let area_b: f64 = faces_b.iter().map(|&f| b.face_area(f as usize)).sum();
        assert!((area_a - 4.0).abs() < 1e-9);
        assert!((area_b - 4.0).abs() < 1e-9);
    }

    #[test]
    fn overlap_with_empty_mesh_is_empty() {
        let a = unit_cube();
        let (fa, fb) = overlap_faces(&a, &TriMesh::new(), 1e-9);
        assert!(fa.is_empty() && fb.is_empty());
    }
}
