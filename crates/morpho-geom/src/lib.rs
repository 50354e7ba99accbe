//! Geometry kernel for segmented-cell meshes.
//!
//! This crate provides the geometric primitives shared by the lineage
//! tracker and the contact-graph builder:
//!
//! - [`TriMesh`] - a world-space triangle mesh with volume/area queries
//! - [`CellGeometry`] - raw polygon geometry plus a world transform and
//!   pending deformation, baked into a [`TriMesh`] on demand
//! - [`Aabb`] / [`Triangle`] - bounding box and triangle primitives
//! - [`Bvh`] - bounding-volume hierarchy with dual-tree overlap queries
//! - scaled measurement helpers converting modeling units to physical
//!   units (µm, µm², µm³)
//!
//! # Units
//!
//! All coordinates are `f64` in dataset modeling units. Functions taking a
//! `unit_scale` argument convert to physical units: lengths are multiplied
//! by the factor, areas by its square, volumes by its cube.
//!
//! # Failure semantics
//!
//! The kernel is best-effort: degenerate or empty meshes yield zero-valued
//! measurements and empty overlap sets, never errors. Callers must tolerate
//! zero volume/area without treating it as a failure.
//!
//! # Example
//!
//! ```
//! use morpho_geom::{unit_cube, scaled_volume_and_area};
//!
//! let cube = unit_cube();
//! let (volume, area) = scaled_volume_and_area(&cube, 1.0);
//! assert!((volume - 1.0).abs() < 1e-10);
//! assert!((area - 6.0).abs() < 1e-10);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bake;
mod bounds;
mod bvh;
mod contact;
mod measure;
mod mesh;
mod triangle;

pub use bake::CellGeometry;
pub use bounds::Aabb;
pub use bvh::{overlap_faces, overlap_pairs, Bvh, DEFAULT_MAX_LEAF_SIZE};
pub use contact::{triangles_contact, DEFAULT_TOLERANCE};
pub use measure::{scaled_area_of_faces, scaled_distance, scaled_volume_and_area};
pub use mesh::{cube, unit_cube, TriMesh};
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};
