// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structure3D Geometry Processing
//!
//! Turns building structures (points, edges, surfaces) into render-ready
//! geometry: surfaces become flat-shaded triangle meshes via earcutr, edges
//! become polylines, and both share one re-centered, Y-up coordinate frame.
//!
//! ```rust,ignore
//! use structure3d_core::StructureDocument;
//! use structure3d_geometry::{render_collection, RenderConfig};
//!
//! let collection = StructureDocument::from_json(&json)?.into_collection();
//! let output = render_collection(&collection, &RenderConfig::default())?;
//! for failure in &output.failures {
//!     eprintln!("{}", failure);
//! }
//! ```

pub mod config;
pub mod error;
pub mod facets;
pub mod lines;
pub mod mesh;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod ring;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use config::RenderConfig;
pub use error::{Error, ReferenceKind, Result};
pub use facets::{build_facet, build_facets, FacetMesh};
pub use lines::{build_line, build_lines, EdgeLine};
pub use mesh::Mesh;
pub use normalize::{compute_anchor, normalize_point, Anchor};
pub use pipeline::{render_collection, RenderOutput};
pub use report::{Layer, ProjectionWarning, RenderFailure};
pub use ring::{reconstruct_ring, resolve_ring};
pub use triangulation::{triangulate_rings, Triangulation};
