// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facet meshing
//!
//! Turns each surface of a structure into a flat-shaded triangle mesh in
//! render space: rings are reconstructed from edge ids, resolved to
//! coordinates, re-centered on the shared anchor and triangulated.

use nalgebra::Point3;
use serde::Serialize;
use structure3d_core::{FeatureId, Properties, Structure, Surface};

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::normalize::Anchor;
use crate::report::{Layer, RenderFailure};
use crate::ring::resolve_ring;
use crate::triangulation::triangulate_rings;

/// A triangulated surface plus the metadata the renderer needs for styling
/// and picking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetMesh {
    pub id: FeatureId,
    /// `properties.material`, when it is a string
    pub material: Option<String>,
    /// The surface's properties, verbatim
    pub properties: Properties,
    pub mesh: Mesh,
}

impl FacetMesh {
    /// JSON object of the form `{ ...properties, id, layer }`
    pub fn user_data(&self) -> serde_json::Value {
        let mut data = self.properties.clone();
        data.insert("id".to_string(), self.id.to_string().into());
        data.insert("layer".to_string(), Layer::Facets.as_str().into());
        serde_json::Value::Object(data)
    }
}

/// Resolve every ring of a surface to render-space points.
///
/// Empty hole rings are dropped; an empty outer ring is kept so the
/// triangulator reports it as degenerate.
pub fn surface_rings(
    structure: &Structure,
    surface: &Surface,
    anchor: &Anchor,
    base_elevation: f64,
) -> Result<Vec<Vec<Point3<f64>>>> {
    let mut rings = Vec::with_capacity(surface.rings.len());

    for (i, edge_ids) in surface.rings.iter().enumerate() {
        let point_ids = resolve_ring(structure, edge_ids)?;
        if point_ids.is_empty() && i > 0 {
            continue;
        }

        let points = point_ids
            .iter()
            .map(|&id| {
                let point = structure.point(id).ok_or_else(|| Error::dangling_point(id))?;
                if !point.coordinates.is_finite() {
                    return Err(Error::non_finite_point(id));
                }
                Ok(anchor.normalize(&point.coordinates, base_elevation))
            })
            .collect::<Result<Vec<_>>>()?;
        rings.push(points);
    }

    Ok(rings)
}

/// Mesh a single surface
pub fn build_facet(
    structure: &Structure,
    structure_index: usize,
    surface_id: &str,
    anchor: &Anchor,
    base_elevation: f64,
) -> Result<FacetMesh> {
    let surface = structure.surface(surface_id).ok_or_else(|| {
        Error::DegenerateGeometry(format!("surface '{}' does not exist", surface_id))
    })?;

    let rings = surface_rings(structure, surface, anchor, base_elevation)?;
    let tri = triangulate_rings(&rings)?;

    // Double-sided facets; face the normal upwards for lighting
    let normal = if tri.normal.y < 0.0 { -tri.normal } else { tri.normal };

    Ok(FacetMesh {
        id: FeatureId::new(structure_index, surface_id),
        material: surface.material().map(str::to_owned),
        properties: surface.properties.clone(),
        mesh: Mesh::from_triangulation(&tri, normal),
    })
}

/// Mesh every surface of a structure.
///
/// A surface that fails is reported and skipped; the remaining surfaces are
/// still meshed.
pub fn build_facets(
    structure: &Structure,
    structure_index: usize,
    anchor: &Anchor,
    base_elevation: f64,
) -> (Vec<FacetMesh>, Vec<RenderFailure>) {
    let mut meshes = Vec::with_capacity(structure.surfaces.len());
    let mut failures = Vec::new();

    for surface_id in structure.surfaces.keys() {
        match build_facet(structure, structure_index, surface_id, anchor, base_elevation) {
            Ok(facet) => meshes.push(facet),
            Err(error) => {
                tracing::warn!(
                    structure = structure_index,
                    surface = %surface_id,
                    %error,
                    "skipping surface"
                );
                failures.push(RenderFailure::facet(structure_index, surface_id, error));
            }
        }
    }

    (meshes, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use structure3d_core::{Edge, Point, Projection};

    /// Unit square A(0,0,0) B(1,0,0) C(1,1,0) D(0,1,0), edges listed out of order
    fn square_structure() -> Structure {
        let mut st = Structure::new(Projection::WebMercator);
        for (id, x, y) in [("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 1.0, 1.0), ("D", 0.0, 1.0)] {
            st.points.insert(id.into(), Point::new(x, y, 0.0));
        }
        st.edges.insert("ab".into(), Edge::new("A", "B"));
        st.edges.insert("cd".into(), Edge::new("C", "D"));
        st.edges.insert("bc".into(), Edge::new("B", "C"));
        st.edges.insert("da".into(), Edge::new("D", "A"));

        let mut surface = Surface::new(vec![vec![
            "ab".into(),
            "cd".into(),
            "bc".into(),
            "da".into(),
        ]]);
        surface
            .properties
            .insert("material".into(), "slate".into());
        surface.properties.insert("area".into(), 1.0.into());
        st.surfaces.insert("roof".into(), surface);
        st
    }

    fn mesh_area(mesh: &Mesh) -> f64 {
        let p = |i: u32| {
            let i = i as usize * 3;
            Point3::new(
                mesh.positions[i] as f64,
                mesh.positions[i + 1] as f64,
                mesh.positions[i + 2] as f64,
            )
        };
        mesh.indices
            .chunks_exact(3)
            .map(|t| {
                let (a, b, c) = (p(t[0]), p(t[1]), p(t[2]));
                (b - a).cross(&(c - a)).norm() / 2.0
            })
            .sum()
    }

    #[test]
    fn test_square_surface() {
        let st = square_structure();
        let anchor = Anchor::new(0.5, 0.5, 0.0);

        let facet = build_facet(&st, 3, "roof", &anchor, 10.0).unwrap();

        assert_eq!(facet.id.to_string(), "3-roof");
        assert_eq!(facet.material.as_deref(), Some("slate"));
        assert_eq!(facet.mesh.triangle_count(), 2);
        assert_eq!(facet.mesh.vertex_count(), 4);
        assert_relative_eq!(mesh_area(&facet.mesh), 1.0, epsilon = 1e-6);

        // Horizontal roof at base elevation, normal straight up
        for chunk in facet.mesh.positions.chunks_exact(3) {
            assert_relative_eq!(chunk[1], 10.0);
        }
        assert_eq!(&facet.mesh.normals[..3], &[0.0, 1.0, 0.0]);
        assert!(facet
            .mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < facet.mesh.vertex_count()));
    }

    #[test]
    fn test_user_data_carries_properties() {
        let st = square_structure();
        let facet = build_facet(&st, 0, "roof", &Anchor::new(0.0, 0.0, 0.0), 0.0).unwrap();

        let data = facet.user_data();
        assert_eq!(data["id"], "0-roof");
        assert_eq!(data["layer"], "facets");
        assert_eq!(data["material"], "slate");
        assert_eq!(data["area"], 1.0);
    }

    #[test]
    fn test_dangling_point_reported() {
        let mut st = square_structure();
        st.points.remove("C");

        let err = build_facet(&st, 0, "roof", &Anchor::new(0.0, 0.0, 0.0), 0.0).unwrap_err();
        assert_eq!(err, Error::dangling_point("C"));
    }

    #[test]
    fn test_non_finite_point_is_degenerate() {
        let mut st = square_structure();
        st.points.insert("B".into(), Point::new(f64::NAN, 0.0, 0.0));

        let err = build_facet(&st, 0, "roof", &Anchor::new(0.0, 0.0, 0.0), 0.0).unwrap_err();
        assert_eq!(err, Error::non_finite_point("B"));
    }

    #[test]
    fn test_bent_edge_shared_with_line() {
        // Eave A -> B bends out through M; facet and line follow the same path
        let mut st = square_structure();
        st.points.insert("M".into(), Point::new(0.5, -0.5, 0.0));
        st.edges.get_mut("ab").unwrap().points.insert(1, "M".into());
        let anchor = Anchor::new(0.0, 0.0, 0.0);

        let facet = build_facet(&st, 0, "roof", &anchor, 0.0).unwrap();
        assert_eq!(facet.mesh.vertex_count(), 5);
        assert_eq!(facet.mesh.triangle_count(), 3);
        assert_relative_eq!(mesh_area(&facet.mesh), 1.25, epsilon = 1e-6);

        let line = crate::lines::build_line(&st, 0, "ab", &anchor, 0.0).unwrap();
        let m = line.points[1];
        assert!(facet
            .mesh
            .positions
            .chunks_exact(3)
            .any(|c| *c == [m.x, m.y, m.z]));
    }

    #[test]
    fn test_bad_surface_does_not_block_others() {
        let mut st = square_structure();
        st.surfaces.insert(
            "broken".into(),
            Surface::new(vec![vec!["ab".into(), "bc".into(), "cd".into()]]),
        );

        let (meshes, failures) = build_facets(&st, 1, &Anchor::new(0.0, 0.0, 0.0), 0.0);

        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].id.element_id, "roof");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].element_id, "broken");
        assert_eq!(failures[0].structure_index, 1);
        assert!(matches!(failures[0].error, Error::MalformedRing(_)));
    }

    #[test]
    fn test_empty_outer_ring_is_degenerate() {
        let mut st = square_structure();
        st.surfaces.insert("empty".into(), Surface::new(vec![vec![]]));

        let err = build_facet(&st, 0, "empty", &Anchor::new(0.0, 0.0, 0.0), 0.0).unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry(_)));
    }
}
