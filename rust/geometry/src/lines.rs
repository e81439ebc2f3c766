// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edge polylines
//!
//! Each edge is drawn on its own, in its stored orientation; unlike rings no
//! direction reconciliation is needed.

use nalgebra::Point3;
use serde::Serialize;
use structure3d_core::{EdgeKind, FeatureId, Properties, Structure};

use crate::error::{Error, Result};
use crate::normalize::Anchor;
use crate::report::{Layer, RenderFailure};

/// Polyline geometry of one edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLine {
    pub id: FeatureId,
    pub kind: Option<EdgeKind>,
    /// The edge's properties, verbatim
    pub properties: Properties,
    /// Render-space points in the edge's stored order
    pub points: Vec<Point3<f32>>,
}

impl EdgeLine {
    /// Flattened positions (x, y, z, x, y, z, ...)
    pub fn positions(&self) -> Vec<f32> {
        self.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    /// JSON object of the form `{ ...properties, kind, id, layer }`
    pub fn user_data(&self) -> serde_json::Value {
        let mut data = self.properties.clone();
        let kind = match &self.kind {
            Some(kind) => serde_json::Value::from(kind.as_str()),
            None => serde_json::Value::Null,
        };
        data.insert("kind".to_string(), kind);
        data.insert("id".to_string(), self.id.to_string().into());
        data.insert("layer".to_string(), Layer::Edges.as_str().into());
        serde_json::Value::Object(data)
    }
}

/// Build the polyline of a single edge
pub fn build_line(
    structure: &Structure,
    structure_index: usize,
    edge_id: &str,
    anchor: &Anchor,
    base_elevation: f64,
) -> Result<EdgeLine> {
    let edge = structure
        .edge(edge_id)
        .ok_or_else(|| Error::dangling_edge(edge_id))?;

    if edge.points.len() < 2 {
        return Err(Error::DegenerateGeometry(format!(
            "edge '{}' has {} point(s)",
            edge_id,
            edge.points.len()
        )));
    }

    let points = edge
        .points
        .iter()
        .map(|id| {
            let point = structure.point(id).ok_or_else(|| Error::dangling_point(id))?;
            if !point.coordinates.is_finite() {
                return Err(Error::non_finite_point(id));
            }
            let p = anchor.normalize(&point.coordinates, base_elevation);
            Ok(Point3::new(p.x as f32, p.y as f32, p.z as f32))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(EdgeLine {
        id: FeatureId::new(structure_index, edge_id),
        kind: edge.kind.clone(),
        properties: edge.properties.clone(),
        points,
    })
}

/// Build polylines for every edge of a structure, isolating per-edge failures
pub fn build_lines(
    structure: &Structure,
    structure_index: usize,
    anchor: &Anchor,
    base_elevation: f64,
) -> (Vec<EdgeLine>, Vec<RenderFailure>) {
    let mut lines = Vec::with_capacity(structure.edges.len());
    let mut failures = Vec::new();

    for edge_id in structure.edges.keys() {
        match build_line(structure, structure_index, edge_id, anchor, base_elevation) {
            Ok(line) => lines.push(line),
            Err(error) => {
                tracing::warn!(
                    structure = structure_index,
                    edge = %edge_id,
                    %error,
                    "skipping edge"
                );
                failures.push(RenderFailure::edge(structure_index, edge_id, error));
            }
        }
    }

    (lines, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use structure3d_core::{Edge, Point, Projection};

    fn structure() -> Structure {
        let mut st = Structure::new(Projection::WebMercator);
        st.points.insert("a".into(), Point::new(0.0, 0.0, 1.0));
        st.points.insert("b".into(), Point::new(2.0, 0.0, 1.0));
        st.points.insert("c".into(), Point::new(2.0, 2.0, 3.0));

        let mut eave = Edge::new("b", "a").with_kind(EdgeKind::Eave);
        eave.properties.insert("length".into(), 2.0.into());
        st.edges.insert("e1".into(), eave);

        let mut hip = Edge::new("b", "c").with_kind(EdgeKind::from("gutter"));
        hip.points.insert(1, "a".into());
        st.edges.insert("e2".into(), hip);
        st
    }

    #[test]
    fn test_line_keeps_stored_orientation() {
        let line = build_line(&structure(), 0, "e1", &Anchor::new(0.0, 0.0, 1.0), 0.0).unwrap();
        assert_eq!(
            line.points,
            vec![Point3::new(2.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0)]
        );
        assert_eq!(line.positions(), vec![2.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(line.kind, Some(EdgeKind::Eave));
    }

    #[test]
    fn test_intermediate_vertices_drawn() {
        let line = build_line(&structure(), 0, "e2", &Anchor::new(0.0, 0.0, 1.0), 0.01).unwrap();
        assert_eq!(line.points.len(), 3);
        assert!((line.points[2].y - 2.01).abs() < 1e-6);
        assert!((line.points[2].z + 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_user_data() {
        let line = build_line(&structure(), 4, "e1", &Anchor::new(0.0, 0.0, 0.0), 0.0).unwrap();
        let data = line.user_data();
        assert_eq!(data["id"], "4-e1");
        assert_eq!(data["kind"], "eave");
        assert_eq!(data["layer"], "edges");
        assert_eq!(data["length"], 2.0);

        let line = build_line(&structure(), 4, "e2", &Anchor::new(0.0, 0.0, 0.0), 0.0).unwrap();
        assert_eq!(line.user_data()["kind"], "gutter");
    }

    #[test]
    fn test_failures_isolated_per_edge() {
        let mut st = structure();
        st.edges.insert("dangling".into(), Edge::new("a", "zz"));
        st.edges.insert("short".into(), Edge {
            points: vec!["a".into()],
            kind: None,
            properties: Properties::new(),
        });

        let (lines, failures) = build_lines(&st, 2, &Anchor::new(0.0, 0.0, 0.0), 0.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(failures.len(), 2);

        assert_eq!(failures[0].element_id, "dangling");
        assert_eq!(failures[0].error, Error::dangling_point("zz"));
        assert_eq!(failures[0].layer, Layer::Edges);
        assert!(matches!(failures[1].error, Error::DegenerateGeometry(_)));
    }

    #[test]
    fn test_non_finite_point_is_degenerate() {
        let mut st = structure();
        st.points.insert("c".into(), Point::new(2.0, f64::INFINITY, 3.0));

        let (lines, failures) = build_lines(&st, 0, &Anchor::new(0.0, 0.0, 1.0), 0.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].id.element_id, "e1");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].element_id, "e2");
        assert_eq!(failures[0].error, Error::non_finite_point("c"));
    }
}
