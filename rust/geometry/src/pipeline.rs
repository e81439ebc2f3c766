// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collection render pass
//!
//! Computes the anchor once, then meshes facets and builds edge lines for
//! every structure. Structures are independent of each other apart from the
//! shared anchor, so they are processed in parallel when enabled.

use nalgebra::Point3;
use structure3d_core::{Structure, StructureCollection};

use crate::config::RenderConfig;
use crate::error::Result;
use crate::facets::{build_facets, FacetMesh};
use crate::lines::{build_lines, EdgeLine};
use crate::normalize::{compute_anchor, Anchor};
use crate::report::{ProjectionWarning, RenderFailure};

/// Everything produced by one render pass over a collection
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub anchor: Anchor,
    pub facets: Vec<FacetMesh>,
    pub lines: Vec<EdgeLine>,
    /// Surfaces and edges that were skipped, with the reason
    pub failures: Vec<RenderFailure>,
    /// Structures whose coordinates were used without a supported projection
    pub warnings: Vec<ProjectionWarning>,
}

impl RenderOutput {
    /// True when every surface and edge produced geometry
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Render-space bounds of all facet and line vertices, for camera framing
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let facet_points = self
            .facets
            .iter()
            .flat_map(|f| f.mesh.positions.chunks_exact(3))
            .map(|c| Point3::new(c[0], c[1], c[2]));
        let line_points = self.lines.iter().flat_map(|l| l.points.iter().copied());

        facet_points.chain(line_points).fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((min, max)) => Some((min.inf(&p), max.sup(&p))),
        })
    }
}

/// Output of a single structure, before merging into [`RenderOutput`]
struct StructurePass {
    facets: Vec<FacetMesh>,
    lines: Vec<EdgeLine>,
    failures: Vec<RenderFailure>,
    warning: Option<ProjectionWarning>,
}

fn render_structure(
    structure: &Structure,
    structure_index: usize,
    anchor: &Anchor,
    config: &RenderConfig,
) -> StructurePass {
    let warning = if structure.has_supported_projection() {
        None
    } else {
        let warning = ProjectionWarning {
            structure_index,
            projection: structure.projection.clone(),
        };
        tracing::warn!(structure = structure_index, "{}", warning);
        Some(warning)
    };

    let (facets, mut failures) =
        build_facets(structure, structure_index, anchor, config.base_elevation);
    let (lines, line_failures) =
        build_lines(structure, structure_index, anchor, config.line_elevation());
    failures.extend(line_failures);

    tracing::debug!(
        structure = structure_index,
        surfaces = structure.surfaces.len(),
        edges = structure.edges.len(),
        facets = facets.len(),
        lines = lines.len(),
        failures = failures.len(),
        "rendered structure"
    );

    StructurePass {
        facets,
        lines,
        failures,
        warning,
    }
}

/// Render a structure collection into facet meshes and edge lines.
///
/// Fails only when the collection has no points. Per-surface and per-edge
/// problems are collected in [`RenderOutput::failures`] and never abort the
/// pass. The input collection is not modified.
pub fn render_collection(
    collection: &StructureCollection,
    config: &RenderConfig,
) -> Result<RenderOutput> {
    let anchor = compute_anchor(collection)?;
    tracing::debug!(
        structures = collection.structures.len(),
        x0 = anchor.x0,
        y0 = anchor.y0,
        z_min = anchor.z_min,
        "computed anchor"
    );

    let passes: Vec<StructurePass> = if config.parallel {
        render_parallel(collection, &anchor, config)
    } else {
        collection
            .structures
            .iter()
            .enumerate()
            .map(|(i, s)| render_structure(s, i, &anchor, config))
            .collect()
    };

    let mut output = RenderOutput {
        anchor,
        facets: Vec::new(),
        lines: Vec::new(),
        failures: Vec::new(),
        warnings: Vec::new(),
    };
    for pass in passes {
        output.facets.extend(pass.facets);
        output.lines.extend(pass.lines);
        output.failures.extend(pass.failures);
        output.warnings.extend(pass.warning);
    }

    Ok(output)
}

// On WASM: no threads available, fall back to sequential iteration
#[cfg(not(target_arch = "wasm32"))]
fn render_parallel(
    collection: &StructureCollection,
    anchor: &Anchor,
    config: &RenderConfig,
) -> Vec<StructurePass> {
    use rayon::prelude::*;

    collection
        .structures
        .par_iter()
        .enumerate()
        .map(|(i, s)| render_structure(s, i, anchor, config))
        .collect()
}

#[cfg(target_arch = "wasm32")]
fn render_parallel(
    collection: &StructureCollection,
    anchor: &Anchor,
    config: &RenderConfig,
) -> Vec<StructurePass> {
    collection
        .structures
        .iter()
        .enumerate()
        .map(|(i, s)| render_structure(s, i, anchor, config))
        .collect()
}
