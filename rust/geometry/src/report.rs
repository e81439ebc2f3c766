// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-feature failures and warnings collected during a render pass

use std::fmt;

use serde::Serialize;
use structure3d_core::Projection;

use crate::error::Error;

/// Render layer a feature belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Facets,
    Edges,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Facets => "facets",
            Layer::Edges => "edges",
        }
    }
}

/// A feature that could not be turned into geometry
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFailure {
    pub structure_index: usize,
    pub layer: Layer,
    /// Surface id for facets, edge id for lines
    pub element_id: String,
    pub error: Error,
}

impl RenderFailure {
    pub fn facet(structure_index: usize, surface_id: &str, error: Error) -> Self {
        Self {
            structure_index,
            layer: Layer::Facets,
            element_id: surface_id.to_string(),
            error,
        }
    }

    pub fn edge(structure_index: usize, edge_id: &str, error: Error) -> Self {
        Self {
            structure_index,
            layer: Layer::Edges,
            element_id: edge_id.to_string(),
            error,
        }
    }
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.layer {
            Layer::Facets => "surface",
            Layer::Edges => "edge",
        };
        write!(
            f,
            "structure {} {} '{}': {}",
            self.structure_index, what, self.element_id, self.error
        )
    }
}

/// A structure whose coordinate reference is not natively handled; its
/// coordinates were used as-is
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionWarning {
    pub structure_index: usize,
    /// `None` when the structure declared no projection at all
    pub projection: Option<Projection>,
}

impl fmt::Display for ProjectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.projection {
            Some(p) => write!(
                f,
                "structure {} uses unsupported projection '{}'",
                self.structure_index, p
            ),
            None => write!(f, "structure {} declares no projection", self.structure_index),
        }
    }
}
