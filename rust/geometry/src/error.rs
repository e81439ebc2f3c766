// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// What kind of entity a dangling id was expected to name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Point,
    Edge,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Point => f.write_str("point"),
            ReferenceKind::Edge => f.write_str("edge"),
        }
    }
}

/// Errors that can occur during geometry processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Ring edges do not form a single simple closed cycle
    #[error("Malformed ring: {0}")]
    MalformedRing(String),

    /// Fewer than 3 distinct points, or no triangles could be produced
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Dangling reference: {kind} '{id}' does not exist")]
    DanglingReference { kind: ReferenceKind, id: String },

    /// The collection has no points, so no anchor can be derived
    #[error("Structure collection contains no points")]
    EmptyCollection,

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),
}

impl Error {
    pub(crate) fn dangling_point(id: &str) -> Self {
        Error::DanglingReference {
            kind: ReferenceKind::Point,
            id: id.to_string(),
        }
    }

    pub(crate) fn non_finite_point(id: &str) -> Self {
        Error::DegenerateGeometry(format!("point '{}' has non-finite coordinates", id))
    }

    pub(crate) fn dangling_edge(id: &str) -> Self {
        Error::DanglingReference {
            kind: ReferenceKind::Edge,
            id: id.to_string(),
        }
    }
}
