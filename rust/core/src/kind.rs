// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edge category labels

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic classification of an edge.
///
/// The set is open: labels outside the known list are kept as
/// [`EdgeKind::Other`] and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeKind {
    Eave,
    Hip,
    Valley,
    Flash,
    Ridge,
    Rake,
    StepFlash,
    Parapet,
    Fance,
    Chimney,
    Other(String),
}

impl EdgeKind {
    /// The label as it appears in structure documents
    pub fn as_str(&self) -> &str {
        match self {
            EdgeKind::Eave => "eave",
            EdgeKind::Hip => "hip",
            EdgeKind::Valley => "valley",
            EdgeKind::Flash => "flash",
            EdgeKind::Ridge => "ridge",
            EdgeKind::Rake => "rake",
            EdgeKind::StepFlash => "stepflash",
            EdgeKind::Parapet => "parapet",
            EdgeKind::Fance => "fance",
            EdgeKind::Chimney => "chimney",
            EdgeKind::Other(label) => label,
        }
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        !matches!(self, EdgeKind::Other(_))
    }
}

impl From<&str> for EdgeKind {
    fn from(label: &str) -> Self {
        match label {
            "eave" => EdgeKind::Eave,
            "hip" => EdgeKind::Hip,
            "valley" => EdgeKind::Valley,
            "flash" => EdgeKind::Flash,
            "ridge" => EdgeKind::Ridge,
            "rake" => EdgeKind::Rake,
            "stepflash" => EdgeKind::StepFlash,
            "parapet" => EdgeKind::Parapet,
            "fance" => EdgeKind::Fance,
            "chimney" => EdgeKind::Chimney,
            other => EdgeKind::Other(other.to_string()),
        }
    }
}

impl From<String> for EdgeKind {
    fn from(label: String) -> Self {
        match EdgeKind::from(label.as_str()) {
            EdgeKind::Other(_) => EdgeKind::Other(label),
            known => known,
        }
    }
}

impl From<EdgeKind> for String {
    fn from(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
