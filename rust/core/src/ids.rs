// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stable identifiers for rendered features

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identifies an edge or surface within a collection.
///
/// Element ids are only unique inside their structure, so the structure's
/// position in the collection is part of the id. Renders as
/// `"<structureIndex>-<elementId>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureId {
    pub structure_index: usize,
    pub element_id: String,
}

impl FeatureId {
    pub fn new(structure_index: usize, element_id: impl Into<String>) -> Self {
        Self {
            structure_index,
            element_id: element_id.into(),
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.structure_index, self.element_id)
    }
}

impl FromStr for FeatureId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Element ids may themselves contain '-', so split at the first one
        let (index, element) = s
            .split_once('-')
            .ok_or_else(|| Error::InvalidFeatureId(s.to_string()))?;
        let structure_index = index
            .parse()
            .map_err(|_| Error::InvalidFeatureId(s.to_string()))?;
        Ok(Self::new(structure_index, element))
    }
}

impl TryFrom<String> for FeatureId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FeatureId> for String {
    fn from(id: FeatureId) -> Self {
        id.to_string()
    }
}
