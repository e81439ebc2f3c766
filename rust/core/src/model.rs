// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structure data model
//!
//! Mirrors the structures-json document layout: a collection holds an ordered
//! list of structures, each of which owns its point, edge and surface tables.
//! Surfaces and edges refer to other entities by identifier only; lookups are
//! always resolved against the owning [`Structure`].

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::ids::FeatureId;
use crate::kind::EdgeKind;
use crate::projection::Projection;

/// Free-form properties attached to edges and surfaces (length, area, material, ...)
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Treat an explicit `null` the same as a missing field
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A coordinate triple in the structure's coordinate reference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Check that every component is a finite number
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl TryFrom<Vec<f64>> for Coordinate {
    type Error = String;

    fn try_from(values: Vec<f64>) -> std::result::Result<Self, Self::Error> {
        match values.as_slice() {
            [x, y] => Ok(Self::new(*x, *y, 0.0)),
            [x, y, z, ..] => Ok(Self::new(*x, *y, *z)),
            _ => Err(format!(
                "coordinates need 2 or 3 components, got {}",
                values.len()
            )),
        }
    }
}

impl From<Coordinate> for Vec<f64> {
    fn from(c: Coordinate) -> Self {
        vec![c.x, c.y, c.z]
    }
}

/// A named vertex of a structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub coordinates: Coordinate,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            coordinates: Coordinate::new(x, y, z),
        }
    }
}

/// An undirected edge between two (or more, for polyline edges) points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Point ids along the edge; the first and last are its endpoints
    pub points: Vec<String>,
    /// Category label (eave, hip, valley, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EdgeKind>,
    #[serde(default, deserialize_with = "nullable")]
    pub properties: Properties,
}

impl Edge {
    /// Create a two-point edge without category or properties
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            points: vec![a.into(), b.into()],
            kind: None,
            properties: Properties::new(),
        }
    }

    /// Attach a category label
    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// First and last point ids, if the edge has at least two points
    #[inline]
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        match self.points.as_slice() {
            [first, .., last] => Some((first.as_str(), last.as_str())),
            _ => None,
        }
    }
}

/// A bounded facet; the first ring is the outer boundary, the rest are holes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Rings of edge ids, each an unordered set forming one closed loop
    #[serde(rename = "edges")]
    pub rings: Vec<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub properties: Properties,
}

impl Surface {
    pub fn new(rings: Vec<Vec<String>>) -> Self {
        Self {
            rings,
            properties: Properties::new(),
        }
    }

    /// Material label, when `properties.material` is a string
    pub fn material(&self) -> Option<&str> {
        self.properties.get("material").and_then(|v| v.as_str())
    }
}

/// Document `kind` tag of a single structure
pub const STRUCTURE_KIND: &str = "structure";
/// Document `kind` tag of a structure collection
pub const COLLECTION_KIND: &str = "structurecollection";

/// A single building structure and its geometry tables
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Structure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Coordinate reference of the points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    #[serde(default, deserialize_with = "nullable")]
    pub points: FxHashMap<String, Point>,
    #[serde(default, deserialize_with = "nullable")]
    pub edges: BTreeMap<String, Edge>,
    #[serde(default, deserialize_with = "nullable")]
    pub surfaces: BTreeMap<String, Surface>,
}

impl Structure {
    pub fn new(projection: Projection) -> Self {
        Self {
            projection: Some(projection),
            ..Self::default()
        }
    }

    #[inline]
    pub fn point(&self, id: &str) -> Option<&Point> {
        self.points.get(id)
    }

    #[inline]
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    #[inline]
    pub fn surface(&self, id: &str) -> Option<&Surface> {
        self.surfaces.get(id)
    }

    /// Whether the points are in a coordinate reference handled natively
    pub fn has_supported_projection(&self) -> bool {
        self.projection
            .as_ref()
            .map(Projection::is_supported)
            .unwrap_or(false)
    }
}

// Serialized with its `kind` tag so the output loads back as a document
impl Serialize for Structure {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = 4 + usize::from(self.id.is_some()) + usize::from(self.projection.is_some());
        let mut state = serializer.serialize_struct("Structure", len)?;
        state.serialize_field("kind", STRUCTURE_KIND)?;
        match &self.id {
            Some(id) => state.serialize_field("id", id)?,
            None => state.skip_field("id")?,
        }
        match &self.projection {
            Some(projection) => state.serialize_field("projection", projection)?,
            None => state.skip_field("projection")?,
        }
        state.serialize_field("points", &self.points)?;
        state.serialize_field("edges", &self.edges)?;
        state.serialize_field("surfaces", &self.surfaces)?;
        state.end()
    }
}

/// An ordered set of structures rendered around one shared anchor
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StructureCollection {
    #[serde(default)]
    pub structures: Vec<Structure>,
}

impl StructureCollection {
    pub fn new(structures: Vec<Structure>) -> Self {
        Self { structures }
    }

    /// Total number of points across every structure
    pub fn point_count(&self) -> usize {
        self.structures.iter().map(|s| s.points.len()).sum()
    }

    /// True when there is nothing to render
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Resolve a rendered feature id back to the edge or surface it came from.
    /// Edges take precedence when an edge and a surface share an id.
    pub fn resolve(&self, id: &FeatureId) -> Option<Feature<'_>> {
        let structure = self.structures.get(id.structure_index)?;
        if let Some(edge) = structure.edge(&id.element_id) {
            return Some(Feature::Edge(edge));
        }
        structure.surface(&id.element_id).map(Feature::Surface)
    }
}

impl Serialize for StructureCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("StructureCollection", 2)?;
        state.serialize_field("kind", COLLECTION_KIND)?;
        state.serialize_field("structures", &self.structures)?;
        state.end()
    }
}

/// An edge or surface found through [`StructureCollection::resolve`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feature<'a> {
    Edge(&'a Edge),
    Surface(&'a Surface),
}

impl<'a> Feature<'a> {
    pub fn properties(&self) -> &'a Properties {
        match *self {
            Feature::Edge(e) => &e.properties,
            Feature::Surface(s) => &s.properties,
        }
    }
}

/// A loaded structures-json document
#[derive(Debug, Clone, PartialEq)]
pub enum StructureDocument {
    Collection(StructureCollection),
    Structure(Structure),
}

impl StructureDocument {
    /// Parse a `structurecollection` or `structure` document
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let kind = value.get("kind").and_then(|k| k.as_str()).map(str::to_owned);
        match kind.as_deref() {
            Some(COLLECTION_KIND) => Ok(Self::Collection(serde_json::from_value(value)?)),
            Some(STRUCTURE_KIND) => Ok(Self::Structure(serde_json::from_value(value)?)),
            // Untagged documents are accepted when their shape is unambiguous
            None if value.get("structures").is_some() => {
                Ok(Self::Collection(serde_json::from_value(value)?))
            }
            None => Err(Error::UnknownDocumentKind("<missing>".to_string())),
            Some(other) => Err(Error::UnknownDocumentKind(other.to_string())),
        }
    }

    /// Serialize back to a tagged structures-json document
    pub fn to_json(&self) -> Result<String> {
        let json = match self {
            Self::Collection(c) => serde_json::to_string(c)?,
            Self::Structure(s) => serde_json::to_string(s)?,
        };
        Ok(json)
    }

    /// Wrap a single structure into a one-element collection
    pub fn into_collection(self) -> StructureCollection {
        match self {
            Self::Collection(c) => c,
            Self::Structure(s) => StructureCollection::new(vec![s]),
        }
    }
}
