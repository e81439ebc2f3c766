// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Structure3D Core
//!
//! Data model for building structures described as points, edges and
//! surfaces, as found in structures-json documents.
//!
//! ## Overview
//!
//! - **Model**: [`Structure`] owns its point, edge and surface tables; surfaces
//!   and edges refer to other entities by id only
//! - **Documents**: [`StructureDocument`] loads either a collection or a single
//!   structure and normalizes both into a [`StructureCollection`]
//! - **Bounds**: [`scan_collection_bounds`] computes the collection's bounding
//!   box, from which renderers derive their anchor
//! - **Feature ids**: [`FeatureId`] addresses an edge or surface across a
//!   collection (`"<structureIndex>-<elementId>"`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use structure3d_core::StructureDocument;
//!
//! let collection = StructureDocument::from_json(&json)?.into_collection();
//! for structure in &collection.structures {
//!     println!("{} surfaces", structure.surfaces.len());
//! }
//! ```

pub mod bounds;
pub mod error;
pub mod ids;
pub mod kind;
pub mod model;
pub mod projection;

pub use bounds::{scan_collection_bounds, CollectionBounds};
pub use error::{Error, Result};
pub use ids::FeatureId;
pub use kind::EdgeKind;
pub use model::{
    Coordinate, Edge, Feature, Point, Properties, Structure, StructureCollection,
    StructureDocument, Surface, COLLECTION_KIND, STRUCTURE_KIND,
};
pub use projection::Projection;
