// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate re-centering and axis remapping
//!
//! Source data is Z-up with Y pointing north; render space is Y-up. Every
//! vertex handed to the renderer is expressed relative to a collection-wide
//! [`Anchor`] so facets and lines of all structures stay co-located and small
//! enough to survive the f32 conversion.

use nalgebra::Point3;
use structure3d_core::{scan_collection_bounds, Coordinate, StructureCollection};

use crate::error::{Error, Result};

/// Collection-wide reference point: horizontal bounding-box center and the
/// lowest elevation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x0: f64,
    pub y0: f64,
    pub z_min: f64,
}

impl Anchor {
    pub fn new(x0: f64, y0: f64, z_min: f64) -> Self {
        Self { x0, y0, z_min }
    }

    /// Map a source coordinate into render space.
    ///
    /// `x' = x - x0`, `y' = z - z_min + base_elevation`, `z' = y0 - y`.
    /// The vertical axis becomes Y and the northing is sign-flipped so the
    /// result is right-handed.
    #[inline]
    pub fn normalize(&self, c: &Coordinate, base_elevation: f64) -> Point3<f64> {
        Point3::new(
            c.x - self.x0,
            c.z - self.z_min + base_elevation,
            self.y0 - c.y,
        )
    }
}

/// Compute the anchor of a collection.
///
/// Fails with [`Error::EmptyCollection`] when the collection has no (finite)
/// points; callers should skip rendering rather than call this on empty input.
pub fn compute_anchor(collection: &StructureCollection) -> Result<Anchor> {
    let bounds = scan_collection_bounds(collection);
    let (x0, y0) = bounds.horizontal_center().ok_or(Error::EmptyCollection)?;
    Ok(Anchor::new(x0, y0, bounds.min_z))
}

/// Free-function form of [`Anchor::normalize`]
#[inline]
pub fn normalize_point(c: &Coordinate, anchor: &Anchor, base_elevation: f64) -> Point3<f64> {
    anchor.normalize(c, base_elevation)
}
