// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collection bounds calculation
//!
//! Scans every point of every structure once to determine the axis-aligned
//! bounding box of a collection in f64 precision. The renderer anchor is
//! derived from these bounds.

use crate::model::{Coordinate, StructureCollection};

/// Axis-aligned bounds in source coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
    /// Number of points sampled
    pub sample_count: usize,
}

impl CollectionBounds {
    /// Create new bounds initialized to invalid state
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            min_y: f64::MAX,
            min_z: f64::MAX,
            max_x: f64::MIN,
            max_y: f64::MIN,
            max_z: f64::MIN,
            sample_count: 0,
        }
    }

    /// Check if bounds are valid (at least one point added)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.sample_count > 0
    }

    /// Expand bounds to include a coordinate
    #[inline]
    pub fn expand(&mut self, c: &Coordinate) {
        self.min_x = self.min_x.min(c.x);
        self.min_y = self.min_y.min(c.y);
        self.min_z = self.min_z.min(c.z);
        self.max_x = self.max_x.max(c.x);
        self.max_y = self.max_y.max(c.y);
        self.max_z = self.max_z.max(c.z);
        self.sample_count += 1;
    }

    /// Horizontal midpoint of the box, `None` when no point was added
    #[inline]
    pub fn horizontal_center(&self) -> Option<(f64, f64)> {
        if !self.is_valid() {
            return None;
        }
        Some((
            self.min_x + (self.max_x - self.min_x) / 2.0,
            self.min_y + (self.max_y - self.min_y) / 2.0,
        ))
    }
}

impl Default for CollectionBounds {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan all points of a collection.
///
/// Non-finite coordinates are skipped so a single corrupt point cannot turn
/// the whole anchor into NaN.
pub fn scan_collection_bounds(collection: &StructureCollection) -> CollectionBounds {
    let mut bounds = CollectionBounds::new();

    for structure in &collection.structures {
        for point in structure.points.values() {
            if point.coordinates.is_finite() {
                bounds.expand(&point.coordinates);
            }
        }
    }

    bounds
}
