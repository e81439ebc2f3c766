// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate reference tags carried by structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coordinate reference of a structure's points
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Projection {
    /// Longitude/latitude in degrees (OGC CRS84)
    Crs84,
    /// Web Mercator metres (EPSG:3857)
    WebMercator,
    /// Anything else; coordinates are used as-is
    Other(String),
}

impl Projection {
    pub fn as_str(&self) -> &str {
        match self {
            Projection::Crs84 => "crs84",
            Projection::WebMercator => "webmerc",
            Projection::Other(tag) => tag,
        }
    }

    /// Whether this is one of the natively handled references.
    ///
    /// Nothing in this crate reprojects coordinates. `crs84` points are
    /// degrees, so callers must convert them to Web Mercator metres before
    /// rendering, or horizontal degrees end up mixed with metre elevations.
    #[inline]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Projection::Other(_))
    }
}

impl From<String> for Projection {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "crs84" => Projection::Crs84,
            "webmerc" => Projection::WebMercator,
            _ => Projection::Other(tag),
        }
    }
}

impl From<Projection> for String {
    fn from(projection: Projection) -> Self {
        match projection {
            Projection::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_tags() {
        assert_eq!(Projection::from("webmerc".to_string()), Projection::WebMercator);
        assert_eq!(Projection::from("crs84".to_string()), Projection::Crs84);
        assert!(Projection::Crs84.is_supported());

        let other = Projection::from("epsg:2056".to_string());
        assert!(!other.is_supported());
        assert_eq!(other.to_string(), "epsg:2056");
    }
}
