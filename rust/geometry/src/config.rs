// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render pass configuration, optionally loaded from environment variables.

/// Default height of the lowest point above the render ground plane.
pub const DEFAULT_BASE_ELEVATION: f64 = 10.0;

/// Default lift of edge lines above facets, avoids z-fighting.
pub const DEFAULT_LINE_ELEVATION_OFFSET: f64 = 0.01;

/// Render pass configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Elevation added to every facet vertex after re-centering.
    pub base_elevation: f64,
    /// Extra elevation for edge lines on top of `base_elevation`.
    pub line_elevation_offset: f64,
    /// Process structures on the rayon thread pool.
    pub parallel: bool,
}

impl RenderConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            base_elevation: std::env::var("STRUCTURE3D_BASE_ELEVATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BASE_ELEVATION),
            line_elevation_offset: std::env::var("STRUCTURE3D_LINE_OFFSET")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LINE_ELEVATION_OFFSET),
            parallel: std::env::var("STRUCTURE3D_PARALLEL")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }

    pub fn with_base_elevation(mut self, base_elevation: f64) -> Self {
        self.base_elevation = base_elevation;
        self
    }

    pub fn with_line_elevation_offset(mut self, offset: f64) -> Self {
        self.line_elevation_offset = offset;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Base elevation used for edge lines.
    #[inline]
    pub fn line_elevation(&self) -> f64 {
        self.base_elevation + self.line_elevation_offset
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_elevation: DEFAULT_BASE_ELEVATION,
            line_elevation_offset: DEFAULT_LINE_ELEVATION_OFFSET,
            parallel: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
