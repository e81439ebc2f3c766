// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for data model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or addressing structure data
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid structure document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown document kind: {0}")]
    UnknownDocumentKind(String),

    #[error("Invalid feature id '{0}': expected '<structureIndex>-<elementId>'")]
    InvalidFeatureId(String),
}
