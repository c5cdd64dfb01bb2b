// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types.

use raceway_geometry::{ConditioningOptions, PathSource, TrackParams};
use serde::{Deserialize, Serialize};

/// One track to generate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRequest {
    /// Caller-chosen label, echoed in the output.
    pub name: String,

    /// Where the centreline comes from.
    pub source: PathSource,

    /// Corridor dimensions; every field is optional.
    #[serde(default)]
    pub params: TrackParams,

    /// Per-request conditioning override; the processor's configuration
    /// applies when absent.
    #[serde(default)]
    pub conditioning: Option<ConditioningOptions>,
}

impl TrackRequest {
    /// Request with default parameters
    pub fn new(name: impl Into<String>, source: PathSource) -> Self {
        Self {
            name: name.into(),
            source,
            params: TrackParams::default(),
            conditioning: None,
        }
    }

    pub fn with_params(mut self, params: TrackParams) -> Self {
        self.params = params;
        self
    }
}

/// Several independent tracks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    pub tracks: Vec<TrackRequest>,
}
