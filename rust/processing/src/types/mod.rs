// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Type definitions for track requests and responses.

mod mesh;
mod request;
mod response;

pub use mesh::{MeshData, Primitive};
pub use request::{BatchRequest, TrackRequest};
pub use response::{BatchResponse, ProcessingStats, TrackFailure, TrackOutput, TrackStats};
