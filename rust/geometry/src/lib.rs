// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raceway Geometry
//!
//! Turns a sparse loop of control points into a closed, smooth track path
//! and sweeps a constant-width corridor along it without self-intersection.
//!
//! Stages run strictly downstream, each consuming the previous stage's
//! samples by value:
//!
//! 1. [`spline::synthesize`] - Catmull-Rom interpolation of the control loop
//! 2. [`resample::resample`] - near-uniform arc-length spacing
//! 3. [`curvature::limit_curvature`] - relax turns the corridor cannot follow
//! 4. [`frame::compute_frames`] - smoothed tangents and left normals
//! 5. [`corridor::compute_offsets`] - shrink the inside edge on tight turns
//! 6. [`ribbon::build_strip`] / [`ribbon::build_offset_ribbon`] - quad strips
//!
//! [`track::generate_track`] runs the whole pipeline in one call.

pub mod corridor;
pub mod curvature;
pub mod error;
pub mod frame;
pub mod mesh;
pub mod params;
pub mod path;
pub mod presets;
pub mod resample;
pub mod ribbon;
pub mod spline;
pub mod track;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use corridor::{compute_offsets, CorridorOffsets, CorridorStrip};
pub use curvature::{limit_curvature, ConditioningReport, CurvatureEstimate, TurnDirection};
pub use error::{Error, Result};
pub use frame::{compute_frames, Frame};
pub use mesh::{Mesh, MeshBuilder, TriangleMesh, VertexId};
pub use params::{ConditioningOptions, TrackParams};
pub use path::{ControlPoint, PathSample};
pub use presets::PathSource;
pub use resample::resample;
pub use ribbon::{build_offset_ribbon, build_strip};
pub use spline::synthesize;
pub use track::{generate_track, TrackMeshes};
