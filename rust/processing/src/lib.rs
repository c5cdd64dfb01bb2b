// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raceway Processing
//!
//! Service layer over `raceway-geometry`: JSON track requests in, flattened
//! mesh buffers out. Single tracks run on the calling thread;
//! batches fan out over a rayon pool sized from [`ProcessingConfig`].
//!
//! ```rust,no_run
//! use raceway_processing::{ProcessingConfig, TrackProcessor};
//!
//! let processor = TrackProcessor::new(ProcessingConfig::from_env())?;
//! let json = r#"{"name": "ring", "source": {"type": "circle", "radius": 25}}"#;
//! let output = processor.process_json(json)?;
//! println!("{}", output);
//! # Ok::<(), raceway_processing::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod processor;
pub mod types;

pub use config::ProcessingConfig;
pub use error::{Error, Result};
pub use processor::{process_track, TrackProcessor};
pub use types::{
    BatchRequest, BatchResponse, MeshData, Primitive, ProcessingStats, TrackFailure, TrackOutput,
    TrackRequest, TrackStats,
};
