// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Corridor mesh building - closed quad strips
//!
//! Each sample contributes one four-corner cross-section. Consecutive
//! sections (including the wrap from the last back to the first) are joined
//! by four quads: top, bottom, left side and right side. The result is a
//! watertight tube with every face wound counter-clockwise seen from
//! outside.

use crate::corridor::{
    CorridorOffsets, CorridorStrip, LEFT_BOTTOM, LEFT_TOP, RIGHT_BOTTOM, RIGHT_TOP,
};
use crate::error::Result;
use crate::frame::Frame;
use crate::mesh::{Mesh, MeshBuilder};
use crate::path::{ensure_loop, next_index, PathSample};

/// Quads emitted per span between two sections
pub const QUADS_PER_SPAN: usize = 4;

/// Emit a closed strip into any host builder.
///
/// Creates exactly four vertices per section and four quads per span; no
/// vertex is shared between sections and none is duplicated.
pub fn emit_strip<B: MeshBuilder>(strip: &CorridorStrip, builder: &mut B) {
    let sections: Vec<[B::VertexId; 4]> = strip
        .sections
        .iter()
        .map(|s| s.map(|p| builder.new_vertex(p)))
        .collect();

    let n = sections.len();
    for i in 0..n {
        let s1 = sections[i];
        let s2 = sections[next_index(i, n)];

        // top
        builder.new_quad([s1[RIGHT_TOP], s2[RIGHT_TOP], s2[LEFT_TOP], s1[LEFT_TOP]]);
        // bottom
        builder.new_quad([s1[LEFT_BOTTOM], s2[LEFT_BOTTOM], s2[RIGHT_BOTTOM], s1[RIGHT_BOTTOM]]);
        // left side
        builder.new_quad([s1[LEFT_TOP], s2[LEFT_TOP], s2[LEFT_BOTTOM], s1[LEFT_BOTTOM]]);
        // right side
        builder.new_quad([s1[RIGHT_BOTTOM], s2[RIGHT_BOTTOM], s2[RIGHT_TOP], s1[RIGHT_TOP]]);
    }
}

/// Collect a strip into a standalone [`Mesh`]
fn strip_to_mesh(strip: &CorridorStrip) -> Mesh {
    let mut mesh = Mesh::with_capacity(strip.len() * 4, strip.len() * QUADS_PER_SPAN);
    emit_strip(strip, &mut mesh);
    mesh
}

/// Build the roadway slab: `4 * n` quads for `n` samples.
pub fn build_strip(
    samples: &[PathSample],
    frames: &[Frame],
    offsets: &[CorridorOffsets],
    thickness: f64,
) -> Result<Mesh> {
    ensure_loop(samples)?;
    let strip = CorridorStrip::roadway(samples, frames, offsets, thickness)?;
    Ok(strip_to_mesh(&strip))
}

/// Build a barrier ribbon of constant `width` and `height` whose centre sits
/// `center_offsets[i]` along the left normal (negative = right side), raised
/// `base_height` above the path.
pub fn build_offset_ribbon(
    samples: &[PathSample],
    frames: &[Frame],
    center_offsets: &[f64],
    width: f64,
    height: f64,
    base_height: f64,
) -> Result<Mesh> {
    ensure_loop(samples)?;
    let strip = CorridorStrip::ribbon(samples, frames, center_offsets, width, height, base_height)?;
    Ok(strip_to_mesh(&strip))
}
