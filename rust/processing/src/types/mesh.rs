// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data types for serialization.

use raceway_geometry::Mesh;
use serde::{Deserialize, Serialize};

/// Face layout of [`MeshData::indices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    /// Four indices per face, counter-clockwise seen from outside.
    Quads,
    /// Three indices per face; each quad split along its first diagonal.
    Triangles,
}

impl Primitive {
    /// Indices per face
    #[inline]
    pub fn arity(self) -> usize {
        match self {
            Primitive::Quads => 4,
            Primitive::Triangles => 3,
        }
    }
}

/// One track part (surface or barrier) as flat buffers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshData {
    /// Track the part belongs to.
    pub track: String,
    /// Part name ("surface", "outer_barrier", "inner_barrier").
    pub part: String,
    /// Face layout of `indices`.
    pub primitive: Primitive,
    /// Vertex positions (x, y, z triplets).
    pub positions: Vec<f32>,
    /// Smooth vertex normals (x, y, z triplets).
    pub normals: Vec<f32>,
    /// Face indices, `primitive.arity()` per face.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Flatten a quad mesh. Normals come from the triangulated form in both
    /// layouts, so vertex order and normals agree either way.
    pub fn from_mesh(track: &str, part: &str, mesh: &Mesh, primitive: Primitive) -> Self {
        let triangles = mesh.triangulate();
        let indices = match primitive {
            Primitive::Triangles => triangles.indices,
            Primitive::Quads => mesh.quads.iter().flatten().copied().collect(),
        };

        Self {
            track: track.to_string(),
            part: part.to_string(),
            primitive,
            positions: triangles.positions,
            normals: triangles.normals,
            indices,
        }
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get the number of faces.
    pub fn face_count(&self) -> usize {
        self.indices.len() / self.primitive.arity()
    }

    /// Check if the mesh is empty.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }
}
