// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures
//!
//! [`Mesh`] is the host-agnostic output of the pipeline: vertices and quad
//! faces. Hosts that own their own mesh objects implement [`MeshBuilder`]
//! and receive the same geometry through [`Mesh::replay_into`].
//! [`TriangleMesh`] is the flattened, GPU-style form.

use nalgebra::{Point3, Vector3};

/// Index of a vertex in a [`Mesh`]
pub type VertexId = u32;

/// The two primitive operations the corridor builder needs from a host
pub trait MeshBuilder {
    /// Host handle for a created vertex
    type VertexId: Copy;

    /// Allocate a vertex at `position`
    fn new_vertex(&mut self, position: Point3<f64>) -> Self::VertexId;

    /// Create a quad face from four vertices, counter-clockwise seen from outside
    fn new_quad(&mut self, quad: [Self::VertexId; 4]);
}

/// Quad mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<Point3<f64>>,
    /// Quad faces (vertex indices)
    pub quads: Vec<[VertexId; 4]>,
}

impl MeshBuilder for Mesh {
    type VertexId = VertexId;

    #[inline]
    fn new_vertex(&mut self, position: Point3<f64>) -> VertexId {
        self.positions.push(position);
        (self.positions.len() - 1) as VertexId
    }

    #[inline]
    fn new_quad(&mut self, quad: [VertexId; 4]) {
        self.quads.push(quad);
    }
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, quad_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count),
            quads: Vec::with_capacity(quad_count),
        }
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get quad count
    #[inline]
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Merge another mesh into this one
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }
        let vertex_offset = self.positions.len() as VertexId;
        self.positions.extend_from_slice(&other.positions);
        self.quads
            .extend(other.quads.iter().map(|q| q.map(|i| i + vertex_offset)));
    }

    /// Replay this mesh into a host builder, vertices first
    pub fn replay_into<B: MeshBuilder>(&self, builder: &mut B) {
        let ids: Vec<B::VertexId> = self
            .positions
            .iter()
            .map(|p| builder.new_vertex(*p))
            .collect();
        for quad in &self.quads {
            builder.new_quad(quad.map(|i| ids[i as usize]));
        }
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }
        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);
        for p in &self.positions {
            min = min.inf(p);
            max = max.sup(p);
        }
        (min, max)
    }

    /// Area of quad `index`, as the sum of its two triangles
    pub fn quad_area(&self, index: usize) -> f64 {
        let [a, b, c, d] = self.quads[index].map(|i| self.positions[i as usize]);
        ((b - a).cross(&(c - a)).norm() + (c - a).cross(&(d - a)).norm()) / 2.0
    }

    /// Signed enclosed volume (positive when faces wind outward)
    pub fn signed_volume(&self) -> f64 {
        self.quads
            .iter()
            .map(|q| {
                let [a, b, c, d] = q.map(|i| self.positions[i as usize].coords);
                a.dot(&b.cross(&c)) + a.dot(&c.cross(&d))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Number of faces each vertex belongs to
    pub fn vertex_valence(&self) -> Vec<usize> {
        let mut valence = vec![0usize; self.positions.len()];
        for quad in &self.quads {
            for &i in quad {
                valence[i as usize] += 1;
            }
        }
        valence
    }

    /// Split every quad into two triangles and compute smooth normals
    pub fn triangulate(&self) -> TriangleMesh {
        let mut tri = TriangleMesh::with_capacity(self.positions.len(), self.quads.len() * 6);
        for p in &self.positions {
            tri.add_vertex(*p, Vector3::zeros());
        }
        for &[a, b, c, d] in &self.quads {
            tri.add_triangle(a, b, c);
            tri.add_triangle(a, c, d);
        }
        tri.calculate_normals();
        tri
    }
}

/// Triangle mesh in flat f32 buffers
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Merge another mesh into this one
    pub fn merge(&mut self, other: &TriangleMesh) {
        if other.is_empty() {
            return;
        }
        let vertex_offset = (self.positions.len() / 3) as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    fn position(&self, i: usize) -> Point3<f64> {
        Point3::new(
            self.positions[i * 3] as f64,
            self.positions[i * 3 + 1] as f64,
            self.positions[i * 3 + 2] as f64,
        )
    }

    /// Recompute vertex normals by accumulating area-weighted face normals
    pub fn calculate_normals(&mut self) {
        let vertex_count = self.vertex_count();
        let mut normals = vec![Vector3::<f64>::zeros(); vertex_count];

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let v0 = self.position(i0);
            let normal = (self.position(i1) - v0).cross(&(self.position(i2) - v0));
            normals[i0] += normal;
            normals[i1] += normal;
            normals[i2] += normal;
        }

        self.normals.clear();
        self.normals.reserve(vertex_count * 3);
        for n in normals {
            let n = n.try_normalize(1e-12).unwrap_or_else(Vector3::z);
            self.normals.push(n.x as f32);
            self.normals.push(n.y as f32);
            self.normals.push(n.z as f32);
        }
    }
}
