//! The planar target mesh.
//!
//! Shares vertex ids with the source mesh. A vertex has no coordinate until a
//! move places it. Triangles are either conquered images of source faces or
//! *fan* triangles (a, b, origin), one per front edge (a, b), which together
//! tile the part of the target polygon not yet conquered.

use std::collections::HashMap;

use super::coordinate::Coordinate;
use super::predicate::{orientation, Orientation};
use super::source::Status;
use crate::error::{MeshError, Result};
use crate::mesh::{TriangleId, VertexId};

/// Rotate a triangle so that `first` is its first vertex.
pub(crate) fn rotate_to(tri: [VertexId; 3], first: VertexId) -> Option<[VertexId; 3]> {
    let k = tri.iter().position(|&v| v == first)?;
    Some([tri[k], tri[(k + 1) % 3], tri[(k + 2) % 3]])
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TargetMesh {
    coords: Vec<Option<Coordinate>>,
    triangles: Vec<Option<[VertexId; 3]>>,
    /// `Front` for fan triangles, `Conquered` for mapped faces.
    status: Vec<Status>,
    /// Directed edge (a, b) -> triangle having a -> b in its orientation.
    lookup: HashMap<(VertexId, VertexId), TriangleId>,
    vertex_triangles: Vec<Vec<TriangleId>>,
}

impl TargetMesh {
    /// A mesh of `n` unplaced vertices and no triangles.
    pub fn with_placeholders(n: usize) -> Self {
        Self {
            coords: vec![None; n],
            vertex_triangles: vec![Vec::new(); n],
            ..Self::default()
        }
    }

    // ==================== Vertices ====================

    pub fn num_vertices(&self) -> usize {
        self.coords.len()
    }

    /// Append an unplaced vertex.
    pub fn add_placeholder(&mut self) -> VertexId {
        self.coords.push(None);
        self.vertex_triangles.push(Vec::new());
        VertexId::new(self.coords.len() - 1)
    }

    pub fn coord(&self, v: VertexId) -> Option<&Coordinate> {
        self.coords[v.index()].as_ref()
    }

    /// The coordinate of a vertex that must already be placed.
    pub fn require(&self, v: VertexId) -> Result<&Coordinate> {
        self.coord(v)
            .ok_or(MeshError::MissingCoordinate { vertex: v.index() })
    }

    pub fn set_coord(&mut self, v: VertexId, coord: Coordinate) {
        self.coords[v.index()] = Some(coord);
    }

    // ==================== Triangles ====================

    pub fn triangle(&self, t: TriangleId) -> Option<[VertexId; 3]> {
        self.triangles[t.index()]
    }

    pub fn status(&self, t: TriangleId) -> Status {
        self.status[t.index()]
    }

    pub fn set_status(&mut self, t: TriangleId, status: Status) {
        self.status[t.index()] = status;
    }

    /// Live triangles with their status.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, [VertexId; 3], Status)> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|tri| (TriangleId::new(i), tri, self.status[i])))
    }

    /// Live triangles incident to a vertex.
    pub fn triangles_around(&self, v: VertexId) -> &[TriangleId] {
        &self.vertex_triangles[v.index()]
    }

    /// The triangle containing the directed edge a -> b.
    pub fn triangle_with(&self, a: VertexId, b: VertexId) -> Option<TriangleId> {
        self.lookup.get(&(a, b)).copied()
    }

    pub fn add_triangle(&mut self, tri: [VertexId; 3], status: Status) -> Result<TriangleId> {
        let [a, b, c] = tri;
        if let Some(&(x, y)) = [(a, b), (b, c), (c, a)]
            .iter()
            .find(|&&e| self.lookup.contains_key(&e))
        {
            return Err(MeshError::invariant(format!(
                "target edge ({}, {}) is already used",
                x, y
            )));
        }

        let t = TriangleId::new(self.triangles.len());
        self.triangles.push(Some(tri));
        self.status.push(status);
        self.link(t, tri);
        Ok(t)
    }

    pub fn remove_triangle(&mut self, t: TriangleId) {
        if let Some(tri) = self.triangles[t.index()].take() {
            self.unlink(t, tri);
        }
    }

    /// Replace the triangles on both sides of edge (a, b) by the two triangles
    /// on the other diagonal of their quadrilateral.
    ///
    /// With (a, b, c) and (b, a, d) on either side, the result is (d, b, c)
    /// and (c, a, d), stored in the old slots in that order.
    pub fn flip_edge(&mut self, a: VertexId, b: VertexId) -> Result<(TriangleId, TriangleId)> {
        let missing =
            || MeshError::invariant(format!("target edge ({}, {}) is not interior", a, b));
        let t1 = self.triangle_with(a, b).ok_or_else(missing)?;
        let t2 = self.triangle_with(b, a).ok_or_else(missing)?;

        let c = self.opposite(t1, a, b)?;
        let d = self.opposite(t2, b, a)?;

        self.replace(t1, [d, b, c]);
        self.replace(t2, [c, a, d]);
        Ok((t1, t2))
    }

    /// Vertex of `t` that follows the directed edge a -> b.
    fn opposite(&self, t: TriangleId, a: VertexId, b: VertexId) -> Result<VertexId> {
        self.triangle(t)
            .and_then(|tri| rotate_to(tri, a))
            .filter(|r| r[1] == b)
            .map(|r| r[2])
            .ok_or_else(|| {
                MeshError::invariant(format!("triangle {} has no edge ({}, {})", t, a, b))
            })
    }

    fn replace(&mut self, t: TriangleId, tri: [VertexId; 3]) {
        if let Some(old) = self.triangles[t.index()].take() {
            self.unlink(t, old);
        }
        self.triangles[t.index()] = Some(tri);
        self.link(t, tri);
    }

    fn link(&mut self, t: TriangleId, [a, b, c]: [VertexId; 3]) {
        for (x, y) in [(a, b), (b, c), (c, a)] {
            self.lookup.insert((x, y), t);
        }
        for v in [a, b, c] {
            self.vertex_triangles[v.index()].push(t);
        }
    }

    fn unlink(&mut self, t: TriangleId, [a, b, c]: [VertexId; 3]) {
        for (x, y) in [(a, b), (b, c), (c, a)] {
            if self.lookup.get(&(x, y)) == Some(&t) {
                self.lookup.remove(&(x, y));
            }
        }
        for v in [a, b, c] {
            self.vertex_triangles[v.index()].retain(|&x| x != t);
        }
    }

    // ==================== Geometry ====================

    /// Orientation of a vertex triple, with optional coordinate override for
    /// one vertex.
    pub fn orient(
        &self,
        tri: [VertexId; 3],
        replace: Option<(VertexId, &Coordinate)>,
        exact_fallbacks: &mut usize,
    ) -> Result<Orientation> {
        let [a, b, c] = tri.map(|v| self.pick(v, replace));
        orientation([a?, b?, c?], exact_fallbacks)
    }

    fn pick<'a>(
        &'a self,
        v: VertexId,
        replace: Option<(VertexId, &'a Coordinate)>,
    ) -> Result<&'a Coordinate> {
        match replace {
            Some((w, c)) if w == v => Ok(c),
            _ => self.require(v),
        }
    }

    /// First live triangle around `v` that is not counter-clockwise, if any.
    pub fn first_inverted_around(
        &self,
        v: VertexId,
        replace: Option<(VertexId, &Coordinate)>,
        exact_fallbacks: &mut usize,
    ) -> Result<Option<TriangleId>> {
        for &t in self.triangles_around(v) {
            if let Some(tri) = self.triangle(t) {
                if !self.orient(tri, replace, exact_fallbacks)?.is_positive() {
                    return Ok(Some(t));
                }
            }
        }
        Ok(None)
    }
}
