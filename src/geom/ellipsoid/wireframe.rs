use itertools::Itertools;
use nalgebra as na;

use super::points::ellipsoid_point_count;

/// A line segment between two vertices, given by their indices.
pub type Edge = [usize; 2];

/// Number of edges produced by [wireframe_edges]: two pole fans of `stacks` segments and five
/// segments per stack for each of the `slices - 3` bands between interior rings.
pub fn expected_edge_count(slices: usize, stacks: usize) -> usize {
    2 * stacks + 5 * stacks * slices.saturating_sub(3)
}

/// Connects the samples of [super::ellipsoid_points] into a wireframe.
///
/// Edges are emitted in drawing order: the fan around the first pole, then every band between
/// two adjacent interior rings, then the fan around the last pole. Each band cell is the line
/// strip `this[i], next[i+1], next[i], this[i], this[i+1], next[i+1]`, the outline of two
/// triangles sharing a diagonal. Edges shared by neighbouring cells are emitted twice.
///
/// # Panics
/// If `slices < 3`, `stacks < 3`, or `points` does not hold `stacks * (slices - 2) + 2`
/// samples.
pub fn wireframe_edges<T>(points: &[T], slices: usize, stacks: usize) -> Vec<Edge> {
    assert!(slices >= 3, "slices must be >= 3, got {}", slices);
    assert!(stacks >= 3, "stacks must be >= 3, got {}", stacks);
    assert_eq!(
        points.len(),
        ellipsoid_point_count(slices, stacks),
        "point count does not match {} slices and {} stacks",
        slices,
        stacks
    );

    let first_slice = 1;
    let last_point = points.len() - 1;
    let last_slice = first_slice + (slices - 3) * stacks;

    let mut edges = Vec::with_capacity(expected_edge_count(slices, stacks));

    edges.extend((0..stacks).map(|i| [0, first_slice + i]));

    for s in 0..slices - 3 {
        let this = first_slice + stacks * s;
        let next = this + stacks;

        for i in 0..stacks {
            let ii = (i + 1) % stacks;
            edges.extend([
                [this + i, next + ii],
                [next + ii, next + i],
                [next + i, this + i],
                [this + i, this + ii],
                [this + ii, next + ii],
            ]);
        }
    }

    edges.extend((0..stacks).map(|i| [last_point, last_slice + i]));

    log::trace!("built {} wireframe edges", edges.len());
    edges
}

/// Vertices plus the edges joining them, ready for a line renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Wireframe<F: na::RealField + Copy, const D: usize> {
    pub vertices: Vec<na::Point<F, D>>,
    pub edges: Vec<Edge>,
}

impl<F: na::RealField + Copy, const D: usize> Wireframe<F, D> {
    /// Closed polygon through `vertices` in order, last vertex joined back to the first.
    pub fn line_loop(vertices: Vec<na::Point<F, D>>) -> Self {
        let edges = if vertices.len() < 2 {
            Vec::new()
        } else {
            (0..vertices.len())
                .circular_tuple_windows()
                .map(|(a, b)| [a, b])
                .collect()
        };
        Self { vertices, edges }
    }

    /// Endpoints of every edge, in edge order.
    pub fn segments(&self) -> impl Iterator<Item = (&na::Point<F, D>, &na::Point<F, D>)> + '_ {
        self.edges
            .iter()
            .map(|&[a, b]| (&self.vertices[a], &self.vertices[b]))
    }
}

impl<F: na::RealField + Copy> Wireframe<F, 3> {
    /// Ellipsoid wireframe over samples laid out by [super::ellipsoid_points].
    pub fn spatial(vertices: Vec<na::Point3<F>>, slices: usize, stacks: usize) -> Self {
        let edges = wireframe_edges(&vertices, slices, stacks);
        Self { vertices, edges }
    }
}
