//! Hex coordinates over a bounded rectangular map.
//!
//! Cells are indexed by `(q, r)` with `0 <= q < width` and `0 <= r < height`
//! and stored row-major. Adjacency uses one fixed six-offset pattern for every
//! cell, whatever the parity of its column or row.

use serde::{Deserialize, Serialize};

/// Offsets of the six neighbours, in the order they are visited.
pub const NEIGHBOR_OFFSETS: [(i64, i64); 6] = [(0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1)];

/// Position of a single hex on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub q: u32,
    pub r: u32,
}

impl Coord {
    #[must_use]
    pub const fn new(q: u32, r: u32) -> Self {
        Self { q, r }
    }

    /// The six raw neighbour positions. Some may fall outside the map (or be
    /// negative); use [`Bounds::neighbors`] for the filtered set.
    #[must_use]
    pub fn neighbors(self) -> [(i64, i64); 6] {
        NEIGHBOR_OFFSETS.map(|(dq, dr)| (i64::from(self.q) + dq, i64::from(self.r) + dr))
    }

    /// Straight-line distance, used for grimdark zoning.
    #[must_use]
    pub fn distance(self, other: Coord) -> f64 {
        let dq = f64::from(self.q) - f64::from(other.q);
        let dr = f64::from(self.r) - f64::from(other.r);
        dq.hypot(dr)
    }

    /// Manhattan distance, used to weight blob growth toward round shapes.
    #[must_use]
    pub fn taxicab(self, other: Coord) -> u32 {
        self.q.abs_diff(other.q) + self.r.abs_diff(other.r)
    }

    /// Whether `other` is one of the six neighbours of `self`.
    #[must_use]
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.neighbors()
            .contains(&(i64::from(other.q), i64::from(other.r)))
    }
}

/// Size of the map. Both dimensions are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn contains(self, q: i64, r: i64) -> bool {
        q >= 0 && r >= 0 && q < i64::from(self.width) && r < i64::from(self.height)
    }

    /// In-bounds neighbours of `coord`, in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors(self, coord: Coord) -> impl Iterator<Item = Coord> {
        coord
            .neighbors()
            .into_iter()
            .filter(move |&(q, r)| self.contains(q, r))
            .map(|(q, r)| Coord::new(q as u32, r as u32))
    }

    /// Moves `coord` by `(dq, dr)` and clamps the result to the map edges.
    #[must_use]
    pub fn clamp_offset(self, coord: Coord, dq: i64, dr: i64) -> Coord {
        let q = (i64::from(coord.q) + dq).clamp(0, i64::from(self.width) - 1);
        let r = (i64::from(coord.r) + dr).clamp(0, i64::from(self.height) - 1);
        Coord::new(q as u32, r as u32)
    }

    #[must_use]
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major arena index.
    #[must_use]
    pub fn index(self, coord: Coord) -> usize {
        coord.r as usize * self.width as usize + coord.q as usize
    }

    #[must_use]
    pub fn coord(self, index: usize) -> Coord {
        let width = self.width as usize;
        Coord::new((index % width) as u32, (index / width) as u32)
    }

    /// All coordinates in row-major order.
    pub fn coords(self) -> impl Iterator<Item = Coord> {
        (0..self.height).flat_map(move |r| (0..self.width).map(move |q| Coord::new(q, r)))
    }
}
