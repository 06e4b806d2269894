// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pixel nodes
//!
//! A pixel is either a colored node with four links, or the single
//! border sentinel.  Links are arena indices into the owning
//! `PixelGrid`, so the graph can be rewired freely without fighting
//! the borrow checker over cycles.

use image::Rgb;
use std::cell::Cell;

/// A stable handle to a node in a `PixelGrid` arena.  Index zero is
/// always the border sentinel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelId(pub(crate) u32);

impl PixelId {
    pub const BORDER: PixelId = PixelId(0);

    pub fn is_border(self) -> bool {
        self == PixelId::BORDER
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The same direction seen through a grid flipped 90° about its
    /// main diagonal.
    pub fn transposed(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Down,
        }
    }

    /// The two directions whose gradient formulas read a link in this
    /// direction.
    pub(crate) fn across(self) -> (Direction, Direction) {
        match self {
            Direction::Left | Direction::Right => (Direction::Up, Direction::Down),
            Direction::Up | Direction::Down => (Direction::Left, Direction::Right),
        }
    }

    #[inline]
    fn slot(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// A colored pixel.  The color never changes after construction, so
/// brightness is cached for good; energy depends on the links and is
/// dropped whenever a link it reads is rewritten.
#[derive(Debug, Clone)]
pub struct ColorPixel {
    color: Rgb<u8>,
    brightness: Cell<Option<f64>>,
    energy: Cell<Option<f64>>,
    pub(crate) marked: bool,
    links: [PixelId; 4],
}

impl ColorPixel {
    pub fn new(color: Rgb<u8>) -> Self {
        ColorPixel {
            color,
            brightness: Cell::new(None),
            energy: Cell::new(None),
            marked: false,
            links: [PixelId::BORDER; 4],
        }
    }

    pub fn color(&self) -> Rgb<u8> {
        self.color
    }

    /// Mean of the three channels, scaled to [0, 1].
    pub fn brightness(&self) -> f64 {
        match self.brightness.get() {
            Some(b) => b,
            None => {
                let [r, g, b] = self.color.0;
                let value = (f64::from(r) + f64::from(g) + f64::from(b)) / 765.0;
                self.brightness.set(Some(value));
                value
            }
        }
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    #[inline]
    pub(crate) fn link(&self, dir: Direction) -> PixelId {
        self.links[dir.slot()]
    }

    pub(crate) fn set_link(&mut self, dir: Direction, to: PixelId) {
        self.links[dir.slot()] = to;
        self.invalidate();
    }

    pub(crate) fn cached_energy(&self) -> Option<f64> {
        self.energy.get()
    }

    pub(crate) fn cache_energy(&self, energy: f64) {
        self.energy.set(Some(energy));
    }

    pub(crate) fn invalidate(&self) {
        self.energy.set(None);
    }
}

/// A node in the pixel graph.
#[derive(Debug, Clone)]
pub enum PixelNode {
    /// Zero brightness, zero energy, and its own neighbor in every
    /// direction.
    Border,
    Color(ColorPixel),
}

impl PixelNode {
    pub fn brightness(&self) -> f64 {
        match self {
            PixelNode::Border => 0.0,
            PixelNode::Color(px) => px.brightness(),
        }
    }

    pub fn color(&self) -> Option<Rgb<u8>> {
        match self {
            PixelNode::Border => None,
            PixelNode::Color(px) => Some(px.color()),
        }
    }

    pub fn is_marked(&self) -> bool {
        match self {
            PixelNode::Border => false,
            PixelNode::Color(px) => px.is_marked(),
        }
    }
}
