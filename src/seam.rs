// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seams
//!
//! A seam is one pixel per row (vertical) or per column (horizontal).
//! It is stored head first: entry zero is the top row of its view, and
//! each entry's predecessor in the cost recurrence is the entry before
//! it.

use crate::pixel::PixelId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Runs top to bottom; removing it narrows the image.
    Vertical,
    /// Runs left to right; removing it shortens the image.
    Horizontal,
}

impl Axis {
    pub fn turn(self) -> Self {
        match self {
            Axis::Vertical => Axis::Horizontal,
            Axis::Horizontal => Axis::Vertical,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SeamEntry {
    pub pixel: PixelId,
    /// Cumulative energy of the seam from the head down to this entry.
    pub weight: f64,
    /// Position of the pixel within its row when the seam was found.
    pub column: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeamPath {
    axis: Axis,
    entries: Vec<SeamEntry>,
}

impl SeamPath {
    /// Entries must be ordered head (row zero) to tail.  Nothing is
    /// checked here; surgery rejects a seam that does not fit the grid.
    pub fn new(axis: Axis, entries: Vec<SeamEntry>) -> Self {
        SeamPath { axis, entries }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn entries(&self) -> &[SeamEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn head(&self) -> Option<&SeamEntry> {
        self.entries.first()
    }

    pub fn tail(&self) -> Option<&SeamEntry> {
        self.entries.last()
    }

    /// The entry one row above entry `index`.
    pub fn predecessor(&self, index: usize) -> Option<&SeamEntry> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Cost of the whole seam.
    pub fn total_weight(&self) -> f64 {
        self.tail().map_or(0.0, |e| e.weight)
    }

    pub fn pixels<'a>(&'a self) -> impl Iterator<Item = PixelId> + 'a {
        self.entries.iter().map(|e| e.pixel)
    }
}
