// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of a pixel
//!
//! Energy is a Sobel-style gradient over brightness, read entirely
//! through the pixel graph: a pixel's left column is its left
//! neighbor together with that neighbor's up and down links, and so
//! on.  The border sentinel reads as black, so edge pixels need no
//! special casing.

use crate::grid::PixelGrid;
use crate::pixel::{Direction, PixelId, PixelNode};
use crate::twodmap::TwoDimensionalMap;

/// The largest energy the formula can produce: both gradients at their
/// extreme of ±4.
pub const MAX_ENERGY: f64 = 5.656_854_249_492_381;

#[inline]
pub fn brightness(grid: &PixelGrid, id: PixelId) -> f64 {
    grid.node(id).brightness()
}

// b(p.a) + 2·b(p) + b(p.b)
#[inline]
fn weighted(grid: &PixelGrid, id: PixelId, (a, b): (Direction, Direction)) -> f64 {
    brightness(grid, grid.neighbor(id, a)) + 2.0 * brightness(grid, id) + brightness(grid, grid.neighbor(id, b))
}

/// Left column minus right column.
pub fn horizontal_gradient(grid: &PixelGrid, id: PixelId) -> f64 {
    let column = (Direction::Up, Direction::Down);
    weighted(grid, grid.neighbor(id, Direction::Left), column)
        - weighted(grid, grid.neighbor(id, Direction::Right), column)
}

/// Upper row minus lower row.
pub fn vertical_gradient(grid: &PixelGrid, id: PixelId) -> f64 {
    let row = (Direction::Left, Direction::Right);
    weighted(grid, grid.neighbor(id, Direction::Up), row)
        - weighted(grid, grid.neighbor(id, Direction::Down), row)
}

/// The gradient magnitude at a pixel, memoized on the pixel until one
/// of the links it reads changes.
pub fn energy(grid: &PixelGrid, id: PixelId) -> f64 {
    match grid.node(id) {
        PixelNode::Border => 0.0,
        PixelNode::Color(px) => match px.cached_energy() {
            Some(e) => e,
            None => {
                let (h, v) = (horizontal_gradient(grid, id), vertical_gradient(grid, id));
                let e = (h * h + v * v).sqrt();
                px.cache_energy(e);
                e
            }
        },
    }
}

/// Compute the energy of every pixel in the current view of the grid.
pub fn energy_map(grid: &PixelGrid) -> TwoDimensionalMap<f64> {
    let (width, height) = grid.dimensions();
    let mut emap = TwoDimensionalMap::new(width, height);
    for (y, row) in grid.rows().iter().enumerate() {
        for (x, &id) in row.iter().enumerate() {
            emap[(x as u32, y as u32)] = energy(grid, id);
        }
    }
    emap
}
