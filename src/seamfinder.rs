// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Finding the cheapest seam
//!
//! Classic dynamic programming over the energy map: every cell of the
//! seam digraph holds the cheapest cumulative energy of any seam
//! reaching it from the top row, and the column it came through.  Only
//! the vertical search exists; horizontal seams are found in the
//! flipped view of the grid.

use crate::energy::energy_map;
use crate::grid::PixelGrid;
use crate::seam::{Axis, SeamEntry, SeamPath};
use crate::twodmap::{EnergyAndBackPointer, TwoDimensionalMap};
use tracing::trace;

/// This trait defines how we will get seams out of an image.  It's a
/// primitive interface, just enough to make room for other seam
/// finders later.
pub trait SeamFinder {
    /// Request the cheapest top-to-bottom seam, if the image has any
    /// pixels at all.
    fn find_vertical_seam(&mut self) -> Option<SeamPath>;

    /// Request the cheapest left-to-right seam.
    fn find_horizontal_seam(&mut self) -> Option<SeamPath>;

    fn find_seam(&mut self, axis: Axis) -> Option<SeamPath> {
        match axis {
            Axis::Vertical => self.find_vertical_seam(),
            Axis::Horizontal => self.find_horizontal_seam(),
        }
    }
}

/// The cheapest way into column `x` from the row above.  Straight up
/// is the provisional choice; up-left replaces it only when strictly
/// cheaper, and then up-right only when strictly cheaper than that, so
/// exact ties prefer up, then left, then right.
pub fn choose_parent(above: &[EnergyAndBackPointer<f64>], x: usize) -> EnergyAndBackPointer<f64> {
    let mut best = EnergyAndBackPointer {
        energy: above[x].energy,
        parent: x as u32,
    };

    if x > 0 && above[x - 1].energy < best.energy {
        best = EnergyAndBackPointer {
            energy: above[x - 1].energy,
            parent: (x - 1) as u32,
        };
    }

    if x + 1 < above.len() && above[x + 1].energy < best.energy {
        best = EnergyAndBackPointer {
            energy: above[x + 1].energy,
            parent: (x + 1) as u32,
        };
    }

    best
}

/// Given an energy map, return for every row the column of the
/// cheapest seam and the seam's cumulative energy at that row.  Empty
/// when the map has no rows or no columns.
pub fn energy_to_seam(energy: &TwoDimensionalMap<f64>) -> Vec<(u32, f64)> {
    let (width, height) = (energy.width, energy.height);
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let mut target: TwoDimensionalMap<EnergyAndBackPointer<f64>> =
        TwoDimensionalMap::new(width, height);

    // Populate the first row with their native energies.
    for x in 0..width {
        target[(x, 0)].energy = energy[(x, 0)];
    }

    // For every subsequent row, the cell's cost is its own energy plus
    // the cheapest of the (up to) three cells above it.
    for y in 1..height {
        for x in 0..width {
            let parent = choose_parent(target.row(y - 1), x as usize);
            target[(x, y)] = EnergyAndBackPointer {
                energy: energy[(x, y)] + parent.energy,
                parent: parent.parent,
            };
        }
    }

    // The leftmost of the cheapest cells in the bottom row.
    let last = target.row(height - 1);
    let mut seam_col = 0;
    for (x, cell) in last.iter().enumerate() {
        if cell.energy < last[seam_col].energy {
            seam_col = x;
        }
    }
    let mut seam_col = seam_col as u32;

    // Working backwards, follow the parents up to the top row, then
    // reverse.
    let mut seam: Vec<(u32, f64)> = (0..height)
        .rev()
        .map(|y| {
            let cell = target[(seam_col, y)];
            let here = (seam_col, cell.energy);
            seam_col = cell.parent;
            here
        })
        .collect();
    seam.reverse();
    seam
}

// Materialize the column trace as a seam of pixels in the current view.
fn trace_to_path(grid: &PixelGrid, axis: Axis, trace: Vec<(u32, f64)>) -> SeamPath {
    let entries = trace
        .into_iter()
        .enumerate()
        .map(|(y, (x, weight))| SeamEntry {
            pixel: grid.rows()[y][x as usize],
            weight,
            column: Some(x as usize),
        })
        .collect();
    SeamPath::new(axis, entries)
}

fn find_in_view(grid: &mut PixelGrid, axis: Axis) -> Option<SeamPath> {
    grid.oriented(axis, |grid| {
        let trace = energy_to_seam(&energy_map(grid));
        if trace.is_empty() {
            return None;
        }
        let path = trace_to_path(grid, axis, trace);
        trace!(?axis, weight = path.total_weight(), "found seam");
        Some(path)
    })
}

impl SeamFinder for PixelGrid {
    fn find_vertical_seam(&mut self) -> Option<SeamPath> {
        find_in_view(self, Axis::Vertical)
    }

    fn find_horizontal_seam(&mut self) -> Option<SeamPath> {
        find_in_view(self, Axis::Horizontal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Direction;

    const ENERGY_DATA: [f64; 20] = [
        9., 9., 0., 9., 9., 9., 1., 9., 8., 9., 9., 9., 9., 9., 0., 9., 9., 9., 0., 9.,
    ];

    fn map(width: u32, height: u32, data: &[f64]) -> TwoDimensionalMap<f64> {
        TwoDimensionalMap::from_vec(width, height, data.to_vec()).unwrap()
    }

    fn columns(seam: &[(u32, f64)]) -> Vec<u32> {
        seam.iter().map(|&(x, _)| x).collect()
    }

    fn row(costs: &[f64]) -> Vec<EnergyAndBackPointer<f64>> {
        costs
            .iter()
            .map(|&energy| EnergyAndBackPointer { energy, parent: 0 })
            .collect()
    }

    #[test]
    fn energy_grid_to_vertical_seam() {
        let seam = energy_to_seam(&map(5, 4, &ENERGY_DATA));
        assert_eq!(columns(&seam), [2, 3, 4, 3]);
        assert_eq!(seam.last().map(|&(_, w)| w), Some(8.0));
    }

    #[test]
    fn energy_grid_to_horizontal_seam() {
        let seam = energy_to_seam(&map(5, 4, &ENERGY_DATA).transposed());
        assert_eq!(columns(&seam), [1, 1, 0, 1, 2]);
        assert_eq!(seam.last().map(|&(_, w)| w), Some(18.0));
    }

    #[test]
    fn three_way_tie_goes_straight_up() {
        assert_eq!(choose_parent(&row(&[1., 1., 1.]), 1).parent, 1);
        let seam = energy_to_seam(&map(3, 3, &[1., 1., 1., 5., 0., 5., 5., 0., 5.]));
        assert_eq!(columns(&seam), [1, 1, 1]);
    }

    #[test]
    fn left_beats_right_on_a_tie() {
        let chosen = choose_parent(&row(&[1., 9., 1.]), 1);
        assert_eq!((chosen.parent, chosen.energy), (0, 1.));
        let seam = energy_to_seam(&map(3, 3, &[1., 9., 1., 9., 0., 9., 9., 0., 9.]));
        assert_eq!(columns(&seam), [0, 1, 1]);
    }

    #[test]
    fn strictly_cheaper_neighbors_win() {
        assert_eq!(choose_parent(&row(&[2., 3., 1.]), 1).parent, 2);
        assert_eq!(choose_parent(&row(&[0.5, 3., 1.]), 1).parent, 0);
        assert_eq!(choose_parent(&row(&[4., 3.]), 0).parent, 1);
        assert_eq!(choose_parent(&row(&[3., 3.]), 1).parent, 1);
    }

    #[test]
    fn bottom_row_ties_go_left() {
        let seam = energy_to_seam(&map(3, 1, &[2., 1., 1.]));
        assert_eq!(columns(&seam), [1]);
    }

    #[test]
    fn degenerate_maps_have_no_seam() {
        assert!(energy_to_seam(&map(0, 3, &[])).is_empty());
        assert!(energy_to_seam(&map(3, 0, &[])).is_empty());
    }

    #[test]
    fn grid_seam_follows_the_dark_column() {
        // A black column down the middle of a white image.
        let rgba: Vec<u8> = (0..5 * 4)
            .flat_map(|i| if i % 5 == 2 { vec![0, 0, 0, 255] } else { vec![255, 255, 255, 255] })
            .collect();
        let mut grid = PixelGrid::from_rgba(5, 4, &rgba).unwrap();
        let seam = grid.find_vertical_seam().unwrap();
        assert_eq!(seam.axis(), Axis::Vertical);
        assert_eq!(seam.len(), 4);
        for (y, entry) in seam.entries().iter().enumerate() {
            assert_eq!(entry.pixel, grid.rows()[y][entry.column.unwrap()]);
        }
        // consecutive entries are vertically adjacent
        for pair in seam.entries().windows(2) {
            let up = grid.neighbor(pair[1].pixel, Direction::Up);
            assert!(
                up == pair[0].pixel
                    || grid.neighbor(up, Direction::Left) == pair[0].pixel
                    || grid.neighbor(up, Direction::Right) == pair[0].pixel
            );
        }
    }

    #[test]
    fn horizontal_seams_come_back_in_the_original_view() {
        let mut grid = crate::grid::tests::gradient(4, 6);
        let seam = grid.find_seam(Axis::Horizontal).unwrap();
        assert!(!grid.is_transposed());
        assert_eq!(seam.axis(), Axis::Horizontal);
        assert_eq!(seam.len(), 4);
        // entry i is a pixel of column i
        for (x, entry) in seam.entries().iter().enumerate() {
            assert!(grid.rows().iter().any(|row| row[x] == entry.pixel));
        }
    }

    #[test]
    fn empty_grids_have_no_seam() {
        let mut grid = PixelGrid::from_rgba(0, 0, &[]).unwrap();
        assert!(grid.find_seam(Axis::Vertical).is_none());
        assert!(grid.find_seam(Axis::Horizontal).is_none());
    }
}
