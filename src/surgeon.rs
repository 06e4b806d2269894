// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam surgery
//!
//! Removing a seam drops one pixel out of every row by pointing its
//! left and right neighbors at each other.  Where the seam steps
//! sideways between rows, the column that ran through the removed
//! pixel has to be rerouted through the neighbor that slides into its
//! place.  The removed pixels' own links are left alone, which is what
//! makes reinsertion exact: each pixel still knows where it used to
//! be.

use crate::error::{CarveError, Result};
use crate::grid::PixelGrid;
use crate::pixel::{Direction, PixelId};
use crate::seam::{SeamEntry, SeamPath};
use tracing::debug;

/// How a seam pixel relates to the seam pixel in the row above it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Slide {
    /// Directly above.
    Still,
    /// Above and to the right: the pixel on our right moves under our
    /// old up neighbor.
    Left,
    /// Above and to the left: the pixel on our left moves under it.
    Right,
}

/// Take `seam` out of the grid.  The seam is checked against the grid
/// in full before any link is written; a seam that does not fit fails
/// with `MalformedSeam` and leaves the grid as it was.
pub fn remove_seam(grid: &mut PixelGrid, seam: &SeamPath) -> Result<()> {
    grid.oriented(seam.axis(), |grid| remove_vertical(grid, seam.entries()))?;
    debug!(axis = ?seam.axis(), dimensions = ?grid.dimensions(), "removed seam");
    Ok(())
}

/// Put a previously removed seam back.  Seams must be reinserted in the
/// reverse order of their removal.
pub fn insert_seam(grid: &mut PixelGrid, seam: &SeamPath) {
    grid.oriented(seam.axis(), |grid| insert_vertical(grid, seam.entries()));
    debug!(axis = ?seam.axis(), dimensions = ?grid.dimensions(), "reinserted seam");
}

/// Flag (or unflag) every pixel of a seam for highlighting.
pub fn mark(grid: &mut PixelGrid, seam: &SeamPath, marked: bool) {
    for pixel in seam.pixels() {
        grid.set_marked(pixel, marked);
    }
}

// For each entry, where its pixel sits in its row and how it relates to
// the entry above.  Lower rows' rewiring never touches the links this
// reads, so the whole seam can be classified before anything changes.
fn classify(grid: &PixelGrid, entries: &[SeamEntry]) -> Result<Vec<(usize, Slide)>> {
    if entries.len() != grid.rows().len() {
        return Err(CarveError::MalformedSeam {
            row: entries.len().min(grid.rows().len()),
        });
    }

    entries
        .iter()
        .enumerate()
        .map(|(row, entry)| {
            let malformed = CarveError::MalformedSeam { row };
            let x = grid
                .position_in_row(row, entry.pixel, entry.column)
                .ok_or_else(|| malformed.clone())?;
            if row == 0 {
                return Ok((x, Slide::Still));
            }
            let above = entries[row - 1].pixel;
            let up = grid.neighbor(entry.pixel, Direction::Up);
            let slide = if above == up {
                Slide::Still
            } else if above == grid.neighbor(up, Direction::Right) {
                Slide::Left
            } else if above == grid.neighbor(up, Direction::Left) {
                Slide::Right
            } else {
                return Err(malformed);
            };
            Ok((x, slide))
        })
        .collect()
}

fn slide_out(grid: &mut PixelGrid, pixel: PixelId, slide: Slide) {
    let left = grid.neighbor(pixel, Direction::Left);
    let right = grid.neighbor(pixel, Direction::Right);
    let up = grid.neighbor(pixel, Direction::Up);
    grid.link(left, Direction::Right, right);
    match slide {
        Slide::Still => {}
        Slide::Left => grid.link(right, Direction::Up, up),
        Slide::Right => grid.link(left, Direction::Up, up),
    }
}

fn remove_vertical(grid: &mut PixelGrid, entries: &[SeamEntry]) -> Result<()> {
    let plan = classify(grid, entries)?;

    // Bottom row first, working up toward the head of the seam.
    for (entry, &(_, slide)) in entries.iter().zip(plan.iter()).rev() {
        slide_out(grid, entry.pixel, slide);
    }
    for (row, &(x, _)) in plan.iter().enumerate() {
        grid.remove_from_row(row, x);
    }
    Ok(())
}

// Top row first.  Each pixel drags its four remembered neighbors back
// to it, then takes its old place in the row just before its right
// neighbor.
fn insert_vertical(grid: &mut PixelGrid, entries: &[SeamEntry]) {
    grid.ensure_rows(entries.len());
    for (row, entry) in entries.iter().enumerate() {
        let pixel = entry.pixel;
        for &dir in Direction::ALL.iter() {
            let neighbor = grid.neighbor(pixel, dir);
            grid.link(pixel, dir, neighbor);
        }
        let right = grid.neighbor(pixel, Direction::Right);
        grid.splice_before(row, pixel, right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::gradient;
    use crate::seam::Axis;
    use crate::seamfinder::SeamFinder;
    use image::Rgb;

    const BLACK_WHITE_BLACK: [u8; 12] = [0, 0, 0, 255, 255, 255, 255, 255, 0, 0, 0, 255];

    fn seam_of(grid: &PixelGrid, axis: Axis, columns: &[usize]) -> SeamPath {
        let entries = columns
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let pixel = match axis {
                    Axis::Vertical => grid.rows()[i][c],
                    Axis::Horizontal => grid.rows()[c][i],
                };
                SeamEntry {
                    pixel,
                    weight: 0.0,
                    column: Some(c),
                }
            })
            .collect();
        SeamPath::new(axis, entries)
    }

    #[test]
    fn single_row_loses_its_brightest_pixel() {
        let mut grid = PixelGrid::from_rgba(3, 1, &BLACK_WHITE_BLACK).unwrap();
        let seam = grid.find_vertical_seam().unwrap();
        assert_eq!(seam.entries()[0].column, Some(1));
        remove_seam(&mut grid, &seam).unwrap();
        assert_eq!(grid.dimensions(), (2, 1));
        assert_eq!(grid.to_rgba(), vec![0, 0, 0, 255, 0, 0, 0, 255]);
        grid.verify().unwrap();
    }

    #[test]
    fn leftmost_of_equal_columns_goes_first() {
        // Bright-dark-bright: the two gradients cancel everywhere, so
        // every column costs nothing.
        let rgba = [255, 255, 255, 255, 0, 0, 0, 255, 255, 255, 255, 255];
        let mut grid = PixelGrid::from_rgba(3, 1, &rgba).unwrap();
        let ids = grid.rows()[0].to_vec();
        let seam = grid.find_vertical_seam().unwrap();
        assert_eq!(seam.entries()[0].pixel, ids[0]);
        remove_seam(&mut grid, &seam).unwrap();
        assert_eq!(grid.rows()[0], vec![ids[1], ids[2]]);
        assert_eq!(grid.color(ids[1]), Some(Rgb([0, 0, 0])));
    }

    #[test]
    fn straight_and_drifting_seams_keep_the_grid_whole() {
        for columns in [[0, 0, 0, 0], [0, 1, 2, 3], [3, 2, 1, 0], [1, 2, 1, 0], [2, 2, 3, 3]].iter() {
            let mut grid = gradient(4, 4);
            let seam = seam_of(&grid, Axis::Vertical, columns);
            let expected: Vec<Vec<PixelId>> = grid
                .rows()
                .iter()
                .zip(columns.iter())
                .map(|(row, &c)| row.iter().enumerate().filter(|&(x, _)| x != c).map(|(_, &p)| p).collect())
                .collect();
            remove_seam(&mut grid, &seam).unwrap();
            assert_eq!(grid.dimensions(), (3, 4));
            assert_eq!(grid.rows(), &expected[..]);
            grid.verify().unwrap();
        }
    }

    #[test]
    fn horizontal_removal_shortens_every_column() {
        let mut grid = gradient(5, 3);
        let seam = seam_of(&grid, Axis::Horizontal, &[2, 1, 1, 0, 1]);
        remove_seam(&mut grid, &seam).unwrap();
        assert!(!grid.is_transposed());
        assert_eq!(grid.dimensions(), (5, 2));
        grid.verify().unwrap();
    }

    #[test]
    fn removal_then_insertion_restores_everything() {
        let mut grid = gradient(5, 4);
        let rows = grid.rows().to_vec();
        let rgba = grid.to_rgba();

        let mut history = Vec::new();
        for &axis in [Axis::Vertical, Axis::Horizontal, Axis::Vertical, Axis::Horizontal].iter() {
            let seam = grid.find_seam(axis).unwrap();
            remove_seam(&mut grid, &seam).unwrap();
            grid.verify().unwrap();
            history.push(seam);
        }
        assert_eq!(grid.dimensions(), (3, 2));

        while let Some(seam) = history.pop() {
            insert_seam(&mut grid, &seam);
            grid.verify().unwrap();
        }
        assert_eq!(grid.rows(), &rows[..]);
        assert_eq!(grid.to_rgba(), rgba);
    }

    #[test]
    fn carving_to_nothing_and_back() {
        let mut grid = gradient(3, 1);
        let rows = grid.rows().to_vec();
        let seam = grid.find_seam(Axis::Horizontal).unwrap();
        remove_seam(&mut grid, &seam).unwrap();
        assert_eq!(grid.dimensions(), (3, 0));
        insert_seam(&mut grid, &seam);
        assert_eq!(grid.rows(), &rows[..]);
        grid.verify().unwrap();

        let mut grid = gradient(1, 3);
        let seam = grid.find_seam(Axis::Vertical).unwrap();
        remove_seam(&mut grid, &seam).unwrap();
        assert_eq!(grid.dimensions(), (0, 3));
        insert_seam(&mut grid, &seam);
        assert_eq!(grid.dimensions(), (1, 3));
        grid.verify().unwrap();
    }

    #[test]
    fn each_removal_takes_exactly_one_line() {
        use crate::seam::Axis::{Horizontal as H, Vertical as V};
        let mut grid = gradient(5, 4);
        let rgba = grid.to_rgba();
        let expected = [(4, 4), (4, 3), (4, 2), (3, 2), (2, 2), (2, 1), (1, 1), (1, 0)];

        let mut history = Vec::new();
        for (&axis, &dims) in [V, H, H, V, V, H, V, H].iter().zip(expected.iter()) {
            let seam = grid.find_seam(axis).unwrap();
            remove_seam(&mut grid, &seam).unwrap();
            assert_eq!(grid.dimensions(), dims);
            grid.verify().unwrap();
            history.push(seam);
        }
        assert!(grid.find_seam(V).is_none());
        assert!(grid.find_seam(H).is_none());

        while let Some(seam) = history.pop() {
            insert_seam(&mut grid, &seam);
            grid.verify().unwrap();
        }
        assert_eq!(grid.dimensions(), (5, 4));
        assert_eq!(grid.to_rgba(), rgba);
    }

    #[test]
    fn broken_seam_is_refused_untouched() {
        let mut grid = gradient(4, 3);
        let rows = grid.rows().to_vec();
        let seam = seam_of(&grid, Axis::Vertical, &[0, 1, 3]);
        assert_eq!(remove_seam(&mut grid, &seam), Err(CarveError::MalformedSeam { row: 2 }));
        assert_eq!(grid.rows(), &rows[..]);
        grid.verify().unwrap();
    }

    #[test]
    fn short_seam_is_refused() {
        let mut grid = gradient(4, 3);
        let seam = seam_of(&grid, Axis::Vertical, &[0, 0]);
        assert_eq!(remove_seam(&mut grid, &seam), Err(CarveError::MalformedSeam { row: 2 }));
        grid.verify().unwrap();
    }

    #[test]
    fn stale_column_hint_falls_back_to_search() {
        let mut grid = gradient(4, 2);
        let mut seam = seam_of(&grid, Axis::Vertical, &[1, 1]);
        let entries: Vec<SeamEntry> = seam
            .entries()
            .iter()
            .map(|e| SeamEntry { column: Some(3), ..*e })
            .collect();
        seam = SeamPath::new(Axis::Vertical, entries);
        remove_seam(&mut grid, &seam).unwrap();
        assert_eq!(grid.dimensions(), (3, 2));
        assert!(!grid.rows()[0].contains(&seam.entries()[0].pixel));
        grid.verify().unwrap();
    }

    #[test]
    fn marking_flags_each_seam_pixel() {
        let mut grid = gradient(3, 3);
        let seam = seam_of(&grid, Axis::Vertical, &[1, 1, 2]);
        mark(&mut grid, &seam, true);
        let marked = grid.rows().iter().flatten().filter(|&&p| grid.is_marked(p)).count();
        assert_eq!(marked, 3);
        mark(&mut grid, &seam, false);
        assert!(grid.rows().iter().flatten().all(|&p| !grid.is_marked(p)));
    }
}
