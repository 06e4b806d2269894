// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning the grid back into pixels, either as it looks or as the
//! carver sees it.

use crate::energy::{energy, MAX_ENERGY};
use crate::grid::PixelGrid;
use crate::pixel::PixelId;
use image::{ImageBuffer, Rgb, Rgba, RgbaImage};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorMode {
    /// The pixels' own colors.
    Natural,
    /// Energy as a grey level, black for flat regions.
    Energy,
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::Natural
    }
}

/// Grey level for an energy value.
pub fn energy_shade(e: f64) -> u8 {
    (e / MAX_ENERGY * 255.0).floor().max(0.0).min(255.0) as u8
}

fn shade(grid: &PixelGrid, id: PixelId, mode: ColorMode, highlight: Option<Rgb<u8>>) -> Rgba<u8> {
    if let Some(Rgb([r, g, b])) = highlight.filter(|_| grid.is_marked(id)) {
        return Rgba([r, g, b, 255]);
    }
    match mode {
        ColorMode::Natural => {
            let Rgb([r, g, b]) = grid.color(id).unwrap_or(Rgb([0, 0, 0]));
            Rgba([r, g, b, 255])
        }
        ColorMode::Energy => {
            let v = energy_shade(energy(grid, id));
            Rgba([v, v, v, 255])
        }
    }
}

/// Row-major RGBA bytes of the grid in the given mode.  Marked pixels
/// are painted `highlight` when one is given.
pub fn render(grid: &PixelGrid, mode: ColorMode, highlight: Option<Rgb<u8>>) -> Vec<u8> {
    grid.rows()
        .iter()
        .flatten()
        .flat_map(|&id| shade(grid, id, mode, highlight).0.to_vec())
        .collect()
}

pub fn render_image(grid: &PixelGrid, mode: ColorMode, highlight: Option<Rgb<u8>>) -> RgbaImage {
    let (width, height) = grid.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| {
        shade(grid, grid.rows()[y as usize][x as usize], mode, highlight)
    })
}
