// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel graph
//!
//! Every pixel knows its four neighbors, and the grid keeps a table of
//! rows so that seams can be found by position.  Removing a seam is a
//! matter of rewiring a handful of links per row rather than copying
//! the image, and the removed pixels keep their own links, so putting
//! them back is exact.
//!
//! Like the image `Flipper`, the grid can be viewed turned 90° about
//! its main diagonal: rows become columns and every link read or
//! written through the grid has up/left and down/right exchanged.
//! Horizontal seams are then just vertical seams of the flipped view.

use crate::error::{CarveError, Result};
use crate::pixel::{ColorPixel, Direction, PixelId, PixelNode};
use crate::seam::Axis;
use image::{GenericImageView, ImageBuffer, Pixel, Primitive, Rgb, Rgba, RgbaImage};
use itertools::iproduct;

#[derive(Debug, Clone)]
pub struct PixelGrid {
    arena: Vec<PixelNode>,
    rows: Vec<Vec<PixelId>>,
    // Width of the view, read only when there are no rows to measure.
    columns: usize,
    transposed: bool,
}

impl Default for PixelGrid {
    fn default() -> Self {
        PixelGrid {
            arena: vec![PixelNode::Border],
            rows: Vec::new(),
            columns: 0,
            transposed: false,
        }
    }
}

impl PixelGrid {
    /// Build the graph from row-major RGBA bytes.  Alpha is accepted
    /// and ignored.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(CarveError::BufferSize {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(PixelGrid::from_colors(
            width,
            height,
            rgba.chunks_exact(4).map(|c| Rgb([c[0], c[1], c[2]])),
        ))
    }

    /// Build the graph from any image.  Channels of wider pixel types
    /// are scaled down into 0–255.
    pub fn from_image<I, P, S>(image: &I) -> Self
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
    {
        #[inline]
        fn channel<S: Primitive>(c: S) -> u8 {
            use num_traits::NumCast;
            let max: f64 = NumCast::from(S::DEFAULT_MAX_VALUE).unwrap_or(255.0);
            let value: f64 = NumCast::from(c).unwrap_or(0.0);
            (value / max * 255.0).round().max(0.0).min(255.0) as u8
        }

        let (width, height) = image.dimensions();
        PixelGrid::from_colors(
            width,
            height,
            iproduct!(0..height, 0..width).map(|(y, x)| {
                let Rgb([r, g, b]) = image.get_pixel(x, y).to_rgb();
                Rgb([channel(r), channel(g), channel(b)])
            }),
        )
    }

    // Rows are stitched together as they are laid down: the first pixel
    // of a row hangs below the first pixel of the row above, and every
    // later pixel hangs below its left neighbor's up-right diagonal.
    fn from_colors<C>(width: u32, height: u32, colors: C) -> Self
    where
        C: IntoIterator<Item = Rgb<u8>>,
    {
        let mut grid = PixelGrid::default();
        grid.columns = width as usize;
        grid.arena.reserve(width as usize * height as usize);
        let mut colors = colors.into_iter();
        for (y, x) in iproduct!(0..height as usize, 0..width as usize) {
            let color = match colors.next() {
                Some(color) => color,
                None => break,
            };
            let id = grid.push(color);
            if x == 0 {
                let above = grid.rows.last().map_or(PixelId::BORDER, |row| row[0]);
                grid.link(id, Direction::Up, above);
                grid.rows.push(vec![id]);
            } else {
                let prev = grid.rows[y][x - 1];
                grid.link(prev, Direction::Right, id);
                let above = grid.neighbor(grid.neighbor(prev, Direction::Up), Direction::Right);
                grid.link(id, Direction::Up, above);
                grid.rows[y].push(id);
            }
        }
        grid
    }

    fn push(&mut self, color: Rgb<u8>) -> PixelId {
        let id = PixelId(self.arena.len() as u32);
        self.arena.push(PixelNode::Color(ColorPixel::new(color)));
        id
    }

    /// Width and height of the current view.  A grid carved down to
    /// no rows still remembers how wide it was.
    pub fn dimensions(&self) -> (u32, u32) {
        let width = self.rows.first().map_or(self.columns, Vec::len);
        (width as u32, self.rows.len() as u32)
    }

    pub fn is_empty(&self) -> bool {
        let (width, height) = self.dimensions();
        width == 0 || height == 0
    }

    pub fn rows(&self) -> &[Vec<PixelId>] {
        &self.rows
    }

    pub fn row(&self, y: usize) -> Option<&[PixelId]> {
        self.rows.get(y).map(Vec::as_slice)
    }

    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    pub fn node(&self, id: PixelId) -> &PixelNode {
        &self.arena[id.index()]
    }

    pub fn color(&self, id: PixelId) -> Option<Rgb<u8>> {
        self.node(id).color()
    }

    pub fn is_marked(&self, id: PixelId) -> bool {
        self.node(id).is_marked()
    }

    pub(crate) fn set_marked(&mut self, id: PixelId, marked: bool) {
        if let PixelNode::Color(px) = &mut self.arena[id.index()] {
            px.marked = marked;
        }
    }

    #[inline]
    fn physical(&self, dir: Direction) -> Direction {
        if self.transposed {
            dir.transposed()
        } else {
            dir
        }
    }

    #[inline]
    fn raw_neighbor(&self, id: PixelId, dir: Direction) -> PixelId {
        match &self.arena[id.index()] {
            PixelNode::Border => PixelId::BORDER,
            PixelNode::Color(px) => px.link(dir),
        }
    }

    /// The pixel next to `id` in the given direction of the current
    /// view.  The border is its own neighbor everywhere.
    #[inline]
    pub fn neighbor(&self, id: PixelId, dir: Direction) -> PixelId {
        self.raw_neighbor(id, self.physical(dir))
    }

    /// Point `a` at `b` in direction `dir`, and `b` back at `a`.  Writes
    /// to the border are dropped.
    pub fn link(&mut self, a: PixelId, dir: Direction, b: PixelId) {
        let dir = self.physical(dir);
        self.set_raw_link(a, dir, b);
        self.set_raw_link(b, dir.opposite(), a);
    }

    // A pixel's left/right links feed its up and down neighbors'
    // gradients, and its up/down links feed its left and right
    // neighbors', so exactly those three caches are dropped.
    fn set_raw_link(&mut self, id: PixelId, dir: Direction, to: PixelId) {
        match &mut self.arena[id.index()] {
            PixelNode::Border => return,
            PixelNode::Color(px) => px.set_link(dir, to),
        }
        let (first, second) = dir.across();
        self.invalidate(self.raw_neighbor(id, first));
        self.invalidate(self.raw_neighbor(id, second));
    }

    fn invalidate(&self, id: PixelId) {
        if let PixelNode::Color(px) = &self.arena[id.index()] {
            px.invalidate();
        }
    }

    /// Flip the view 90°.  Only the row table is rebuilt; links are
    /// reinterpreted on access, and energy is symmetric under the
    /// flip, so cached energies stay good.
    pub fn transpose(&mut self) {
        let (width, height) = self.dimensions();
        let rows = std::mem::replace(&mut self.rows, Vec::new());
        self.rows = (0..width as usize)
            .map(|x| rows.iter().map(|row| row[x]).collect())
            .collect();
        self.columns = height as usize;
        self.transposed = !self.transposed;
    }

    /// Run `op` against the view in which seams along `axis` run top to
    /// bottom, restoring the original view afterward whatever `op`
    /// returns.
    pub fn oriented<T, F>(&mut self, axis: Axis, op: F) -> T
    where
        F: FnOnce(&mut PixelGrid) -> T,
    {
        match axis {
            Axis::Vertical => op(self),
            Axis::Horizontal => {
                self.transpose();
                let result = op(self);
                self.transpose();
                result
            }
        }
    }

    /// Where `id` sits in row `y`.  The hint is tried first, then the
    /// whole row is searched.
    pub(crate) fn position_in_row(&self, y: usize, id: PixelId, hint: Option<usize>) -> Option<usize> {
        let row = self.rows.get(y)?;
        match hint {
            Some(x) if row.get(x) == Some(&id) => Some(x),
            _ => row.iter().position(|&p| p == id),
        }
    }

    pub(crate) fn remove_from_row(&mut self, y: usize, x: usize) -> PixelId {
        self.rows[y].remove(x)
    }

    /// Put `id` back into row `y` just before `before`, or at the end
    /// of the row when `before` is not in it.
    pub(crate) fn splice_before(&mut self, y: usize, id: PixelId, before: PixelId) {
        let row = &mut self.rows[y];
        match row.iter().position(|&p| p == before) {
            Some(x) => row.insert(x, id),
            None => row.push(id),
        }
    }

    /// Reinsertion writes one pixel into each of the seam's rows; an
    /// empty grid built with no rows at all has to grow them first.
    pub(crate) fn ensure_rows(&mut self, count: usize) {
        if self.rows.len() < count {
            self.rows.resize_with(count, Vec::new);
        }
    }

    /// Row-major RGBA bytes of the current grid, fully opaque.
    pub fn to_rgba(&self) -> Vec<u8> {
        let (width, height) = self.dimensions();
        let mut out = Vec::with_capacity(width as usize * height as usize * 4);
        for &id in self.rows.iter().flatten() {
            let Rgb([r, g, b]) = self.color(id).unwrap_or(Rgb([0, 0, 0]));
            out.extend_from_slice(&[r, g, b, 255]);
        }
        out
    }

    pub fn to_image(&self) -> RgbaImage {
        let (width, height) = self.dimensions();
        ImageBuffer::from_fn(width, height, |x, y| {
            let id = self.rows[y as usize][x as usize];
            self.color(id).map_or(Rgba([0, 0, 0, 255]), |c| c.to_rgba())
        })
    }

    /// Check that the links and the row table tell the same story:
    /// every row is the same length, every slot holds a colored pixel,
    /// and each pixel's four links name exactly the pixels beside it in
    /// the table (or the border at an edge).  Links are checked both
    /// ways, so this implies reciprocity.
    pub fn verify(&self) -> Result<()> {
        let (width, height) = self.dimensions();
        let at = |x: i64, y: i64| -> PixelId {
            if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                PixelId::BORDER
            } else {
                self.rows[y as usize][x as usize]
            }
        };

        for (y, row) in self.rows.iter().enumerate() {
            if row.len() != width as usize {
                return Err(CarveError::Inconsistent {
                    row: y,
                    col: row.len(),
                    reason: format!("row length {} differs from width {}", row.len(), width),
                });
            }
            for (x, &id) in row.iter().enumerate() {
                if id.is_border() || id.index() >= self.arena.len() {
                    return Err(CarveError::Inconsistent {
                        row: y,
                        col: x,
                        reason: "row holds a non-pixel".to_string(),
                    });
                }
                let (xi, yi) = (x as i64, y as i64);
                let expected = [
                    (Direction::Up, at(xi, yi - 1)),
                    (Direction::Down, at(xi, yi + 1)),
                    (Direction::Left, at(xi - 1, yi)),
                    (Direction::Right, at(xi + 1, yi)),
                ];
                for &(dir, want) in expected.iter() {
                    let got = self.neighbor(id, dir);
                    if got != want {
                        return Err(CarveError::Inconsistent {
                            row: y,
                            col: x,
                            reason: format!("{:?} link is {:?}, expected {:?}", dir, got, want),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
