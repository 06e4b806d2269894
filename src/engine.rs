// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The carving engine
//!
//! Owns the pixel grid and the stack of removed seams, and advances one
//! small unit of work per `step`: propose a seam (and mark it), remove
//! the proposed seam, or put the most recently removed seam back.
//! Splitting proposal from removal lets a viewer show the seam about to
//! go before it goes.

use crate::config::CarveConfig;
use crate::error::{CarveError, Result};
use crate::grid::PixelGrid;
use crate::render::{render, render_image, ColorMode};
use crate::seam::{Axis, SeamPath};
use crate::seamfinder::SeamFinder;
use crate::surgeon::{insert_seam, mark, remove_seam};
use image::{GenericImageView, Pixel, Primitive, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

/// How `step` picks the axis of the next seam.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AxisMode {
    Vertical,
    Horizontal,
    /// Flip the axis on every proposal.
    Alternating,
    /// Vertical with probability width / (width + height), so whichever
    /// dimension is currently larger tends to shrink.
    WeightedRandom,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    /// A seam has been found and marked, and goes on the next step.
    SeamPending,
    /// A seam has just been put back and is still marked.
    Reversed,
}

#[derive(Debug, Clone)]
enum Pending {
    Proposed(SeamPath),
    Restored(SeamPath),
}

impl Pending {
    fn seam(&self) -> &SeamPath {
        match self {
            Pending::Proposed(seam) | Pending::Restored(seam) => seam,
        }
    }
}

pub struct CarvingEngine<R = StdRng> {
    grid: PixelGrid,
    history: Vec<SeamPath>,
    pending: Option<Pending>,
    config: CarveConfig,
    last_axis: Axis,
    reversed: bool,
    playing: bool,
    rng: R,
}

impl CarvingEngine<StdRng> {
    pub fn new(grid: PixelGrid, config: CarveConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        CarvingEngine::with_rng(grid, config, rng)
    }

    /// Build an engine over row-major RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8], config: CarveConfig) -> Result<Self> {
        Ok(CarvingEngine::new(PixelGrid::from_rgba(width, height, rgba)?, config))
    }

    pub fn from_image<I, P, S>(image: &I, config: CarveConfig) -> Self
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
    {
        CarvingEngine::new(PixelGrid::from_image(image), config)
    }
}

impl<R: Rng> CarvingEngine<R> {
    /// Build an engine drawing its axis choices from `rng`.  The seed in
    /// `config` is ignored.
    pub fn with_rng(grid: PixelGrid, config: CarveConfig, rng: R) -> Self {
        CarvingEngine {
            grid,
            history: Vec::new(),
            pending: None,
            config,
            last_axis: Axis::Vertical,
            reversed: false,
            playing: true,
            rng,
        }
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn into_grid(self) -> PixelGrid {
        self.grid
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.grid.dimensions()
    }

    pub fn config(&self) -> &CarveConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        match self.pending {
            None => EngineState::Idle,
            Some(Pending::Proposed(_)) => EngineState::SeamPending,
            Some(Pending::Restored(_)) => EngineState::Reversed,
        }
    }

    pub fn pending(&self) -> Option<&SeamPath> {
        self.pending.as_ref().map(Pending::seam)
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn axis_mode(&self) -> AxisMode {
        self.config.mode
    }

    pub fn set_axis_mode(&mut self, mode: AxisMode) {
        self.config.mode = mode;
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn set_direction(&mut self, reversed: bool) {
        self.reversed = reversed;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Width, height, and row-major RGBA bytes of the grid as it stands.
    /// Marked pixels keep their own colors here.
    pub fn current_buffer(&self) -> (u32, u32, Vec<u8>) {
        let (width, height) = self.grid.dimensions();
        (width, height, self.grid.to_rgba())
    }

    /// RGBA bytes in the given mode, with the pending seam painted in
    /// the configured highlight color.
    pub fn render(&self, mode: ColorMode) -> Vec<u8> {
        render(&self.grid, mode, self.config.highlight)
    }

    pub fn render_image(&self, mode: ColorMode) -> RgbaImage {
        render_image(&self.grid, mode, self.config.highlight)
    }

    /// Advance one unit of work.
    ///
    /// An empty grid can only grow, so it forces the engine into
    /// reverse; with nothing left to undo it is forced forward again.
    /// While paused, only a pending seam is finished.
    pub fn step(&mut self) -> Result<()> {
        let (width, height) = self.grid.dimensions();
        if width == 0 || height == 0 {
            self.reversed = true;
        } else if self.history.is_empty() && self.pending.is_none() {
            self.reversed = false;
        }
        trace!(state = ?self.state(), reversed = self.reversed, playing = self.playing, "step");

        if self.pending.is_some() {
            return self.finish_pending();
        }
        if !self.playing {
            return Ok(());
        }
        if self.reversed {
            self.restore_last()
        } else {
            let axis = self.choose_axis();
            self.propose_seam(axis);
            Ok(())
        }
    }

    /// Find and mark a seam along `axis` by hand.  Only allowed while
    /// paused, carving forward, with nothing pending; returns whether a
    /// seam was proposed.
    pub fn propose(&mut self, axis: Axis) -> bool {
        if self.playing || self.reversed || self.pending.is_some() {
            return false;
        }
        self.last_axis = axis;
        self.propose_seam(axis)
    }

    /// Put back the most recently removed seam by hand.  Only allowed
    /// while paused, reversed, with nothing pending; returns whether a
    /// seam was restored.
    pub fn undo(&mut self) -> Result<bool> {
        if self.playing || !self.reversed || self.pending.is_some() || self.history.is_empty() {
            return Ok(false);
        }
        self.restore_last()?;
        Ok(true)
    }

    /// Remove seams until the grid is no larger than `width` × `height`.
    /// A target larger than the grid leaves that axis alone.  Any
    /// pending seam is dropped first.
    pub fn resize_to_target(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(CarveError::InvalidTarget { width, height });
        }
        self.clear_pending();

        let mut removed = 0;
        loop {
            let (w, h) = self.grid.dimensions();
            let (dw, dh) = (w.saturating_sub(width), h.saturating_sub(height));
            let axis = match (dw, dh) {
                (0, 0) => break,
                (_, 0) => Axis::Vertical,
                (0, _) => Axis::Horizontal,
                (dw, dh) => {
                    let p = f64::from(dw) / f64::from(dw + dh);
                    if self.rng.gen::<f64>() < p {
                        Axis::Vertical
                    } else {
                        Axis::Horizontal
                    }
                }
            };
            if !self.remove_along(axis)? {
                break;
            }
            removed += 1;
        }
        debug!(removed, dimensions = ?self.grid.dimensions(), "resized to target");
        self.check()
    }

    /// Remove up to `count` seams along `axis`, never taking that
    /// dimension below one pixel.  Returns how many went.
    pub fn carve(&mut self, axis: Axis, count: u32) -> Result<u32> {
        self.clear_pending();
        let mut removed = 0;
        while removed < count {
            let (w, h) = self.grid.dimensions();
            let extent = match axis {
                Axis::Vertical => w,
                Axis::Horizontal => h,
            };
            if extent <= 1 || !self.remove_along(axis)? {
                break;
            }
            removed += 1;
        }
        debug!(?axis, removed, "carved");
        self.check()?;
        Ok(removed)
    }

    fn choose_axis(&mut self) -> Axis {
        let axis = match self.config.mode {
            AxisMode::Vertical => Axis::Vertical,
            AxisMode::Horizontal => Axis::Horizontal,
            AxisMode::Alternating => self.last_axis.turn(),
            AxisMode::WeightedRandom => {
                let (w, h) = self.grid.dimensions();
                let r: f64 = self.rng.gen();
                if r >= f64::from(h) / f64::from(w + h) {
                    Axis::Vertical
                } else {
                    Axis::Horizontal
                }
            }
        };
        self.last_axis = axis;
        axis
    }

    fn propose_seam(&mut self, axis: Axis) -> bool {
        match self.grid.find_seam(axis) {
            Some(seam) => {
                mark(&mut self.grid, &seam, true);
                self.pending = Some(Pending::Proposed(seam));
                true
            }
            None => false,
        }
    }

    // Forward: the pending seam is in the grid either way, so it goes.
    // Reversed: the pending seam is just unmarked and forgotten, which
    // cancels a proposal or completes a restore.
    fn finish_pending(&mut self) -> Result<()> {
        let pending = match self.pending.take() {
            Some(pending) => pending,
            None => return Ok(()),
        };
        mark(&mut self.grid, pending.seam(), false);
        if self.reversed {
            return Ok(());
        }

        let restored = match pending {
            Pending::Restored(_) => true,
            Pending::Proposed(_) => false,
        };
        let seam = match pending {
            Pending::Proposed(seam) | Pending::Restored(seam) => seam,
        };
        if let Err(err) = remove_seam(&mut self.grid, &seam) {
            mark(&mut self.grid, &seam, true);
            self.pending = Some(if restored {
                Pending::Restored(seam)
            } else {
                Pending::Proposed(seam)
            });
            return Err(err);
        }
        self.history.push(seam);
        self.check()
    }

    fn restore_last(&mut self) -> Result<()> {
        if let Some(seam) = self.history.pop() {
            insert_seam(&mut self.grid, &seam);
            mark(&mut self.grid, &seam, true);
            self.pending = Some(Pending::Restored(seam));
            self.check()?;
        }
        Ok(())
    }

    fn remove_along(&mut self, axis: Axis) -> Result<bool> {
        let seam = match self.grid.find_seam(axis) {
            Some(seam) => seam,
            None => return Ok(false),
        };
        remove_seam(&mut self.grid, &seam)?;
        self.history.push(seam);
        Ok(true)
    }

    fn clear_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            mark(&mut self.grid, pending.seam(), false);
        }
    }

    fn check(&self) -> Result<()> {
        if self.config.verify {
            self.grid.verify()
        } else {
            Ok(())
        }
    }
}
