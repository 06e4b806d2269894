// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Engine settings.

use crate::engine::AxisMode;
use image::Rgb;

/// Knobs for a `CarvingEngine`.
#[derive(Debug, Clone, PartialEq)]
pub struct CarveConfig {
    pub mode: AxisMode,
    /// Seed for the engine's random source.  `None` draws one from the
    /// operating system.
    pub seed: Option<u64>,
    /// Check the whole pixel graph after every seam operation.
    pub verify: bool,
    /// Color used by `render` for pixels of the pending seam.
    pub highlight: Option<Rgb<u8>>,
}

impl Default for CarveConfig {
    fn default() -> Self {
        CarveConfig {
            mode: AxisMode::WeightedRandom,
            seed: None,
            verify: cfg!(debug_assertions),
            highlight: Some(Rgb([255, 0, 0])),
        }
    }
}

impl CarveConfig {
    pub fn with_mode(mut self, mode: AxisMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_highlight(mut self, highlight: Option<Rgb<u8>>) -> Self {
        self.highlight = highlight;
        self
    }
}
