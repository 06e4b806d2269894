// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reversible seam carving over a linked pixel graph.
//!
//! Every pixel knows its four neighbors.  Removing a seam rewires the
//! neighbors around it and leaves the removed pixels' own links intact,
//! so the most recently removed seam can always be put back exactly.
//! `CarvingEngine` drives the whole thing one small step at a time.

pub mod config;
pub mod energy;
pub mod engine;
pub mod error;
pub mod grid;
pub mod pixel;
pub mod render;
pub mod seam;
pub mod seamfinder;
pub mod surgeon;
pub mod twodmap;

pub use config::CarveConfig;
pub use engine::{AxisMode, CarvingEngine, EngineState};
pub use error::{CarveError, Result};
pub use grid::PixelGrid;
pub use render::ColorMode;
pub use seam::{Axis, SeamPath};
pub use seamfinder::SeamFinder;
