// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong while carving.

use failure::Fail;

/// The carving error type.  Only `MalformedSeam` and `Inconsistent`
/// indicate a broken pixel graph; the rest are rejected at the API
/// boundary before the graph is touched.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum CarveError {
    /// A seam entry does not sit above-left, above, or above-right of
    /// the entry below it, or is not in the row it claims to be in.
    #[fail(display = "pixel image is ill-formed: seam broken at row {}", row)]
    MalformedSeam { row: usize },

    /// `PixelGrid::verify` found a link that disagrees with the row
    /// table.
    #[fail(display = "pixel graph inconsistent at ({}, {}): {}", col, row, reason)]
    Inconsistent {
        row: usize,
        col: usize,
        reason: String,
    },

    #[fail(
        display = "pixel buffer holds {} bytes, expected {}",
        actual, expected
    )]
    BufferSize { expected: usize, actual: usize },

    #[fail(display = "cannot carve to a {}x{} target", width, height)]
    InvalidTarget { width: u32, height: u32 },

    #[fail(display = "image error: {}", _0)]
    Image(String),
}

impl From<image::ImageError> for CarveError {
    fn from(err: image::ImageError) -> Self {
        CarveError::Image(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CarveError>;
