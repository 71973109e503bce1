// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rendering one rectangle of the canvas into a buffer of its own.
//!
//! A tile never sees the frame buffer.  It produces its pixels in a
//! private, tile-sized vector, and the frame renderer copies them into
//! place afterwards, which is what lets any number of tiles run at the
//! same time without locks.

use image::Rgb;
use std::sync::atomic::{AtomicBool, Ordering};

use colors::{shade, ColorMapper};
use config::RenderConfig;
use error::RenderError;
use escape::escape_time;
use planes::{Canvas, Pixel, Viewport};

/// A rectangle of the canvas, in absolute pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tile {
    /// Leftmost column.
    pub left: usize,
    /// Topmost row.
    pub top: usize,
    /// Columns covered.
    pub width: usize,
    /// Rows covered.
    pub height: usize,
}

impl Tile {
    /// Number of pixels in the tile.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Tiles with no rows or no columns are legal and render to nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if every pixel of the tile lies on `canvas`.
    pub fn fits(&self, canvas: &Canvas) -> bool {
        self.left + self.width <= canvas.0 && self.top + self.height <= canvas.1
    }
}

/// Everything a worker needs to turn tiles into pixels.  All of it is
/// borrowed and read-only, so one renderer is shared by every worker.
pub struct TileRenderer<'a, C: ColorMapper + ?Sized + 'a> {
    viewport: &'a Viewport,
    limit: usize,
    colors: &'a C,
}

impl<'a, C: ColorMapper + ?Sized + 'a> TileRenderer<'a, C> {
    /// Bundles the parameters of one render.
    pub fn new(viewport: &'a Viewport, config: &RenderConfig, colors: &'a C) -> Self {
        TileRenderer {
            viewport,
            limit: config.max_iterations,
            colors,
        }
    }

    /// Render a tile to completion.
    pub fn render(&self, tile: &Tile) -> Result<Vec<Rgb<u8>>, RenderError> {
        self.render_until(tile, &AtomicBool::new(false))
    }

    /// Render a tile, giving up between rows once `cancel` is set.  The
    /// result is the tile's pixels, row-major, with the pixel at
    /// `(left + x, top + y)` at offset `y * width + x`.
    pub fn render_until(
        &self,
        tile: &Tile,
        cancel: &AtomicBool,
    ) -> Result<Vec<Rgb<u8>>, RenderError> {
        if !tile.fits(&self.viewport.canvas) {
            return Err(RenderError::InvalidViewport(format!(
                "tile {:?} lies outside the {}x{} canvas",
                tile, self.viewport.canvas.0, self.viewport.canvas.1
            )));
        }

        let mut pixels = Vec::with_capacity(tile.len());
        let rows = tile.top..tile.top + tile.height;
        let columns = tile.left..tile.left + tile.width;
        for (row, column) in iproduct!(rows, columns) {
            if column == tile.left && cancel.load(Ordering::Relaxed) {
                return Err(RenderError::Cancelled);
            }
            let point = self.viewport.pixel_to_point(&Pixel(column, row));
            pixels.push(shade(self.colors, escape_time(point, self.limit), self.limit));
        }
        Ok(pixels)
    }
}
