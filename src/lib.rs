#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Banded Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane for
//! which repeatedly squaring a number and adding `c` never runs off to
//! infinity.  We can't iterate forever, so we iterate up to a limit and
//! record how many steps it took each point to leave the circle of
//! radius two.  That count, the point's "escape time," is what gets
//! turned into a color; points that never leave within the limit are
//! painted black.
//!
//! Every pixel is independent of every other, so a frame is cut into
//! horizontal bands and each band is handed to its own thread, with its
//! own buffer.  When the threads are done the bands are stacked back
//! into a single image.
//!
//! ```no_run
//! use mandelbands::{render, Complex, Palette, RenderConfig, Viewport};
//!
//! let viewport = Viewport::new(Complex::new(-0.5, 0.0), 2.5, 800, 600).unwrap();
//! let config = RenderConfig::new(500, 4).unwrap();
//! let frame = render(&viewport, &config, &Palette::Twilight).unwrap();
//! assert_eq!(frame.width(), 800);
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod buffer;
pub mod colors;
pub mod config;
pub mod error;
pub mod escape;
pub mod frame;
pub mod planes;
pub mod tile;

pub use buffer::PixelBuffer;
pub use colors::{ColorMapper, Palette, BACKGROUND};
pub use config::RenderConfig;
pub use error::RenderError;
pub use escape::escape_time;
pub use frame::{partition, render, render_cancellable, render_single, Stage};
pub use num::Complex;
pub use planes::{pixel_to_point, Canvas, Pixel, Viewport};
pub use tile::{Tile, TileRenderer};
