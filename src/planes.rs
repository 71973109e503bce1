// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Describes the relationship between a rectangle on the integral
//! plane (the canvas, with its origin at the upper-left pixel) and the
//! region of the complex plane we want to look at, which is described
//! by a center point and a scale.
//!
//! The scale is the *vertical* extent of the region in complex units.
//! Both axes are normalized by the canvas height, so a pixel is always
//! square on the complex plane and a wider canvas simply shows more of
//! the plane to the left and right.
use num::Complex;

use error::RenderError;

/// The width and height of the integral plane, which is assumed to start
/// at 0,0.  Both values should be greater than zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Canvas(pub usize, pub usize);

impl Canvas {
    /// Total number of pixels on the canvas.
    pub fn len(&self) -> usize {
        self.0 * self.1
    }

    /// A canvas with no width or no height has no pixels.
    pub fn is_empty(&self) -> bool {
        self.0 == 0 || self.1 == 0
    }
}

/// The column and row of a pixel on the canvas.  Rows count downward.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Map a pixel of a canvas onto the complex plane.
///
/// ```text
/// re = cx + (-W / 2H + px / H) * scale
/// im = -(cy + (-0.5 + py / H) * scale)
/// ```
///
/// Screen rows grow downward and the imaginary axis grows upward,
/// hence the sign flip.  The flip covers the center as well: the pixel
/// in the middle of the canvas lands on `(cx, -cy)`.
///
/// This is a total function; any finite inputs on a non-empty canvas
/// produce a finite point.
#[inline]
pub fn pixel_to_point(
    pixel: &Pixel,
    canvas: &Canvas,
    center: Complex<f64>,
    scale: f64,
) -> Complex<f64> {
    let (w, h) = (canvas.0 as f64, canvas.1 as f64);
    Complex::new(
        center.re + (-w / (2.0 * h) + (pixel.0 as f64) / h) * scale,
        -(center.im + (-0.5 + (pixel.1 as f64) / h) * scale),
    )
}

/// Which part of the complex plane lands on which canvas.  Created
/// fresh by the caller for every render and never changed during one;
/// the helpers below return new viewports rather than mutating this one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Center of the view.  The imaginary part is in screen
    /// orientation; see [`pixel_to_point`](fn.pixel_to_point.html).
    pub center: Complex<f64>,
    /// Vertical extent of the view in complex units.
    pub scale: f64,
    /// Size of the output in pixels.
    pub canvas: Canvas,
}

impl Default for Viewport {
    /// The whole set on an 800x600 canvas.
    fn default() -> Self {
        Viewport {
            center: Complex::new(-0.5, 0.0),
            scale: 2.5,
            canvas: Canvas(800, 600),
        }
    }
}

impl Viewport {
    /// Constructor.  Rejects canvases without area and scales or
    /// centers that do not describe a finite region.
    pub fn new(
        center: Complex<f64>,
        scale: f64,
        width: usize,
        height: usize,
    ) -> Result<Viewport, RenderError> {
        let viewport = Viewport {
            center,
            scale,
            canvas: Canvas(width, height),
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// The fields are public, so anything that consumes a viewport
    /// calls this first.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.canvas.is_empty() {
            return Err(RenderError::InvalidViewport(format!(
                "canvas must have a positive width and height, got {}x{}",
                self.canvas.0, self.canvas.1
            )));
        }
        // Room for the packed RGB bytes, not just the pixel count.
        let bytes = self.canvas.0.checked_mul(self.canvas.1).and_then(|n| n.checked_mul(3));
        if bytes.is_none() {
            return Err(RenderError::InvalidViewport(format!(
                "a {}x{} canvas is too large to address",
                self.canvas.0, self.canvas.1
            )));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(RenderError::InvalidViewport(format!(
                "scale must be positive and finite, got {}",
                self.scale
            )));
        }
        if !(self.center.re.is_finite() && self.center.im.is_finite()) {
            return Err(RenderError::InvalidViewport(format!(
                "center must be finite, got {}",
                self.center
            )));
        }
        Ok(())
    }

    /// Given a pixel on this viewport's canvas, return the
    /// corresponding point on the complex plane.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        pixel_to_point(pixel, &self.canvas, self.center, self.scale)
    }

    /// A viewport of the same size and scale, centered on the point
    /// under `pixel`.  This is what a click-to-recenter wants.
    pub fn recentered(&self, pixel: &Pixel) -> Viewport {
        let point = self.pixel_to_point(pixel);
        Viewport {
            center: Complex::new(point.re, -point.im),
            ..*self
        }
    }

    /// A viewport around the same center with its scale multiplied by
    /// `factor`.  Factors below one zoom in.
    pub fn zoomed(&self, factor: f64) -> Result<Viewport, RenderError> {
        let viewport = Viewport {
            scale: self.scale * factor,
            ..*self
        };
        viewport.validate()?;
        Ok(viewport)
    }
}
