// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning iteration counts into colors.
//!
//! A color mapper is anything that can answer "what color is a point
//! that escaped after this many iterations?"  Mappers are shared by
//! every band's worker at once, so they must be `Sync` and must not
//! keep state between calls.  Points that never escaped are not the
//! mapper's business: they are always painted [`BACKGROUND`].

use image::Rgb;
use num::clamp;
use std::str::FromStr;

/// The color of every bounded point.
pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// What an escaped point is painted when its mapper asks for
/// [`BACKGROUND`], so that bounded and escaped pixels stay
/// distinguishable.
pub const NEAR_BACKGROUND: Rgb<u8> = Rgb([1, 1, 1]);

/// Maps an escape count to a color.
pub trait ColorMapper {
    /// `iterations` is in `1..=limit`.
    fn escaped(&self, iterations: usize, limit: usize) -> Rgb<u8>;
}

/// Any closure over the normalized escape fraction is a color mapper.
impl<F> ColorMapper for F
where
    F: Fn(f64) -> Rgb<u8>,
{
    fn escaped(&self, iterations: usize, limit: usize) -> Rgb<u8> {
        self(fraction(iterations, limit))
    }
}

/// `iterations / limit`, clamped to the unit interval.
#[inline]
pub fn fraction(iterations: usize, limit: usize) -> f64 {
    if limit == 0 {
        return 1.0;
    }
    clamp(iterations as f64 / limit as f64, 0.0, 1.0)
}

/// Builds a color from three channels in the unit interval.  Out of
/// range channels are clamped rather than wrapped.
#[inline]
pub fn rgb(r: f64, g: f64, b: f64) -> Rgb<u8> {
    let channel = |v: f64| (clamp(v, 0.0, 1.0) * 255.0) as u8;
    Rgb([channel(r), channel(g), channel(b)])
}

/// The color to write for one evaluated pixel.
#[inline]
pub fn shade<C: ColorMapper + ?Sized>(colors: &C, escape: Option<usize>, limit: usize) -> Rgb<u8> {
    match escape {
        None => BACKGROUND,
        Some(i) => match colors.escaped(i, limit) {
            c if c == BACKGROUND => NEAR_BACKGROUND,
            c => c,
        },
    }
}

// Sixteen steps from deep blue through white to orange and back.
const BANDS: [[u8; 3]; 16] = [
    [66, 30, 15],
    [25, 7, 26],
    [9, 1, 47],
    [4, 4, 73],
    [0, 7, 100],
    [12, 44, 138],
    [24, 82, 177],
    [57, 125, 209],
    [134, 181, 229],
    [211, 236, 248],
    [241, 233, 191],
    [248, 201, 95],
    [255, 170, 0],
    [204, 128, 0],
    [153, 87, 0],
    [106, 52, 3],
];

/// The built-in mappers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Palette {
    /// Brighter the longer the point took to escape.
    Grayscale,
    /// Dark magenta fading into green near the boundary.
    Verdant,
    /// Deep purples and teals, strongly compressed toward the boundary.
    Twilight,
    /// Cycles through a fixed table by raw count, ignoring the limit.
    Banded,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::Twilight
    }
}

impl ColorMapper for Palette {
    fn escaped(&self, iterations: usize, limit: usize) -> Rgb<u8> {
        let f = fraction(iterations, limit);
        match *self {
            Palette::Grayscale => rgb(f, f, f),
            Palette::Verdant => rgb(f * 0.3, f * f, f * 0.3),
            Palette::Twilight => rgb(f.powf(0.1) * 0.25 - 0.1, f.powf(0.7), f.powf(0.5) * 0.62),
            Palette::Banded => Rgb(BANDS[iterations % BANDS.len()]),
        }
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grayscale" => Ok(Palette::Grayscale),
            "verdant" => Ok(Palette::Verdant),
            "twilight" => Ok(Palette::Twilight),
            "banded" => Ok(Palette::Banded),
            _ => Err(format!("Unknown palette '{}'", s)),
        }
    }
}

/// Names accepted by `Palette::from_str`, for help text.
pub const PALETTE_NAMES: [&str; 4] = ["grayscale", "verdant", "twilight", "banded"];
