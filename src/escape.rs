// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time iteration.  Everything else in the crate exists to
//! call this once per pixel, so it is kept small enough to inline.

use num::Complex;

/// Squared escape radius.  Comparing against the squared magnitude
/// saves a square root per iteration.
pub const ESCAPE_NORM_SQR: f64 = 4.0;

/// This is our classic iterator function: `z = z² + c`, starting at
/// zero.  It either returns the (one-based) iteration after which the
/// orbit of `point` first left the circle of radius two, or it returns
/// nothing at all, meaning the orbit stayed bounded for all `limit`
/// iterations and the point is presumed to be inside the set.
///
/// A limit of zero performs no iterations and so never escapes.
#[inline]
pub fn escape_time(point: Complex<f64>, limit: usize) -> Option<usize> {
    let mut z = Complex::new(0.0_f64, 0.0_f64);
    for i in 1..=limit {
        z = z * z + point;
        if z.norm_sqr() >= ESCAPE_NORM_SQR {
            return Some(i);
        }
    }
    None
}
