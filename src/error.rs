// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The one error type every fallible operation in the renderer returns.

/// Everything that can stop a frame from being delivered.  Bad
/// parameters are caught before any thread is started; the other
/// variants mean that a render was started and abandoned, and that no
/// buffer, partial or otherwise, was handed back.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// The canvas has no area, or the scale or center cannot describe
    /// a region of the complex plane.
    #[fail(display = "invalid viewport: {}", _0)]
    InvalidViewport(String),

    /// The iteration or thread budget cannot be honored.
    #[fail(display = "invalid render configuration: {}", _0)]
    InvalidConfig(String),

    /// A band's worker could not be started, or died before finishing.
    #[fail(display = "worker for band {} failed: {}", band, reason)]
    WorkerFailure {
        /// Index of the lowest-numbered band that failed.
        band: usize,
        /// Why it failed, usually the panic message.
        reason: String,
    },

    /// The caller raised the cancellation flag before every band finished.
    #[fail(display = "render cancelled before completion")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_failure_names_its_band() {
        let e = RenderError::WorkerFailure {
            band: 3,
            reason: "out of memory".to_string(),
        };
        assert_eq!(format!("{}", e), "worker for band 3 failed: out of memory");
    }

    #[test]
    fn validation_errors_carry_their_reason() {
        let e = RenderError::InvalidViewport("scale must be positive".to_string());
        assert_eq!(format!("{}", e), "invalid viewport: scale must be positive");
    }
}
