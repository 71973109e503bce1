// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-render budget: how hard to look at each point, and how many
//! workers to look with.

use num_cpus;

use error::RenderError;

/// Iteration cap used when the caller has no opinion.
pub const DEFAULT_ITERATIONS: usize = 500;

/// Read-only for the duration of a render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Iterations after which a point is presumed to be in the set.
    /// Zero is allowed; it paints every pixel as bounded.
    pub max_iterations: usize,
    /// Number of horizontal bands, and so of worker threads.
    pub threads: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            max_iterations: DEFAULT_ITERATIONS,
            threads: num_cpus::get(),
        }
    }
}

impl RenderConfig {
    /// Constructor; fails if there would be no one to do the work.
    pub fn new(max_iterations: usize, threads: usize) -> Result<RenderConfig, RenderError> {
        let config = RenderConfig {
            max_iterations,
            threads,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checked again at render entry, since the fields are public.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.threads < 1 {
            return Err(RenderError::InvalidConfig(
                "thread count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threads_is_rejected() {
        assert!(RenderConfig::new(100, 0).is_err());
    }

    #[test]
    fn zero_iterations_is_allowed() {
        assert!(RenderConfig::new(0, 1).is_ok());
    }

    #[test]
    fn default_uses_every_core() {
        let config = RenderConfig::default();
        assert_eq!(config.max_iterations, DEFAULT_ITERATIONS);
        assert!(config.threads >= 1);
        assert!(config.validate().is_ok());
    }
}
